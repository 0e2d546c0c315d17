//! # ledgerguard-abac: Attribute-based access control on an audit ledger
//!
//! Registers users, attribute rosters and resources, and evaluates access
//! requests against the rosters a resource requires. Every evaluated
//! request, granted or denied, becomes an entry on the record chain.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  request_resource(user_id, resource_name)    │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Policy information                          │
//! │  ├─ Resolve user name (IdentityDirectory)    │
//! │  └─ Resolve resource + rosters (RecordChain) │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Policy decision (evaluator)                 │
//! │  └─ First roster containing the user wins    │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Policy enforcement                          │
//! │  - Append ACCESS_REQUEST (REJECTED)          │
//! │  - On grant: record ACCEPTED                 │
//! │  - Update Accounting                         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Examples
//!
//! ```
//! use ledgerguard_abac::{Ledger, Outcome};
//! use ledgerguard_types::UserId;
//!
//! let mut ledger = Ledger::new();
//! ledger.add_user(UserId::new(1), "alice")?;
//! ledger.add_user(UserId::new(2), "bob")?;
//! ledger.add_attribute(UserId::SYSTEM, vec!["alice".to_string()], 1, "R1")?;
//! ledger.add_resource(UserId::new(1), vec!["R1".to_string()], 50, "doc")?;
//!
//! assert_eq!(ledger.request_resource(UserId::new(2), "doc")?.outcome, Outcome::Denied);
//! assert_eq!(ledger.request_resource(UserId::new(1), "doc")?.outcome, Outcome::Granted);
//! assert_eq!(ledger.accepted_requests(), 1);
//! assert_eq!(ledger.total_requests(), 2);
//! # Ok::<(), ledgerguard_abac::LedgerError>(())
//! ```

pub mod accounting;
pub mod directory;
pub mod error;
pub mod evaluator;
pub mod ledger;
pub mod registry;

#[cfg(test)]
mod tests;

pub use accounting::{Accounting, LedgerMetrics};
pub use directory::IdentityDirectory;
pub use error::{LedgerError, NameKind, Result};
pub use evaluator::{Decision, Evaluation, Outcome, evaluate};
pub use ledger::{DecisionRecording, Ledger, LedgerOptions};
pub use registry::Registry;
