//! # ledgerguard-chain: Append-only record chain
//!
//! The chain is the ledger's history: a position-indexed log that starts
//! with a genesis entry and only ever grows.
//!
//! - [`entry`]: [`Entry`] and the closed [`Payload`] union
//! - [`chain`]: [`RecordChain`] with append, lookup, and traversal
//! - [`index`]: optional [`NameIndex`] side structure for name lookups
//!
//! # Example
//!
//! ```
//! use ledgerguard_chain::{AttributeRoster, Payload, RecordChain};
//! use ledgerguard_types::{EntryKind, EntryStatus, PositionId, UserId};
//!
//! let mut chain = RecordChain::new();
//! let position = chain.append(
//!     EntryKind::Insert,
//!     EntryStatus::Accepted,
//!     UserId::SYSTEM,
//!     Payload::AttributeRoster(AttributeRoster {
//!         members: vec!["alice".to_string()],
//!         declared_count: 1,
//!         roster_name: "R1".to_string(),
//!     }),
//! );
//!
//! assert_eq!(position, PositionId::new(1));
//! assert!(chain.find_roster("R1").is_some());
//! ```

pub mod chain;
pub mod entry;
pub mod index;


use ledgerguard_types::{EntryKind, PositionId};

pub use chain::RecordChain;
pub use entry::{AttributeRoster, ENTRY_OVERHEAD_BYTES, Entry, Payload, ResourceDescriptor};
pub use index::NameIndex;

/// Errors from the chain's single mutation path.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("no entry at position {0}")]
    PositionOutOfRange(PositionId),

    #[error("entry at position {position} is {kind}, not an access request")]
    NotAnAccessRequest {
        position: PositionId,
        kind: EntryKind,
    },

    #[error("access request at position {0} is already accepted")]
    AlreadyAccepted(PositionId),
}
