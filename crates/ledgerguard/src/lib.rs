//! # ledgerguard
//!
//! Append-only audit ledger for attribute-based access control.
//!
//! Rosters (named lists of users) and resources (named, sized objects
//! gated by rosters) are recorded on a record chain. Every evaluated
//! access request is recorded too, granted or denied.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Ledger                            │
//! │  ┌───────────┐   ┌──────────┐   ┌───────────┐   ┌───────┐ │
//! │  │ Directory │ → │ Registry │ → │ Evaluator │ → │ Chain │ │
//! │  │ (users)   │   │ (names)  │   │ (decide)  │   │(append)│ │
//! │  └───────────┘   └──────────┘   └───────────┘   └───────┘ │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use ledgerguard::{Ledger, Outcome, UserId};
//!
//! let mut ledger = Ledger::new();
//! ledger.add_user(UserId::new(1), "alice")?;
//! ledger.add_attribute(UserId::SYSTEM, vec!["alice".to_string()], 1, "R1")?;
//! ledger.add_resource(UserId::new(1), vec!["R1".to_string()], 100, "fileA")?;
//!
//! let decision = ledger.request_resource(UserId::new(1), "fileA")?;
//! assert_eq!(decision.outcome, Outcome::Granted);
//! # Ok::<(), ledgerguard::LedgerError>(())
//! ```
//!
//! Configuration is loaded with [`ConfigLoader`] and turned into a ledger
//! with [`open_ledger`].

use std::path::Path;

use tracing::info;

// Re-export core types
pub use ledgerguard_types::{EntryKind, EntryStatus, PositionId, Timestamp, UserId};

// Re-export the chain
pub use ledgerguard_chain::{
    AttributeRoster, ChainError, ENTRY_OVERHEAD_BYTES, Entry, Payload, RecordChain,
    ResourceDescriptor,
};

// Re-export the decision engine
pub use ledgerguard_abac::{
    Decision, DecisionRecording, Ledger, LedgerError, LedgerMetrics, LedgerOptions, NameKind,
    Outcome,
};

// Re-export configuration
pub use ledgerguard_config::{ConfigLoader, DecisionRecordingMode, LedgerguardConfig};

/// Translates loaded configuration into ledger construction options.
pub fn ledger_options(config: &LedgerguardConfig) -> LedgerOptions {
    LedgerOptions {
        entry_overhead_bytes: config.ledger.entry_overhead_bytes,
        name_index: config.ledger.name_index,
        decision_recording: match config.ledger.decision_recording {
            DecisionRecordingMode::FinalizeInPlace => DecisionRecording::FinalizeInPlace,
            DecisionRecordingMode::AppendDecision => DecisionRecording::AppendDecision,
        },
        audit_enabled: config.audit.enabled,
    }
}

/// Creates a ledger from configuration.
///
/// # Errors
///
/// Fails when the options do not validate. Configuration that passed
/// [`LedgerguardConfig::validate`] always opens.
pub fn open_ledger(config: &LedgerguardConfig) -> Result<Ledger, LedgerError> {
    let options = ledger_options(config);
    info!(
        entry_overhead_bytes = options.entry_overhead_bytes,
        name_index = options.name_index,
        decision_recording = ?options.decision_recording,
        "Opening ledger"
    );
    Ledger::with_options(options)
}

/// Loads configuration through `loader` and creates a ledger from it.
pub fn open_with(loader: ConfigLoader) -> anyhow::Result<Ledger> {
    let config = loader.load()?;
    Ok(open_ledger(&config)?)
}

/// Loads configuration for `project_dir` from every source and creates a
/// ledger from it.
pub fn open_from_dir(project_dir: impl AsRef<Path>) -> anyhow::Result<Ledger> {
    open_with(ConfigLoader::new().with_project_dir(project_dir))
}
