//! Error types for registration and access requests.

use std::fmt::Display;

use ledgerguard_chain::ChainError;
use ledgerguard_types::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The namespace a registered name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NameKind {
    User,
    Roster,
    Resource,
}

impl Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameKind::User => write!(f, "user"),
            NameKind::Roster => write!(f, "roster"),
            NameKind::Resource => write!(f, "resource"),
        }
    }
}

/// Errors returned by ledger operations.
///
/// Every variant is detected before the ledger is modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("{kind} name already registered: {name}")]
    DuplicateName { kind: NameKind, name: String },

    #[error("user id already registered: {0}")]
    DuplicateUserId(UserId),

    #[error("user id {0} is reserved for the system actor")]
    ReservedUserId(UserId),

    #[error("roster '{0}' has no members")]
    EmptyRoster(String),

    #[error("resource '{resource}' requires unregistered attribute '{attribute}'")]
    UnknownAttribute { resource: String, attribute: String },

    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    #[error("user id not found: {0}")]
    UserIdNotFound(UserId),

    #[error("user name not found: {0}")]
    UserNameNotFound(String),

    #[error("invalid ledger option {field}: {reason}")]
    InvalidOptions {
        field: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl LedgerError {
    /// Returns true for failed lookups of a resource or user.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            LedgerError::ResourceNotFound(_)
                | LedgerError::UserIdNotFound(_)
                | LedgerError::UserNameNotFound(_)
        )
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
