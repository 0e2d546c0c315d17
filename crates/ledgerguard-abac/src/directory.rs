//! Identity directory: bidirectional user id ↔ user name registry.
//!
//! Users live here, not on the chain. Rosters refer to users by name; the
//! chain attributes entries by id. The directory is the bridge.

use std::collections::HashMap;

use ledgerguard_types::UserId;

use crate::error::{LedgerError, NameKind, Result};

/// Maps user ids to names and back.
///
/// # Invariants
///
/// - `by_id` and `by_name` are exact inverses
/// - No name and no id appears twice
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityDirectory {
    by_id: HashMap<UserId, String>,
    by_name: HashMap<String, UserId>,
}

impl IdentityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` under `user_id`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::DuplicateName`] if `name` is already registered
    /// - [`LedgerError::DuplicateUserId`] if `user_id` is already bound
    /// - [`LedgerError::ReservedUserId`] for [`UserId::SYSTEM`]
    pub fn add_user(&mut self, user_id: UserId, name: impl Into<String>) -> Result<()> {
        let name = name.into();

        if self.by_name.contains_key(&name) {
            return Err(LedgerError::DuplicateName {
                kind: NameKind::User,
                name,
            });
        }
        if user_id.is_system() {
            return Err(LedgerError::ReservedUserId(user_id));
        }
        if self.by_id.contains_key(&user_id) {
            return Err(LedgerError::DuplicateUserId(user_id));
        }

        self.by_name.insert(name.clone(), user_id);
        self.by_id.insert(user_id, name);
        Ok(())
    }

    pub fn id_to_name(&self, user_id: UserId) -> Result<&str> {
        self.by_id
            .get(&user_id)
            .map(String::as_str)
            .ok_or(LedgerError::UserIdNotFound(user_id))
    }

    pub fn name_to_id(&self, name: &str) -> Result<UserId> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| LedgerError::UserNameNotFound(name.to_string()))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
