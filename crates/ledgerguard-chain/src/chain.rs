//! The append-only record chain.

use ledgerguard_types::{EntryKind, EntryStatus, PositionId, Timestamp, UserId};
use tracing::debug;

use crate::ChainError;
use crate::entry::{AttributeRoster, Entry, Payload, ResourceDescriptor};
use crate::index::NameIndex;

/// Append-only, position-indexed sequence of entries.
///
/// The chain owns every entry. Entry `i` sits at position `i`; its
/// successor is position `i + 1`.
///
/// # Invariants
///
/// - Position 0 holds the genesis entry
/// - `entries[i].position_id() == i` for every entry
/// - Entries are never removed or reordered
/// - Timestamps are strictly increasing
#[derive(Debug, Clone)]
pub struct RecordChain {
    entries: Vec<Entry>,
    index: Option<NameIndex>,
}

impl RecordChain {
    /// Creates a chain holding only the genesis entry, with the name index
    /// enabled.
    pub fn new() -> Self {
        Self::with_index(true)
    }

    /// Creates a chain holding only the genesis entry.
    ///
    /// With `indexed == false`, name lookups scan from genesis.
    pub fn with_index(indexed: bool) -> Self {
        let genesis = Entry::new(
            UserId::SYSTEM,
            PositionId::GENESIS,
            Timestamp::now(),
            EntryKind::Genesis,
            EntryStatus::Accepted,
            Payload::Empty,
        );

        Self {
            entries: vec![genesis],
            index: indexed.then(NameIndex::new),
        }
    }

    /// Appends a new entry after the current tail and returns its position.
    pub fn append(
        &mut self,
        kind: EntryKind,
        status: EntryStatus,
        actor_id: UserId,
        payload: Payload,
    ) -> PositionId {
        let position = self.tail().position_id().next();
        let timestamp = Timestamp::now_monotonic(Some(self.tail().timestamp()));

        if let Some(index) = self.index.as_mut() {
            index.record(position, &payload);
        }

        debug!(
            position = %position,
            kind = %kind,
            status = %status,
            actor = %actor_id,
            "Appended entry"
        );

        self.entries.push(Entry::new(
            actor_id, position, timestamp, kind, status, payload,
        ));

        debug_assert_eq!(self.entries.len() as u64, position.as_u64() + 1);
        position
    }

    /// Promotes the access request at `position` from `Rejected` to `Accepted`.
    ///
    /// This is the only in-place mutation the chain permits, and it can
    /// happen at most once per entry.
    pub fn finalize(&mut self, position: PositionId) -> Result<(), ChainError> {
        let entry = self
            .entries
            .get_mut(position.as_usize())
            .ok_or(ChainError::PositionOutOfRange(position))?;

        if entry.kind() != EntryKind::AccessRequest {
            return Err(ChainError::NotAnAccessRequest {
                position,
                kind: entry.kind(),
            });
        }

        if entry.status().is_accepted() {
            return Err(ChainError::AlreadyAccepted(position));
        }

        entry.set_status(EntryStatus::Accepted);
        debug!(position = %position, "Finalized access request");
        Ok(())
    }

    /// Returns the first entry whose payload carries `name` as a resource
    /// or roster name.
    pub fn find_by_payload_name(&self, name: &str) -> Option<&Entry> {
        match &self.index {
            Some(index) => index.any(name).and_then(|p| self.get(p)),
            None => self.iter().find(|e| e.payload().name() == Some(name)),
        }
    }

    /// Returns the first entry that registered a resource called `name`.
    pub fn find_resource(&self, name: &str) -> Option<(&Entry, &ResourceDescriptor)> {
        let entry = match &self.index {
            Some(index) => index.resource(name).and_then(|p| self.get(p)),
            None => self
                .iter()
                .find(|e| e.resource().is_some_and(|r| r.resource_name == name)),
        }?;

        entry.resource().map(|r| (entry, r))
    }

    /// Returns the first entry that registered a roster called `name`.
    pub fn find_roster(&self, name: &str) -> Option<(&Entry, &AttributeRoster)> {
        let entry = match &self.index {
            Some(index) => index.roster(name).and_then(|p| self.get(p)),
            None => self
                .iter()
                .find(|e| e.roster().is_some_and(|r| r.roster_name == name)),
        }?;

        entry.roster().map(|r| (entry, r))
    }

    pub fn get(&self, position: PositionId) -> Option<&Entry> {
        self.entries.get(position.as_usize())
    }

    pub fn genesis(&self) -> &Entry {
        &self.entries[0]
    }

    /// The most recently appended entry (genesis on a fresh chain).
    pub fn tail(&self) -> &Entry {
        // Never empty: genesis is inserted at construction.
        &self.entries[self.entries.len() - 1]
    }

    /// Number of entries, genesis included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a chain holds at least its genesis entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_indexed(&self) -> bool {
        self.index.is_some()
    }

    /// Iterates entries from genesis to tail in position order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }
}

impl Default for RecordChain {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a RecordChain {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
