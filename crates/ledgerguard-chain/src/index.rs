//! Name index for O(1) payload lookups.
//!
//! The [`NameIndex`] maps resource and roster names to the position of the
//! first entry that carries them. It is a side structure: the chain remains
//! the source of truth, and every lookup through the index returns exactly
//! what a linear scan from genesis would return.
//!
//! # Invariants
//!
//! - Each name maps to the lowest position carrying it (first insert wins)
//! - Resource names and roster names live in separate maps, so a roster and
//!   a resource that share a name do not collide

use std::collections::HashMap;

use ledgerguard_types::PositionId;

use crate::entry::Payload;

/// Maps payload names to chain positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameIndex {
    resources: HashMap<String, PositionId>,
    rosters: HashMap<String, PositionId>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the payload appended at `position`.
    ///
    /// Unnamed payloads are ignored. A name already present keeps its
    /// earlier position.
    pub fn record(&mut self, position: PositionId, payload: &Payload) {
        let (map, name) = match payload {
            Payload::ResourceDescriptor(r) => (&mut self.resources, &r.resource_name),
            Payload::AttributeRoster(r) => (&mut self.rosters, &r.roster_name),
            Payload::Empty | Payload::AccessRequest => return,
        };

        map.entry(name.clone()).or_insert(position);
    }

    pub fn resource(&self, name: &str) -> Option<PositionId> {
        self.resources.get(name).copied()
    }

    pub fn roster(&self, name: &str) -> Option<PositionId> {
        self.rosters.get(name).copied()
    }

    /// Position of the first entry carrying `name` as either kind.
    pub fn any(&self, name: &str) -> Option<PositionId> {
        match (self.resource(name), self.roster(name)) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Number of indexed names across both kinds.
    pub fn len(&self) -> usize {
        self.resources.len() + self.rosters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
