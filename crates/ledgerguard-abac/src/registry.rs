//! Name registries for rosters and resources.
//!
//! Membership only. Content lives on the chain.

use std::collections::HashSet;

/// Tracks which roster and resource names have been registered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    rosters: HashSet<String>,
    resources: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_roster(&self, name: &str) -> bool {
        self.rosters.contains(name)
    }

    pub fn has_resource(&self, name: &str) -> bool {
        self.resources.contains(name)
    }

    /// Returns the first attribute in `attributes` that is not a registered roster.
    pub fn first_unknown_roster<'a>(&self, attributes: &'a [String]) -> Option<&'a str> {
        attributes
            .iter()
            .find(|a| !self.has_roster(a))
            .map(String::as_str)
    }

    pub fn roster_count(&self) -> usize {
        self.rosters.len()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// Returns false if the name was already present.
    pub(crate) fn insert_roster(&mut self, name: &str) -> bool {
        self.rosters.insert(name.to_string())
    }

    /// Returns false if the name was already present.
    pub(crate) fn insert_resource(&mut self, name: &str) -> bool {
        self.resources.insert(name.to_string())
    }
}
