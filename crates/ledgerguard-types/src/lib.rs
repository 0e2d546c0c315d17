//! # ledgerguard-types: Core types for `ledgerguard`
//!
//! This crate contains shared types used across the ledger:
//! - Entity IDs ([`UserId`], [`PositionId`])
//! - Temporal types ([`Timestamp`])
//! - Entry classification ([`EntryKind`], [`EntryStatus`])

use std::{
    fmt::Display,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

// ============================================================================
// Entity IDs - All Copy (cheap 8-byte values)
// ============================================================================

/// Identifier of a registered user, and of the actor that created an entry.
///
/// Id 0 is reserved for the system (genesis and administrative inserts).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct UserId(u64);

impl UserId {
    /// The system actor.
    pub const SYSTEM: UserId = UserId(0);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns true for the reserved system actor.
    pub fn is_system(&self) -> bool {
        self.0 == 0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<UserId> for u64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

/// Position of an entry within the chain.
///
/// Positions are zero-indexed and sequential. Genesis sits at position 0,
/// the first appended entry at 1, and so on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct PositionId(u64);

impl PositionId {
    pub const GENESIS: PositionId = PositionId(0);

    pub const fn new(position: u64) -> Self {
        Self(position)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns the position as a `usize` for indexing.
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }

    /// Returns the position immediately after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for PositionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for PositionId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<PositionId> for u64 {
    fn from(position: PositionId) -> Self {
        position.0
    }
}

// ============================================================================
// Timestamp - Copy (8-byte value with monotonic guarantee)
// ============================================================================

/// Wall-clock timestamp with monotonic guarantee within a chain.
///
/// Stored as nanoseconds since Unix epoch (1970-01-01 00:00:00 UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The Unix epoch (1970-01-01 00:00:00 UTC).
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Creates a timestamp from nanoseconds since Unix epoch.
    pub fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    /// Returns the timestamp as nanoseconds since Unix epoch.
    pub fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Returns the timestamp as seconds since Unix epoch (truncates nanoseconds).
    pub fn as_secs(&self) -> u64 {
        self.0 / 1_000_000_000
    }

    /// Creates a timestamp for the current time.
    ///
    /// A system clock set before the Unix epoch reads as [`Timestamp::EPOCH`].
    pub fn now() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64);
        Self(nanos)
    }

    /// Creates a timestamp ensuring monotonicity: `max(now, last + 1ns)`.
    ///
    /// # Arguments
    ///
    /// * `last` - The previous timestamp, if any. Pass `None` for the first timestamp.
    pub fn now_monotonic(last: Option<Timestamp>) -> Self {
        Self::now().after(last)
    }

    /// Returns `self`, bumped to `last + 1ns` if it does not already exceed `last`.
    pub fn after(self, last: Option<Timestamp>) -> Self {
        match last {
            Some(prev) if self.0 <= prev.0 => Timestamp(prev.0.saturating_add(1)),
            _ => self,
        }
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secs = self.0 / 1_000_000_000;
        let nanos = self.0 % 1_000_000_000;
        write!(f, "{secs}.{nanos:09}")
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::EPOCH
    }
}

impl From<u64> for Timestamp {
    fn from(nanos: u64) -> Self {
        Self(nanos)
    }
}

impl From<Timestamp> for u64 {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

// ============================================================================
// Entry Classification - Copy (single-byte enums)
// ============================================================================

/// The event an entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// The first entry of every chain.
    Genesis,
    /// Registration of a roster or resource.
    Insert,
    /// An evaluated access request.
    AccessRequest,
}

impl EntryKind {
    /// Returns the single-byte discriminant.
    pub fn as_byte(&self) -> u8 {
        match self {
            EntryKind::Genesis => 0,
            EntryKind::AccessRequest => 1,
            EntryKind::Insert => 2,
        }
    }

    /// Creates an `EntryKind` from its byte discriminant.
    ///
    /// Returns `None` if the byte is not a valid discriminant.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(EntryKind::Genesis),
            1 => Some(EntryKind::AccessRequest),
            2 => Some(EntryKind::Insert),
            _ => None,
        }
    }
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Genesis => write!(f, "GENESIS"),
            EntryKind::Insert => write!(f, "INSERT"),
            EntryKind::AccessRequest => write!(f, "ACCESS_REQUEST"),
        }
    }
}

/// Whether the event an entry records took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryStatus {
    Accepted,
    Rejected,
}

impl EntryStatus {
    /// Returns the single-byte discriminant.
    pub fn as_byte(&self) -> u8 {
        match self {
            EntryStatus::Accepted => 0,
            EntryStatus::Rejected => 1,
        }
    }

    /// Creates an `EntryStatus` from its byte discriminant.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(EntryStatus::Accepted),
            1 => Some(EntryStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, EntryStatus::Accepted)
    }
}

impl Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryStatus::Accepted => write!(f, "ACCEPTED"),
            EntryStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
