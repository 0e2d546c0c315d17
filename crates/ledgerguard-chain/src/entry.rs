//! Entry and payload types for the record chain.
//!
//! # Entry Layout
//!
//! ```text
//! [sequence_id:u64][position_id:u64][timestamp:u64][kind:u8][status:u8][successor:u64] + payload
//!        8B               8B              8B          1B        1B          8B
//! ```
//!
//! The header is what the ledger charges as structural overhead for every
//! entry. The successor link is implicit in the indexed log but still
//! counted, so size accounting matches a linked-chain layout.

use chrono::{DateTime, Utc};
use ledgerguard_types::{EntryKind, EntryStatus, PositionId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Structural overhead of one entry: sequence(8) + position(8) + timestamp(8)
/// + kind(1) + status(1) + successor(8) = 34 bytes.
pub const ENTRY_OVERHEAD_BYTES: u64 = 34;

// ============================================================================
// Payload
// ============================================================================

/// A named object whose access is gated by one or more rosters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Roster names, any one of which grants access. Evaluated in order.
    pub required_attributes: Vec<String>,
    /// Billed storage size of the resource.
    pub size_bytes: u64,
    pub resource_name: String,
}

/// A named list of user names (an ABAC role).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeRoster {
    pub members: Vec<String>,
    /// Member count as declared by the registering caller.
    pub declared_count: u64,
    pub roster_name: String,
}

impl AttributeRoster {
    /// Returns true if `user_name` is listed in this roster.
    pub fn contains(&self, user_name: &str) -> bool {
        self.members.iter().any(|m| m == user_name)
    }
}

/// The typed content of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Payload {
    /// No data (genesis).
    Empty,
    ResourceDescriptor(ResourceDescriptor),
    AttributeRoster(AttributeRoster),
    /// Marker for an evaluated request. The requester is the entry's
    /// `sequence_id`.
    AccessRequest,
}

impl Payload {
    /// Returns the resource or roster name carried by this payload.
    pub fn name(&self) -> Option<&str> {
        match self {
            Payload::ResourceDescriptor(r) => Some(&r.resource_name),
            Payload::AttributeRoster(r) => Some(&r.roster_name),
            Payload::Empty | Payload::AccessRequest => None,
        }
    }

    /// Bytes of payload content billed to on-chain size.
    ///
    /// Only resources are billed; rosters are metadata.
    pub fn billed_bytes(&self) -> u64 {
        match self {
            Payload::ResourceDescriptor(r) => r.size_bytes,
            _ => 0,
        }
    }
}

// ============================================================================
// Entry
// ============================================================================

/// One element of the record chain.
///
/// Entries are immutable once appended, with one exception: an
/// `AccessRequest` entry can be promoted from `Rejected` to `Accepted`
/// exactly once through [`RecordChain::finalize`](crate::RecordChain::finalize).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    sequence_id: UserId,
    position_id: PositionId,
    timestamp: Timestamp,
    kind: EntryKind,
    status: EntryStatus,
    payload: Payload,
}

impl Entry {
    pub(crate) fn new(
        sequence_id: UserId,
        position_id: PositionId,
        timestamp: Timestamp,
        kind: EntryKind,
        status: EntryStatus,
        payload: Payload,
    ) -> Self {
        Self {
            sequence_id,
            position_id,
            timestamp,
            kind,
            status,
            payload,
        }
    }

    /// The actor that created this entry.
    pub fn sequence_id(&self) -> UserId {
        self.sequence_id
    }

    pub fn position_id(&self) -> PositionId {
        self.position_id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// The append time as a calendar date-time.
    ///
    /// Saturates at the latest representable instant (year 2262).
    pub fn recorded_at(&self) -> DateTime<Utc> {
        let nanos = i64::try_from(self.timestamp.as_nanos()).unwrap_or(i64::MAX);
        DateTime::from_timestamp_nanos(nanos)
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn status(&self) -> EntryStatus {
        self.status
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns the resource descriptor if this entry registered a resource.
    pub fn resource(&self) -> Option<&ResourceDescriptor> {
        match &self.payload {
            Payload::ResourceDescriptor(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the roster if this entry registered one.
    pub fn roster(&self) -> Option<&AttributeRoster> {
        match &self.payload {
            Payload::AttributeRoster(r) => Some(r),
            _ => None,
        }
    }

    pub(crate) fn set_status(&mut self, status: EntryStatus) {
        self.status = status;
    }
}
