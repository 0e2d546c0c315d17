//! Size and request counters derived from chain activity.

use serde::{Deserialize, Serialize};

/// Running counters kept in step with chain appends.
///
/// All counters are monotonically non-decreasing and only the ledger
/// mutates them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accounting {
    entry_overhead: u64,
    total_size: u64,
    non_payload_size: u64,
    total_resources: u64,
    total_requests: u64,
    accepted_requests: u64,
}

impl Accounting {
    /// Creates zeroed counters charging `entry_overhead` bytes per entry.
    pub fn new(entry_overhead: u64) -> Self {
        Self {
            entry_overhead,
            total_size: 0,
            non_payload_size: 0,
            total_resources: 0,
            total_requests: 0,
            accepted_requests: 0,
        }
    }

    /// Charges one appended entry carrying `billed_bytes` of payload.
    pub(crate) fn charge_entry(&mut self, billed_bytes: u64) {
        self.total_size = self
            .total_size
            .saturating_add(self.entry_overhead)
            .saturating_add(billed_bytes);
        self.non_payload_size = self.non_payload_size.saturating_add(self.entry_overhead);
    }

    pub(crate) fn record_resource(&mut self) {
        self.total_resources += 1;
    }

    pub(crate) fn record_request(&mut self) {
        self.total_requests += 1;
    }

    pub(crate) fn record_acceptance(&mut self) {
        self.accepted_requests += 1;
        debug_assert!(self.accepted_requests <= self.total_requests);
    }

    pub fn entry_overhead(&self) -> u64 {
        self.entry_overhead
    }

    /// Structural overhead of every entry plus billed resource sizes.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Structural overhead only.
    pub fn non_payload_size(&self) -> u64 {
        self.non_payload_size
    }

    pub fn total_resources(&self) -> u64 {
        self.total_resources
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    pub fn accepted_requests(&self) -> u64 {
        self.accepted_requests
    }

    pub fn rejected_requests(&self) -> u64 {
        self.total_requests - self.accepted_requests
    }

    pub fn snapshot(&self) -> LedgerMetrics {
        LedgerMetrics {
            on_chain_size: self.total_size,
            off_chain_size: self.non_payload_size,
            total_resources: self.total_resources,
            total_requests: self.total_requests,
            accepted_requests: self.accepted_requests,
            rejected_requests: self.rejected_requests(),
        }
    }
}

/// Point-in-time copy of the ledger counters, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerMetrics {
    pub on_chain_size: u64,
    pub off_chain_size: u64,
    pub total_resources: u64,
    pub total_requests: u64,
    pub accepted_requests: u64,
    pub rejected_requests: u64,
}
