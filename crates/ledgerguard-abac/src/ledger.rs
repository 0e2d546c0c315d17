//! The ledger: registration and the access decision engine.
//!
//! [`Ledger`] ties the record chain, identity directory, name registries
//! and accounting together. Each operation validates first and mutates
//! only once every check has passed, so a failed call leaves the ledger
//! exactly as it was.

use ledgerguard_chain::{
    AttributeRoster, ENTRY_OVERHEAD_BYTES, Entry, Payload, RecordChain, ResourceDescriptor,
};
use ledgerguard_types::{EntryKind, EntryStatus, PositionId, UserId};
use tracing::{debug, info, warn};

use crate::accounting::{Accounting, LedgerMetrics};
use crate::directory::IdentityDirectory;
use crate::error::{LedgerError, NameKind, Result};
use crate::evaluator::{self, Decision, Outcome};
use crate::registry::Registry;

// ============================================================================
// Options
// ============================================================================

/// How a granted request is reflected on the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionRecording {
    /// Promote the request entry from `Rejected` to `Accepted` in place.
    #[default]
    FinalizeInPlace,
    /// Leave the `Rejected` entry untouched and append a second,
    /// `Accepted` access-request entry.
    AppendDecision,
}

/// Construction options for a [`Ledger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerOptions {
    /// Structural bytes charged per entry.
    pub entry_overhead_bytes: u64,
    /// Maintain a name index alongside the chain.
    pub name_index: bool,
    pub decision_recording: DecisionRecording,
    /// Log every access decision.
    pub audit_enabled: bool,
}

impl LedgerOptions {
    /// Rejects option combinations the accounting cannot honor.
    ///
    /// Every entry must cost at least one structural byte, otherwise
    /// `off_chain_size` stops tracking chain length.
    pub fn validate(&self) -> Result<()> {
        if self.entry_overhead_bytes == 0 {
            return Err(LedgerError::InvalidOptions {
                field: "entry_overhead_bytes",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }
}

impl Default for LedgerOptions {
    fn default() -> Self {
        Self {
            entry_overhead_bytes: ENTRY_OVERHEAD_BYTES,
            name_index: true,
            decision_recording: DecisionRecording::FinalizeInPlace,
            audit_enabled: true,
        }
    }
}

// ============================================================================
// Ledger
// ============================================================================

/// Append-only ABAC ledger.
///
/// # Invariants
///
/// - The chain starts with genesis and only grows
/// - User, roster and resource names are each unique for the ledger's lifetime
/// - Every resource's required attributes were registered rosters when it was added
/// - `accepted_requests() <= total_requests()`
#[derive(Debug, Clone)]
pub struct Ledger {
    chain: RecordChain,
    directory: IdentityDirectory,
    registry: Registry,
    accounting: Accounting,
    options: LedgerOptions,
}

impl Ledger {
    /// Creates a ledger with default options.
    pub fn new() -> Self {
        Self::build(LedgerOptions::default())
    }

    /// Creates a ledger, inserting its genesis entry.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidOptions`] if `options` fail [`LedgerOptions::validate`]
    pub fn with_options(options: LedgerOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self::build(options))
    }

    fn build(options: LedgerOptions) -> Self {
        let chain = RecordChain::with_index(options.name_index);
        let mut accounting = Accounting::new(options.entry_overhead_bytes);
        accounting.charge_entry(chain.genesis().payload().billed_bytes());

        Self {
            chain,
            directory: IdentityDirectory::new(),
            registry: Registry::new(),
            accounting,
            options,
        }
    }

    pub fn options(&self) -> &LedgerOptions {
        &self.options
    }

    // ------------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------------

    /// Registers a user. Users are directory records and do not touch the chain.
    pub fn add_user(&mut self, user_id: UserId, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.directory.add_user(user_id, name.clone())?;
        debug!(user_id = %user_id, user = %name, "Registered user");
        Ok(())
    }

    /// Registers an attribute roster and records it on the chain.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::DuplicateName`] if `roster_name` is already registered
    /// - [`LedgerError::EmptyRoster`] if `members` is empty
    pub fn add_attribute(
        &mut self,
        actor_id: UserId,
        members: Vec<String>,
        declared_count: u64,
        roster_name: impl Into<String>,
    ) -> Result<PositionId> {
        let roster_name = roster_name.into();

        if self.registry.has_roster(&roster_name) {
            return Err(LedgerError::DuplicateName {
                kind: NameKind::Roster,
                name: roster_name,
            });
        }
        if members.is_empty() {
            return Err(LedgerError::EmptyRoster(roster_name));
        }

        if declared_count != members.len() as u64 {
            warn!(
                roster = %roster_name,
                declared = declared_count,
                actual = members.len(),
                "Roster member count differs from declared count"
            );
        }

        self.registry.insert_roster(&roster_name);
        let position = self.append(
            EntryKind::Insert,
            EntryStatus::Accepted,
            actor_id,
            Payload::AttributeRoster(AttributeRoster {
                members,
                declared_count,
                roster_name: roster_name.clone(),
            }),
        );

        debug!(roster = %roster_name, position = %position, "Registered roster");
        Ok(position)
    }

    /// Registers a resource and records it on the chain.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::DuplicateName`] if `resource_name` is already registered
    /// - [`LedgerError::UnknownAttribute`] naming the first required
    ///   attribute that is not a registered roster
    pub fn add_resource(
        &mut self,
        actor_id: UserId,
        required_attributes: Vec<String>,
        size_bytes: u64,
        resource_name: impl Into<String>,
    ) -> Result<PositionId> {
        let resource_name = resource_name.into();

        if self.registry.has_resource(&resource_name) {
            return Err(LedgerError::DuplicateName {
                kind: NameKind::Resource,
                name: resource_name,
            });
        }
        if let Some(attribute) = self.registry.first_unknown_roster(&required_attributes) {
            return Err(LedgerError::UnknownAttribute {
                attribute: attribute.to_string(),
                resource: resource_name,
            });
        }

        self.registry.insert_resource(&resource_name);
        let position = self.append(
            EntryKind::Insert,
            EntryStatus::Accepted,
            actor_id,
            Payload::ResourceDescriptor(ResourceDescriptor {
                required_attributes,
                size_bytes,
                resource_name: resource_name.clone(),
            }),
        );
        self.accounting.record_resource();

        debug!(
            resource = %resource_name,
            size_bytes,
            position = %position,
            "Registered resource"
        );
        Ok(position)
    }

    // ------------------------------------------------------------------------
    // Access Decisions
    // ------------------------------------------------------------------------

    /// Evaluates and records a request by `user_id` for `resource_name`.
    ///
    /// Once the user and resource resolve, an access-request entry is
    /// appended whatever the outcome. `Denied` is a recorded outcome, not
    /// an error.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::UserIdNotFound`] if `user_id` is not registered
    /// - [`LedgerError::ResourceNotFound`] if no resource has that name
    ///
    /// Neither failure appends an entry or changes a counter.
    pub fn request_resource(&mut self, user_id: UserId, resource_name: &str) -> Result<Decision> {
        let user_name = self.directory.id_to_name(user_id)?;
        let (_, resource) = self
            .chain
            .find_resource(resource_name)
            .ok_or_else(|| LedgerError::ResourceNotFound(resource_name.to_string()))?;

        // Appending the request marker does not affect roster resolution, so
        // the decision can be computed before the chain is mutated.
        let chain = &self.chain;
        let evaluation = evaluator::evaluate(user_name, resource, |attribute| {
            chain.find_roster(attribute).map(|(_, roster)| roster)
        });
        let reason = evaluation.reason(user_name, resource_name);
        let user_name = user_name.to_string();

        for missing in &evaluation.missing_rosters {
            warn!(
                resource = %resource_name,
                attribute = %missing,
                "Required roster missing from chain; skipped"
            );
        }

        self.accounting.record_request();
        let mut request_position = self.append(
            EntryKind::AccessRequest,
            EntryStatus::Rejected,
            user_id,
            Payload::AccessRequest,
        );

        let outcome = evaluation.outcome();
        if outcome == Outcome::Granted {
            request_position = self.record_grant(user_id, request_position)?;
            self.accounting.record_acceptance();
        }

        if self.options.audit_enabled {
            match outcome {
                Outcome::Granted => info!(
                    user = %user_name,
                    resource = %resource_name,
                    attribute = ?evaluation.matched_attribute,
                    position = %request_position,
                    "Resource access granted"
                ),
                Outcome::Denied => warn!(
                    user = %user_name,
                    resource = %resource_name,
                    position = %request_position,
                    "Resource access denied"
                ),
            }
        }

        Ok(Decision {
            outcome,
            request_position,
            matched_attribute: evaluation.matched_attribute,
            reason,
        })
    }

    /// Reflects a grant on the chain and returns the position holding the
    /// `Accepted` status.
    fn record_grant(&mut self, user_id: UserId, request: PositionId) -> Result<PositionId> {
        match self.options.decision_recording {
            DecisionRecording::FinalizeInPlace => {
                self.chain.finalize(request)?;
                Ok(request)
            }
            DecisionRecording::AppendDecision => Ok(self.append(
                EntryKind::AccessRequest,
                EntryStatus::Accepted,
                user_id,
                Payload::AccessRequest,
            )),
        }
    }

    fn append(
        &mut self,
        kind: EntryKind,
        status: EntryStatus,
        actor_id: UserId,
        payload: Payload,
    ) -> PositionId {
        let billed = payload.billed_bytes();
        let position = self.chain.append(kind, status, actor_id, payload);
        self.accounting.charge_entry(billed);
        position
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn user_to_id(&self, name: &str) -> Result<UserId> {
        self.directory.name_to_id(name)
    }

    pub fn id_to_user(&self, user_id: UserId) -> Result<&str> {
        self.directory.id_to_name(user_id)
    }

    pub fn has_roster(&self, name: &str) -> bool {
        self.registry.has_roster(name)
    }

    pub fn has_resource(&self, name: &str) -> bool {
        self.registry.has_resource(name)
    }

    /// Read-only traversal from genesis to tail.
    pub fn entries(&self) -> std::slice::Iter<'_, Entry> {
        self.chain.iter()
    }

    pub fn chain(&self) -> &RecordChain {
        &self.chain
    }

    pub fn directory(&self) -> &IdentityDirectory {
        &self.directory
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    // ------------------------------------------------------------------------
    // Metrics
    // ------------------------------------------------------------------------

    /// Total size including billed resource bytes.
    pub fn on_chain_size(&self) -> u64 {
        self.accounting.total_size()
    }

    /// Structural size only, excluding resource bytes.
    pub fn off_chain_size(&self) -> u64 {
        self.accounting.non_payload_size()
    }

    pub fn total_resources(&self) -> u64 {
        self.accounting.total_resources()
    }

    pub fn total_requests(&self) -> u64 {
        self.accounting.total_requests()
    }

    pub fn accepted_requests(&self) -> u64 {
        self.accounting.accepted_requests()
    }

    pub fn rejected_requests(&self) -> u64 {
        self.accounting.rejected_requests()
    }

    pub fn metrics(&self) -> LedgerMetrics {
        self.accounting.snapshot()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
