//! Unit tests for the ledger.
//!
//! The ledger does no IO, so every path is exercised directly.

use ledgerguard_chain::{ChainError, ENTRY_OVERHEAD_BYTES, Payload};
use ledgerguard_types::{EntryKind, EntryStatus, PositionId, UserId};
use proptest::prelude::*;
use test_case::test_case;

use crate::{DecisionRecording, Ledger, LedgerError, LedgerOptions, NameKind, Outcome};

// ============================================================================
// Test Helpers
// ============================================================================

const ALICE: UserId = UserId::new(1);
const BOB: UserId = UserId::new(2);

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn ledger_with(options: LedgerOptions) -> Ledger {
    let mut ledger = Ledger::with_options(options).expect("valid options");
    ledger.add_user(ALICE, "alice").expect("register alice");
    ledger.add_user(BOB, "bob").expect("register bob");
    ledger
        .add_attribute(UserId::SYSTEM, names(&["alice"]), 1, "R1")
        .expect("register R1");
    ledger
        .add_resource(ALICE, names(&["R1"]), 50, "doc")
        .expect("register doc");
    ledger
}

/// alice, bob, roster R1 = [alice], resource doc requiring [R1].
fn standard_ledger() -> Ledger {
    ledger_with(LedgerOptions::default())
}

fn quiet() -> LedgerOptions {
    LedgerOptions {
        audit_enabled: false,
        ..LedgerOptions::default()
    }
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn new_ledger_holds_genesis_and_charges_it() {
    let ledger = Ledger::new();

    assert_eq!(ledger.entries().count(), 1);
    assert_eq!(ledger.on_chain_size(), ENTRY_OVERHEAD_BYTES);
    assert_eq!(ledger.off_chain_size(), ENTRY_OVERHEAD_BYTES);
    assert_eq!(ledger.total_requests(), 0);
    assert_eq!(ledger.total_resources(), 0);
}

#[test]
fn custom_overhead_is_charged_per_entry() {
    let mut ledger = Ledger::with_options(LedgerOptions {
        entry_overhead_bytes: 10,
        ..quiet()
    })
    .unwrap();
    ledger
        .add_attribute(UserId::SYSTEM, names(&["alice"]), 1, "R1")
        .unwrap();
    ledger
        .add_resource(UserId::SYSTEM, names(&["R1"]), 100, "file")
        .unwrap();

    assert_eq!(ledger.on_chain_size(), 30 + 100);
    assert_eq!(ledger.off_chain_size(), 30);
}

#[test]
fn zero_overhead_is_rejected() {
    let err = Ledger::with_options(LedgerOptions {
        entry_overhead_bytes: 0,
        ..quiet()
    })
    .unwrap_err();

    assert!(matches!(
        err,
        LedgerError::InvalidOptions {
            field: "entry_overhead_bytes",
            ..
        }
    ));
    assert!(LedgerOptions::default().validate().is_ok());
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn users_do_not_touch_the_chain() {
    let mut ledger = Ledger::new();
    ledger.add_user(ALICE, "alice").unwrap();

    assert_eq!(ledger.entries().count(), 1);
    assert_eq!(ledger.user_to_id("alice").unwrap(), ALICE);
    assert_eq!(ledger.id_to_user(ALICE).unwrap(), "alice");
}

#[test]
fn roster_is_recorded_as_accepted_insert() {
    let mut ledger = Ledger::new();
    let position = ledger
        .add_attribute(UserId::new(7), names(&["alice", "bob"]), 2, "R1")
        .unwrap();

    let entry = ledger.chain().get(position).unwrap();
    assert_eq!(position, PositionId::new(1));
    assert_eq!(entry.kind(), EntryKind::Insert);
    assert_eq!(entry.status(), EntryStatus::Accepted);
    assert_eq!(entry.sequence_id(), UserId::new(7));
    assert_eq!(entry.roster().unwrap().members, names(&["alice", "bob"]));
    assert!(ledger.has_roster("R1"));
    // Roster content is not billed.
    assert_eq!(ledger.on_chain_size(), ledger.off_chain_size());
}

#[test]
fn resource_counts_and_bills_its_size() {
    let ledger = standard_ledger();

    assert_eq!(ledger.total_resources(), 1);
    assert_eq!(ledger.on_chain_size(), 3 * ENTRY_OVERHEAD_BYTES + 50);
    assert_eq!(ledger.off_chain_size(), 3 * ENTRY_OVERHEAD_BYTES);

    let (entry, resource) = ledger.chain().find_resource("doc").unwrap();
    assert_eq!(entry.sequence_id(), ALICE);
    assert_eq!(resource.required_attributes, names(&["R1"]));
}

#[test]
fn declared_count_is_stored_as_given() {
    let mut ledger = Ledger::new();
    let position = ledger
        .add_attribute(UserId::SYSTEM, names(&["alice"]), 5, "R1")
        .unwrap();

    let roster = ledger.chain().get(position).unwrap().roster().unwrap();
    assert_eq!(roster.declared_count, 5);
}

#[test]
fn empty_roster_is_rejected_without_side_effects() {
    let mut ledger = standard_ledger();
    let before = ledger.entries().count();

    let err = ledger
        .add_attribute(UserId::SYSTEM, vec![], 0, "R2")
        .unwrap_err();

    assert_eq!(err, LedgerError::EmptyRoster("R2".to_string()));
    assert!(!ledger.has_roster("R2"));
    assert_eq!(ledger.entries().count(), before);
}

#[test]
fn unknown_attribute_is_rejected_without_side_effects() {
    let mut ledger = standard_ledger();
    let metrics = ledger.metrics();

    let err = ledger
        .add_resource(ALICE, names(&["R1", "Unregistered"]), 10, "fileB")
        .unwrap_err();

    assert_eq!(
        err,
        LedgerError::UnknownAttribute {
            resource: "fileB".to_string(),
            attribute: "Unregistered".to_string(),
        }
    );
    assert!(!ledger.has_resource("fileB"));
    assert_eq!(ledger.metrics(), metrics);
}

#[test_case(NameKind::User ; "user")]
#[test_case(NameKind::Roster ; "roster")]
#[test_case(NameKind::Resource ; "resource")]
fn duplicate_names_are_rejected(kind: NameKind) {
    let mut ledger = standard_ledger();
    let entries = ledger.entries().count();
    let metrics = ledger.metrics();

    let (result, name) = match kind {
        NameKind::User => (ledger.add_user(UserId::new(3), "alice"), "alice"),
        NameKind::Roster => (
            ledger
                .add_attribute(UserId::SYSTEM, names(&["bob"]), 1, "R1")
                .map(|_| ()),
            "R1",
        ),
        NameKind::Resource => (
            ledger
                .add_resource(BOB, names(&["R1"]), 999, "doc")
                .map(|_| ()),
            "doc",
        ),
    };

    assert_eq!(
        result,
        Err(LedgerError::DuplicateName {
            kind,
            name: name.to_string(),
        })
    );
    assert_eq!(ledger.entries().count(), entries);
    assert_eq!(ledger.metrics(), metrics);
}

#[test]
fn duplicate_check_precedes_empty_check() {
    let mut ledger = standard_ledger();
    let err = ledger
        .add_attribute(UserId::SYSTEM, vec![], 0, "R1")
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateName { .. }));
}

#[test]
fn roster_and_resource_may_share_a_name() {
    let mut ledger = quiet_ledger_with_roster("shared", &["alice"]);
    ledger
        .add_resource(ALICE, names(&["shared"]), 1, "shared")
        .unwrap();

    let decision = ledger.request_resource(ALICE, "shared").unwrap();
    assert_eq!(decision.outcome, Outcome::Granted);
}

fn quiet_ledger_with_roster(name: &str, members: &[&str]) -> Ledger {
    let mut ledger = Ledger::with_options(quiet()).unwrap();
    ledger.add_user(ALICE, "alice").unwrap();
    ledger.add_user(BOB, "bob").unwrap();
    ledger
        .add_attribute(UserId::SYSTEM, names(members), members.len() as u64, name)
        .unwrap();
    ledger
}

// ============================================================================
// Access Requests
// ============================================================================

#[test]
fn member_is_granted_and_entry_finalized() {
    let mut ledger = standard_ledger();
    let entries = ledger.entries().count();

    let decision = ledger.request_resource(ALICE, "doc").unwrap();

    assert!(decision.is_granted());
    assert_eq!(decision.matched_attribute.as_deref(), Some("R1"));
    assert_eq!(ledger.entries().count(), entries + 1);

    let entry = ledger.chain().get(decision.request_position).unwrap();
    assert_eq!(entry.kind(), EntryKind::AccessRequest);
    assert_eq!(entry.status(), EntryStatus::Accepted);
    assert_eq!(entry.sequence_id(), ALICE);
    assert_eq!(entry.payload(), &Payload::AccessRequest);
    assert_eq!(ledger.accepted_requests(), 1);
    assert_eq!(ledger.total_requests(), 1);
}

#[test]
fn non_member_is_denied_and_recorded() {
    let mut ledger = standard_ledger();
    let entries = ledger.entries().count();

    let decision = ledger.request_resource(BOB, "doc").unwrap();

    assert_eq!(decision.outcome, Outcome::Denied);
    assert!(decision.matched_attribute.is_none());
    assert_eq!(ledger.entries().count(), entries + 1);
    assert_eq!(
        ledger.chain().tail().status(),
        EntryStatus::Rejected,
        "denied request stays rejected"
    );
    assert_eq!(ledger.total_requests(), 1);
    assert_eq!(ledger.accepted_requests(), 0);
    assert_eq!(ledger.rejected_requests(), 1);
}

#[test]
fn requests_charge_overhead_only() {
    let mut ledger = standard_ledger();
    let before = ledger.metrics();

    ledger.request_resource(BOB, "doc").unwrap();

    assert_eq!(
        ledger.on_chain_size(),
        before.on_chain_size + ENTRY_OVERHEAD_BYTES
    );
    assert_eq!(
        ledger.off_chain_size(),
        before.off_chain_size + ENTRY_OVERHEAD_BYTES
    );
}

#[test]
fn missing_resource_is_not_found_and_appends_nothing() {
    let mut ledger = standard_ledger();
    let entries = ledger.entries().count();
    let metrics = ledger.metrics();

    let err = ledger.request_resource(ALICE, "doesNotExist").unwrap_err();

    assert_eq!(
        err,
        LedgerError::ResourceNotFound("doesNotExist".to_string())
    );
    assert!(err.is_not_found());
    assert_eq!(ledger.entries().count(), entries);
    assert_eq!(ledger.metrics(), metrics);
}

#[test]
fn unknown_user_is_not_found_and_appends_nothing() {
    let mut ledger = standard_ledger();
    let entries = ledger.entries().count();

    let err = ledger.request_resource(UserId::new(99), "doc").unwrap_err();

    assert_eq!(err, LedgerError::UserIdNotFound(UserId::new(99)));
    assert_eq!(ledger.entries().count(), entries);
    assert_eq!(ledger.total_requests(), 0);
}

#[test]
fn roster_name_is_not_a_resource() {
    let mut ledger = standard_ledger();
    let err = ledger.request_resource(ALICE, "R1").unwrap_err();
    assert_eq!(err, LedgerError::ResourceNotFound("R1".to_string()));
}

#[test]
fn later_attribute_can_grant() {
    let mut ledger = standard_ledger();
    ledger
        .add_attribute(UserId::SYSTEM, names(&["bob"]), 1, "R2")
        .unwrap();
    ledger
        .add_resource(ALICE, names(&["R1", "R2"]), 10, "shared-doc")
        .unwrap();

    let decision = ledger.request_resource(BOB, "shared-doc").unwrap();

    assert_eq!(decision.outcome, Outcome::Granted);
    assert_eq!(decision.matched_attribute.as_deref(), Some("R2"));
}

#[test]
fn append_decision_mode_never_mutates_history() {
    let mut ledger = ledger_with(LedgerOptions {
        decision_recording: DecisionRecording::AppendDecision,
        ..quiet()
    });
    let entries = ledger.entries().count();

    let decision = ledger.request_resource(ALICE, "doc").unwrap();

    assert!(decision.is_granted());
    assert_eq!(ledger.entries().count(), entries + 2);

    let marker = ledger
        .chain()
        .get(PositionId::new(decision.request_position.as_u64() - 1))
        .unwrap();
    let accepted = ledger.chain().get(decision.request_position).unwrap();
    assert_eq!(marker.kind(), EntryKind::AccessRequest);
    assert_eq!(marker.status(), EntryStatus::Rejected);
    assert_eq!(accepted.kind(), EntryKind::AccessRequest);
    assert_eq!(accepted.status(), EntryStatus::Accepted);
    assert_eq!(accepted.sequence_id(), ALICE);
    assert_eq!(ledger.accepted_requests(), 1);
    assert_eq!(ledger.total_requests(), 1);
}

#[test]
fn finalized_entries_cannot_be_finalized_again() {
    let mut ledger = standard_ledger();
    let decision = ledger.request_resource(ALICE, "doc").unwrap();

    let mut chain = ledger.chain().clone();
    assert_eq!(
        chain.finalize(decision.request_position),
        Err(ChainError::AlreadyAccepted(decision.request_position))
    );
}

#[test_case(true ; "indexed")]
#[test_case(false ; "linear scan")]
fn end_to_end_scenario(name_index: bool) {
    let mut ledger = ledger_with(LedgerOptions {
        name_index,
        ..LedgerOptions::default()
    });

    let bob = ledger.user_to_id("bob").unwrap();
    let alice = ledger.user_to_id("alice").unwrap();

    assert_eq!(
        ledger.request_resource(bob, "doc").unwrap().outcome,
        Outcome::Denied
    );
    assert_eq!(
        ledger.request_resource(alice, "doc").unwrap().outcome,
        Outcome::Granted
    );
    assert_eq!(ledger.accepted_requests(), 1);
    assert_eq!(ledger.total_requests(), 2);

    let statuses: Vec<_> = ledger.entries().map(|e| (e.kind(), e.status())).collect();
    assert_eq!(
        statuses,
        vec![
            (EntryKind::Genesis, EntryStatus::Accepted),
            (EntryKind::Insert, EntryStatus::Accepted),
            (EntryKind::Insert, EntryStatus::Accepted),
            (EntryKind::AccessRequest, EntryStatus::Rejected),
            (EntryKind::AccessRequest, EntryStatus::Accepted),
        ]
    );
}

// ============================================================================
// Audit Events
// ============================================================================

mod audit_events {
    use std::sync::{Arc, Mutex};

    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;

    type Captured = Arc<Mutex<Vec<(Level, String)>>>;

    #[derive(Default)]
    struct CaptureLayer {
        events: Captured,
    }

    #[derive(Default)]
    struct MessageVisitor {
        message: String,
    }

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.message = format!("{value:?}");
            }
        }
    }

    impl<S: Subscriber> Layer<S> for CaptureLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = MessageVisitor::default();
            event.record(&mut visitor);
            self.events
                .lock()
                .unwrap()
                .push((*event.metadata().level(), visitor.message));
        }
    }

    /// Runs one grant (alice) and one denial (bob), returning the
    /// decision events emitted.
    fn decision_events(options: LedgerOptions) -> Vec<(Level, String)> {
        let layer = CaptureLayer::default();
        let events = Arc::clone(&layer.events);
        let subscriber = Registry::default().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let mut ledger = ledger_with(options);
            assert!(ledger.request_resource(ALICE, "doc").unwrap().is_granted());
            assert!(!ledger.request_resource(BOB, "doc").unwrap().is_granted());
        });

        let captured = events.lock().unwrap();
        captured
            .iter()
            .filter(|(_, message)| message.starts_with("Resource access"))
            .cloned()
            .collect()
    }

    #[test]
    fn audit_logs_grant_at_info_and_denial_at_warn() {
        let events = decision_events(LedgerOptions::default());

        assert_eq!(
            events,
            vec![
                (Level::INFO, "Resource access granted".to_string()),
                (Level::WARN, "Resource access denied".to_string()),
            ]
        );
    }

    #[test]
    fn disabled_audit_emits_no_decision_events() {
        assert!(decision_events(quiet()).is_empty());
    }
}

// ============================================================================
// Property Tests
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    User(u8, u8),
    Roster(u8, Vec<u8>),
    Resource(u8, Vec<u8>, u16),
    Request(u8, u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u8..6, 0u8..6).prop_map(|(id, n)| Op::User(id, n)),
        (0u8..4, prop::collection::vec(0u8..6, 0..3)).prop_map(|(n, m)| Op::Roster(n, m)),
        (0u8..4, prop::collection::vec(0u8..4, 0..3), any::<u16>())
            .prop_map(|(n, a, s)| Op::Resource(n, a, s)),
        (1u8..6, 0u8..5).prop_map(|(u, r)| Op::Request(u, r)),
    ]
}

fn run(ledger: &mut Ledger, op: &Op) -> bool {
    match op {
        Op::User(id, n) => ledger
            .add_user(UserId::new(u64::from(*id)), format!("user{n}"))
            .is_ok(),
        Op::Roster(n, members) => ledger
            .add_attribute(
                UserId::SYSTEM,
                members.iter().map(|m| format!("user{m}")).collect(),
                members.len() as u64,
                format!("role{n}"),
            )
            .is_ok(),
        Op::Resource(n, attrs, size) => ledger
            .add_resource(
                UserId::SYSTEM,
                attrs.iter().map(|a| format!("role{a}")).collect(),
                u64::from(*size),
                format!("file{n}"),
            )
            .is_ok(),
        Op::Request(u, r) => ledger
            .request_resource(UserId::new(u64::from(*u)), &format!("file{r}"))
            .is_ok(),
    }
}

proptest! {
    #[test]
    fn ledger_invariants_hold(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut ledger = Ledger::with_options(quiet()).unwrap();

        for op in &ops {
            let before = ledger.metrics();
            let entries_before = ledger.entries().count();
            let ok = run(&mut ledger, op);
            let after = ledger.metrics();

            prop_assert!(after.total_requests >= before.total_requests);
            prop_assert!(after.total_resources >= before.total_resources);
            prop_assert!(after.on_chain_size >= before.on_chain_size);
            prop_assert!(after.accepted_requests <= after.total_requests);

            if !ok {
                prop_assert_eq!(after, before, "failed op must not change counters");
                prop_assert_eq!(ledger.entries().count(), entries_before);
            }
        }

        for (i, entry) in ledger.entries().enumerate() {
            prop_assert_eq!(entry.position_id().as_usize(), i);
        }

        let accepted = ledger
            .entries()
            .filter(|e| e.kind() == EntryKind::AccessRequest && e.status().is_accepted())
            .count() as u64;
        prop_assert_eq!(accepted, ledger.accepted_requests());
    }

    #[test]
    fn each_name_registers_once(attempts in prop::collection::vec(0u8..4, 1..20)) {
        let mut ledger = Ledger::with_options(quiet()).unwrap();
        let mut successes = std::collections::HashMap::new();

        for n in &attempts {
            if ledger
                .add_attribute(UserId::SYSTEM, names(&["alice"]), 1, format!("role{n}"))
                .is_ok()
            {
                *successes.entry(*n).or_insert(0) += 1;
            }
        }

        prop_assert!(successes.values().all(|&count| count == 1));
        prop_assert_eq!(ledger.registry().roster_count(), successes.len());
    }
}
