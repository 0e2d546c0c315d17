//! Access decision evaluation.
//!
//! Evaluates a user against a resource's required attributes in the order
//! the resource lists them. The first roster that contains the user grants
//! access. There is no explicit deny and no attribute priority; a user
//! matched by no roster is denied.

use ledgerguard_chain::{AttributeRoster, ResourceDescriptor};
use ledgerguard_types::PositionId;
use serde::{Deserialize, Serialize};

// ============================================================================
// Decision
// ============================================================================

/// Outcome of an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Granted,
    Denied,
}

/// The recorded result of an access request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether access was granted.
    pub outcome: Outcome,
    /// Position of the access-request entry that reflects this outcome.
    pub request_position: PositionId,
    /// The roster that granted access, or `None` if denied.
    pub matched_attribute: Option<String>,
    /// Human-readable explanation of the decision.
    pub reason: String,
}

impl Decision {
    pub fn is_granted(&self) -> bool {
        self.outcome == Outcome::Granted
    }
}

/// Result of evaluating one request, before it is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Evaluation {
    /// First required attribute whose roster contains the user.
    pub matched_attribute: Option<String>,
    /// Required attributes with no roster on the chain, in evaluation order.
    ///
    /// Only attributes evaluated before a match are listed.
    pub missing_rosters: Vec<String>,
}

impl Evaluation {
    pub fn outcome(&self) -> Outcome {
        if self.matched_attribute.is_some() {
            Outcome::Granted
        } else {
            Outcome::Denied
        }
    }

    /// Explains the outcome for `user_name` on `resource_name`.
    pub fn reason(&self, user_name: &str, resource_name: &str) -> String {
        match &self.matched_attribute {
            Some(attr) => format!("'{user_name}' is a member of '{attr}' required by '{resource_name}'"),
            None => format!(
                "'{user_name}' is not a member of any roster required by '{resource_name}'"
            ),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Evaluates whether `user_name` may access `resource`.
///
/// `resolve` maps an attribute name to its roster. Attributes it cannot
/// resolve are skipped and reported in [`Evaluation::missing_rosters`].
///
/// # Postcondition
///
/// `matched_attribute`, when set, is the earliest entry of
/// `resource.required_attributes` whose roster contains `user_name`.
pub fn evaluate<'a, F>(user_name: &str, resource: &ResourceDescriptor, mut resolve: F) -> Evaluation
where
    F: FnMut(&str) -> Option<&'a AttributeRoster>,
{
    let mut evaluation = Evaluation::default();

    for attribute in &resource.required_attributes {
        match resolve(attribute) {
            None => evaluation.missing_rosters.push(attribute.clone()),
            Some(roster) if roster.contains(user_name) => {
                evaluation.matched_attribute = Some(attribute.clone());
                break;
            }
            Some(_) => {}
        }
    }

    evaluation
}

// ============================================================================
// Tests
// ============================================================================
