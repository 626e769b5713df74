//! Role reconciliation: diffing decisions against held roles, then applying
//! the difference.
//!
//! [`reconcile`] is pure. [`apply_changes`] issues exactly one API call per
//! `Grant` or `Revoke`, sequentially, and never aborts on a failed call: the
//! failure is logged and counted, and the next sweep gets another chance.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::effects::{DiscordEffect, DiscordInterpreter};
use crate::eligibility::RoleDecision;
use crate::types::{RoleId, UserId};

/// What to do with one role for one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleAction {
    /// Member should hold the role and does not.
    Grant,
    /// Member holds the role and should not.
    Revoke,
    /// Held state already matches the decision.
    NoOp,
}

/// A planned action on one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleChange {
    pub role: RoleId,
    pub action: RoleAction,
}

/// Plans the actions that converge `current` to `decisions`.
///
/// The result has one change per decision, in decision order. Roles in
/// `current` that no decision mentions are left alone.
pub fn reconcile(current: &HashSet<RoleId>, decisions: &[RoleDecision]) -> Vec<RoleChange> {
    decisions
        .iter()
        .map(|decision| {
            let held = current.contains(&decision.role);
            let action = match (decision.should_hold, held) {
                (true, false) => RoleAction::Grant,
                (false, true) => RoleAction::Revoke,
                _ => RoleAction::NoOp,
            };
            RoleChange {
                role: decision.role,
                action,
            }
        })
        .collect()
}

/// Counts from applying one member's changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub granted: usize,
    pub revoked: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl ApplyOutcome {
    /// Number of API calls that were attempted.
    pub fn calls(&self) -> usize {
        self.granted + self.revoked + self.failed
    }
}

/// Issues the Grant/Revoke calls in `changes` for `user`, one at a time.
pub async fn apply_changes<I: DiscordInterpreter>(
    interpreter: &I,
    user: UserId,
    changes: &[RoleChange],
) -> ApplyOutcome {
    let mut outcome = ApplyOutcome::default();

    for change in changes {
        let (effect, verb) = match change.action {
            RoleAction::NoOp => {
                outcome.unchanged += 1;
                continue;
            }
            RoleAction::Grant => (
                DiscordEffect::AddMemberRole {
                    user,
                    role: change.role,
                },
                "grant",
            ),
            RoleAction::Revoke => (
                DiscordEffect::RemoveMemberRole {
                    user,
                    role: change.role,
                },
                "revoke",
            ),
        };

        match interpreter.interpret(effect).await {
            Ok(_) => {
                debug!(user = %user, role = %change.role, action = verb, "Applied role change");
                match change.action {
                    RoleAction::Grant => outcome.granted += 1,
                    _ => outcome.revoked += 1,
                }
            }
            Err(e) => {
                warn!(
                    user = %user,
                    role = %change.role,
                    action = verb,
                    error = %e,
                    "Role change failed, continuing"
                );
                outcome.failed += 1;
            }
        }
    }

    outcome
}
