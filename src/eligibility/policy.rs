//! Role policy: which roles the bot manages and when each is granted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::RoleId;

/// Errors detected while validating a role policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// A role id of zero is never a valid role.
    #[error("role for {slot} must not be zero")]
    ZeroRole { slot: String },

    /// The same role appears in two slots of the policy.
    #[error("role {role} is configured for both {first} and {second}")]
    DuplicateRole {
        role: RoleId,
        first: String,
        second: String,
    },
}

/// A score tier: `role` is eligible when the score reaches `min_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreThreshold {
    pub min_score: u64,
    pub role: RoleId,
}

impl From<(u64, RoleId)> for ScoreThreshold {
    fn from((min_score, role): (u64, RoleId)) -> Self {
        ScoreThreshold { min_score, role }
    }
}

/// The validated role policy, loaded once at startup.
///
/// The JSON layout matches the `hiscore_roles` block of the settings file:
///
/// ```json
/// {
///   "hiscores_leader": 1,
///   "first_place_holder": 2,
///   "second_place_holder": 3,
///   "third_place_holder": 4,
///   "scores": [[100, 10], [500, 11], [1000, 12]]
/// }
/// ```
///
/// `scores` is scanned in the order written. The first tier whose minimum the
/// score reaches wins, so an ascending list grants the *lowest* qualifying
/// tier. The order is never re-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRolePolicy", into = "RawRolePolicy")]
pub struct RolePolicy {
    leader_role: RoleId,
    first_place_role: RoleId,
    second_place_role: RoleId,
    third_place_role: RoleId,
    score_thresholds: Vec<ScoreThreshold>,
}

impl RolePolicy {
    /// Builds and validates a policy.
    pub fn new(
        leader_role: RoleId,
        first_place_role: RoleId,
        second_place_role: RoleId,
        third_place_role: RoleId,
        score_thresholds: impl IntoIterator<Item = ScoreThreshold>,
    ) -> Result<Self, PolicyError> {
        let policy = RolePolicy {
            leader_role,
            first_place_role,
            second_place_role,
            third_place_role,
            score_thresholds: score_thresholds.into_iter().collect(),
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn leader_role(&self) -> RoleId {
        self.leader_role
    }

    pub fn first_place_role(&self) -> RoleId {
        self.first_place_role
    }

    pub fn second_place_role(&self) -> RoleId {
        self.second_place_role
    }

    pub fn third_place_role(&self) -> RoleId {
        self.third_place_role
    }

    /// Score tiers in scan order.
    pub fn score_thresholds(&self) -> &[ScoreThreshold] {
        &self.score_thresholds
    }

    /// Every role this policy manages, in decision order.
    pub fn managed_roles(&self) -> impl Iterator<Item = RoleId> + '_ {
        [
            self.leader_role,
            self.first_place_role,
            self.second_place_role,
            self.third_place_role,
        ]
        .into_iter()
        .chain(self.score_thresholds.iter().map(|t| t.role))
    }

    fn slots(&self) -> Vec<(String, RoleId)> {
        let mut slots = vec![
            ("hiscores_leader".to_string(), self.leader_role),
            ("first_place_holder".to_string(), self.first_place_role),
            ("second_place_holder".to_string(), self.second_place_role),
            ("third_place_holder".to_string(), self.third_place_role),
        ];
        for (i, threshold) in self.score_thresholds.iter().enumerate() {
            slots.push((format!("scores[{}]", i), threshold.role));
        }
        slots
    }

    fn validate(&self) -> Result<(), PolicyError> {
        let slots = self.slots();
        let mut seen: HashSet<RoleId> = HashSet::new();

        for (slot, role) in &slots {
            if role.get() == 0 {
                return Err(PolicyError::ZeroRole { slot: slot.clone() });
            }
            if !seen.insert(*role) {
                let first = slots
                    .iter()
                    .find(|(_, r)| r == role)
                    .map(|(s, _)| s.clone())
                    .unwrap_or_default();
                return Err(PolicyError::DuplicateRole {
                    role: *role,
                    first,
                    second: slot.clone(),
                });
            }
        }

        Ok(())
    }
}

/// Wire form of [`RolePolicy`], using the settings file's field names.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawRolePolicy {
    hiscores_leader: RoleId,
    first_place_holder: RoleId,
    second_place_holder: RoleId,
    third_place_holder: RoleId,
    scores: Vec<(u64, RoleId)>,
}

impl TryFrom<RawRolePolicy> for RolePolicy {
    type Error = PolicyError;

    fn try_from(raw: RawRolePolicy) -> Result<Self, Self::Error> {
        RolePolicy::new(
            raw.hiscores_leader,
            raw.first_place_holder,
            raw.second_place_holder,
            raw.third_place_holder,
            raw.scores.into_iter().map(ScoreThreshold::from),
        )
    }
}

impl From<RolePolicy> for RawRolePolicy {
    fn from(policy: RolePolicy) -> Self {
        RawRolePolicy {
            hiscores_leader: policy.leader_role,
            first_place_holder: policy.first_place_role,
            second_place_holder: policy.second_place_role,
            third_place_holder: policy.third_place_role,
            scores: policy
                .score_thresholds
                .into_iter()
                .map(|t| (t.min_score, t.role))
                .collect(),
        }
    }
}
