//! Role eligibility: maps a leaderboard entry to role decisions.
//!
//! [`evaluate`] is pure and total. It performs no I/O and never fails; an
//! absent entry (see [`Entry::empty`]) simply yields "do not hold" for every
//! managed role, which is how a member's roles are cleared.
//!
//! # Rules
//!
//! | Role | Eligible when |
//! |------|---------------|
//! | leader | `rank == 1` |
//! | first place | `first_places >= 1` |
//! | second place | no firsts and `second_places >= 1` |
//! | third place | no firsts, no seconds and `third_places >= 1` |
//! | score tier | first tier in policy order with `score >= min_score` |
//!
//! The placement roles form a priority chain: a better placement suppresses
//! every worse one. The leader role is independent of placements.

mod policy;

use serde::{Deserialize, Serialize};

use crate::types::{Entry, RoleId};

pub use policy::{PolicyError, RolePolicy, ScoreThreshold};

/// Whether a member should hold a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleDecision {
    pub role: RoleId,
    pub should_hold: bool,
}

impl RoleDecision {
    pub fn new(role: RoleId, should_hold: bool) -> Self {
        RoleDecision { role, should_hold }
    }
}

/// Decides every managed role for `entry`.
///
/// Decisions come out in a fixed order: leader, first, second, third, then
/// the score tiers in policy order. At most one score tier is ever eligible.
pub fn evaluate(entry: &Entry, policy: &RolePolicy) -> Vec<RoleDecision> {
    let mut decisions = Vec::with_capacity(4 + policy.score_thresholds().len());

    decisions.push(RoleDecision::new(policy.leader_role(), entry.is_leader()));
    decisions.push(RoleDecision::new(policy.first_place_role(), entry.first_best()));
    decisions.push(RoleDecision::new(policy.second_place_role(), entry.second_best()));
    decisions.push(RoleDecision::new(policy.third_place_role(), entry.third_best()));

    // First match wins, in configured order.
    let mut tier_granted = false;
    for threshold in policy.score_thresholds() {
        let eligible = !tier_granted && !entry.is_empty() && entry.score >= threshold.min_score;
        tier_granted |= eligible;
        decisions.push(RoleDecision::new(threshold.role, eligible));
    }

    decisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{arb_entry, test_policy};
    use proptest::prelude::*;

    fn decision_for(decisions: &[RoleDecision], role: u64) -> bool {
        decisions
            .iter()
            .find(|d| d.role == RoleId(role))
            .map(|d| d.should_hold)
            .unwrap()
    }

    fn entry(rank: u32, score: u64, places: (u32, u32, u32)) -> Entry {
        Entry {
            id: 1,
            rank,
            name: "Zed".to_string(),
            score,
            first_places: places.0,
            second_places: places.1,
            third_places: places.2,
        }
    }

    proptest! {
        #[test]
        fn rank_one_always_gets_leader(e in arb_entry()) {
            let e = Entry { rank: 1, ..e };
            let decisions = evaluate(&e, &test_policy());
            prop_assert!(decision_for(&decisions, 1));
        }

        #[test]
        fn placement_roles_are_a_priority_chain(e in arb_entry()) {
            let decisions = evaluate(&e, &test_policy());
            let held = [2, 3, 4].iter().filter(|r| decision_for(&decisions, **r)).count();
            prop_assert!(held <= 1);
            if e.first_places >= 1 {
                prop_assert!(decision_for(&decisions, 2));
                prop_assert!(!decision_for(&decisions, 3));
                prop_assert!(!decision_for(&decisions, 4));
            }
        }

        #[test]
        fn at_most_one_score_tier(e in arb_entry()) {
            let decisions = evaluate(&e, &test_policy());
            let tiers = decisions[4..].iter().filter(|d| d.should_hold).count();
            prop_assert!(tiers <= 1);
        }

        #[test]
        fn decisions_cover_every_managed_role_in_order(e in arb_entry()) {
            let policy = test_policy();
            let roles: Vec<RoleId> = evaluate(&e, &policy).iter().map(|d| d.role).collect();
            let managed: Vec<RoleId> = policy.managed_roles().collect();
            prop_assert_eq!(roles, managed);
        }

        #[test]
        fn evaluate_is_deterministic(e in arb_entry()) {
            let policy = test_policy();
            prop_assert_eq!(evaluate(&e, &policy), evaluate(&e, &policy));
        }
    }

    #[test]
    fn empty_entry_holds_nothing() {
        let policy = test_policy();
        let first = evaluate(&Entry::empty(), &policy);
        assert!(first.iter().all(|d| !d.should_hold));
        assert_eq!(first, evaluate(&Entry::empty(), &policy));
    }

    #[test]
    fn first_matching_threshold_wins_not_highest() {
        // Tiers [(100, 10), (500, 11), (1000, 12)], score 600.
        let decisions = evaluate(&entry(40, 600, (0, 0, 0)), &test_policy());
        assert!(decision_for(&decisions, 10));
        assert!(!decision_for(&decisions, 11));
        assert!(!decision_for(&decisions, 12));
    }

    #[test]
    fn descending_policy_grants_highest_tier() {
        let policy = RolePolicy::new(
            RoleId(1),
            RoleId(2),
            RoleId(3),
            RoleId(4),
            [
                ScoreThreshold { min_score: 1000, role: RoleId(12) },
                ScoreThreshold { min_score: 500, role: RoleId(11) },
                ScoreThreshold { min_score: 100, role: RoleId(10) },
            ],
        )
        .unwrap();
        let decisions = evaluate(&entry(40, 600, (0, 0, 0)), &policy);
        assert!(decision_for(&decisions, 11));
        assert!(!decision_for(&decisions, 10));
        assert!(!decision_for(&decisions, 12));
    }

    #[test]
    fn score_below_every_threshold_gets_no_tier() {
        let decisions = evaluate(&entry(40, 99, (0, 0, 0)), &test_policy());
        assert!(decisions[4..].iter().all(|d| !d.should_hold));
    }

    #[test]
    fn zero_threshold_is_not_granted_to_absent_entry() {
        let policy = RolePolicy::new(
            RoleId(1),
            RoleId(2),
            RoleId(3),
            RoleId(4),
            [ScoreThreshold { min_score: 0, role: RoleId(10) }],
        )
        .unwrap();
        assert!(!decision_for(&evaluate(&Entry::empty(), &policy), 10));
        assert!(decision_for(&evaluate(&entry(90, 0, (0, 0, 1)), &policy), 10));
    }

    #[test]
    fn leader_with_low_score_gets_leader_only() {
        let decisions = evaluate(&entry(1, 50, (0, 0, 0)), &test_policy());
        let held: Vec<RoleId> = decisions
            .iter()
            .filter(|d| d.should_hold)
            .map(|d| d.role)
            .collect();
        assert_eq!(held, vec![RoleId(1)]);
    }

    #[test]
    fn second_best_suppresses_third() {
        let decisions = evaluate(&entry(5, 0, (0, 2, 7)), &test_policy());
        assert!(!decision_for(&decisions, 2));
        assert!(decision_for(&decisions, 3));
        assert!(!decision_for(&decisions, 4));
    }

    #[test]
    fn third_best_only_without_better_placements() {
        let decisions = evaluate(&entry(5, 0, (0, 0, 1)), &test_policy());
        assert!(decision_for(&decisions, 4));
    }
}
