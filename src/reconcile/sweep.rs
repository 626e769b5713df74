//! Reconciliation sweeps: refresh, evaluate and reconcile.
//!
//! # Phases
//!
//! ```text
//! Idle -> Refreshing -> Reconciling -> Idle
//!             |
//!             +-- refresh failed --> Idle (nothing reconciled)
//! ```
//!
//! Only one sweep runs at a time. Entry points wait on an async gate, so a
//! full sweep and a single-user sweep never interleave role writes.
//!
//! | Entry point | Refresh | Members |
//! |-------------|---------|---------|
//! | [`ReconciliationSweep::run_full`] | required | every guild member |
//! | [`ReconciliationSweep::sweep_linked_user`] | required | one member, by linked name |
//! | [`ReconciliationSweep::clear_user`] | never | one member, sentinel entry |

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::reconciler::{ApplyOutcome, apply_changes, reconcile};
use crate::discord::{DiscordApiError, MAX_MEMBER_PAGE};
use crate::effects::{DiscordEffect, DiscordInterpreter, DiscordResponse, MemberData};
use crate::eligibility::{RolePolicy, evaluate};
use crate::hiscores::{FeedError, Hiscores, HiscoresFeed, LeaderboardSnapshot};
use crate::links::{LinkRegistry, LinkStore, StoreError};
use crate::types::{Entry, UserId};

/// Errors a sweep reports to its caller.
///
/// Per-role failures are not here: they are logged and counted in
/// [`SweepReport::failed`].
#[derive(Debug, Error)]
pub enum SweepError {
    /// The leaderboard could not be refreshed; nothing was reconciled.
    #[error("leaderboard refresh failed: {0}")]
    Refresh(#[from] FeedError),

    /// Guild members could not be read.
    #[error("failed to read guild members: {0}")]
    Members(#[from] DiscordApiError),

    /// The link registry could not be read.
    #[error("failed to read linked users: {0}")]
    Store(#[from] StoreError),
}

/// Observable sweep state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepPhase {
    #[default]
    Idle,
    Refreshing,
    Reconciling,
}

/// Which entry point produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepKind {
    Full,
    SingleUser,
}

/// Summary of one completed sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub kind: SweepKind,
    /// Members whose roles were evaluated.
    pub members: usize,
    pub granted: usize,
    pub revoked: usize,
    pub unchanged: usize,
    pub failed: usize,
    /// Linked users with no guild membership to act on.
    pub skipped: usize,
    pub finished_at: DateTime<Utc>,
}

impl SweepReport {
    fn new(kind: SweepKind) -> Self {
        SweepReport {
            kind,
            members: 0,
            granted: 0,
            revoked: 0,
            unchanged: 0,
            failed: 0,
            skipped: 0,
            finished_at: Utc::now(),
        }
    }

    fn record(&mut self, outcome: ApplyOutcome) {
        self.members += 1;
        self.granted += outcome.granted;
        self.revoked += outcome.revoked;
        self.unchanged += outcome.unchanged;
        self.failed += outcome.failed;
    }

    fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }
}

/// Sets the phase on creation and puts it back to `Idle` when dropped, so an
/// early return through `?` always lands in `Idle`.
struct PhaseGuard<'a> {
    phase: &'a Mutex<SweepPhase>,
}

impl<'a> PhaseGuard<'a> {
    fn enter(phase: &'a Mutex<SweepPhase>, initial: SweepPhase) -> Self {
        *phase.lock().unwrap_or_else(PoisonError::into_inner) = initial;
        PhaseGuard { phase }
    }

    fn set(&self, next: SweepPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.set(SweepPhase::Idle);
    }
}

/// Orchestrates leaderboard refreshes and role reconciliation.
///
/// Owns the feed, the published leaderboard, the link registry and the
/// policy; the interpreter is shared with the rest of the bot.
pub struct ReconciliationSweep<I, F, S> {
    interpreter: Arc<I>,
    feed: F,
    hiscores: Arc<Hiscores>,
    registry: LinkRegistry<S>,
    policy: Arc<RolePolicy>,
    gate: tokio::sync::Mutex<()>,
    phase: Mutex<SweepPhase>,
    last_report: Mutex<Option<SweepReport>>,
}

impl<I, F, S> ReconciliationSweep<I, F, S>
where
    I: DiscordInterpreter,
    F: HiscoresFeed,
    S: LinkStore,
{
    pub fn new(
        interpreter: Arc<I>,
        feed: F,
        hiscores: Arc<Hiscores>,
        registry: LinkRegistry<S>,
        policy: Arc<RolePolicy>,
    ) -> Self {
        ReconciliationSweep {
            interpreter,
            feed,
            hiscores,
            registry,
            policy,
            gate: tokio::sync::Mutex::new(()),
            phase: Mutex::new(SweepPhase::Idle),
            last_report: Mutex::new(None),
        }
    }

    pub fn registry(&self) -> &LinkRegistry<S> {
        &self.registry
    }

    pub fn hiscores(&self) -> &Hiscores {
        &self.hiscores
    }

    pub fn policy(&self) -> &RolePolicy {
        &self.policy
    }

    pub fn phase(&self) -> SweepPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn last_report(&self) -> Option<SweepReport> {
        self.last_report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Refreshes the leaderboard without reconciling anyone.
    ///
    /// Used to check a name before a link request reaches the admins.
    pub async fn refresh_snapshot(&self) -> Result<Arc<LeaderboardSnapshot>, FeedError> {
        self.hiscores.refresh(&self.feed).await
    }

    /// Refreshes the leaderboard, then reconciles every guild member.
    ///
    /// Linked users are evaluated under their linked name; everyone else is
    /// evaluated against the sentinel entry, which clears managed roles.
    #[instrument(skip(self))]
    pub async fn run_full(&self) -> Result<SweepReport, SweepError> {
        let _gate = self.gate.lock().await;
        let phase = PhaseGuard::enter(&self.phase, SweepPhase::Refreshing);

        let snapshot = self.hiscores.refresh(&self.feed).await?;

        phase.set(SweepPhase::Reconciling);
        let members = self.list_members().await?;
        let linked: HashMap<UserId, String> = self
            .registry
            .list_all()?
            .into_iter()
            .map(|u| (u.user_id, u.display_name))
            .collect();

        let mut report = SweepReport::new(SweepKind::Full);
        let mut seen = HashSet::with_capacity(members.len());
        for member in &members {
            seen.insert(member.user_id);
            let entry = match linked.get(&member.user_id) {
                Some(name) => snapshot.entry_by_name(name),
                None => Entry::empty(),
            };
            report.record(self.reconcile_member(member, &entry).await);
        }
        report.skipped = linked.keys().filter(|id| !seen.contains(id)).count();

        let report = report.finish();
        info!(
            members = report.members,
            granted = report.granted,
            revoked = report.revoked,
            failed = report.failed,
            skipped = report.skipped,
            "Full sweep complete"
        );
        self.store_report(&report);
        Ok(report)
    }

    /// Refreshes the leaderboard, then reconciles `user` under `name`.
    #[instrument(skip(self))]
    pub async fn sweep_linked_user(
        &self,
        user: UserId,
        name: &str,
    ) -> Result<SweepReport, SweepError> {
        let _gate = self.gate.lock().await;
        let phase = PhaseGuard::enter(&self.phase, SweepPhase::Refreshing);

        let snapshot = self.hiscores.refresh(&self.feed).await?;

        phase.set(SweepPhase::Reconciling);
        let entry = snapshot.entry_by_name(name);
        self.sweep_one(user, &entry).await
    }

    /// Clears every managed role from `user` without refreshing.
    #[instrument(skip(self))]
    pub async fn clear_user(&self, user: UserId) -> Result<SweepReport, SweepError> {
        let _gate = self.gate.lock().await;
        let _phase = PhaseGuard::enter(&self.phase, SweepPhase::Reconciling);

        self.sweep_one(user, &Entry::empty()).await
    }

    async fn sweep_one(&self, user: UserId, entry: &Entry) -> Result<SweepReport, SweepError> {
        let mut report = SweepReport::new(SweepKind::SingleUser);

        match self.interpreter.interpret(DiscordEffect::GetMember { user }).await {
            Ok(DiscordResponse::Member(member)) => {
                report.record(self.reconcile_member(&member, entry).await);
            }
            Ok(other) => {
                return Err(unexpected_response("GetMember", &other).into());
            }
            Err(e) if e.is_not_found() => {
                info!(user = %user, "User is not a guild member, skipping");
                report.skipped = 1;
            }
            Err(e) => return Err(e.into()),
        }

        let report = report.finish();
        self.store_report(&report);
        Ok(report)
    }

    async fn reconcile_member(&self, member: &MemberData, entry: &Entry) -> ApplyOutcome {
        let current: HashSet<_> = member.roles.iter().copied().collect();
        let decisions = evaluate(entry, &self.policy);
        let changes = reconcile(&current, &decisions);
        apply_changes(&*self.interpreter, member.user_id, &changes).await
    }

    async fn list_members(&self) -> Result<Vec<MemberData>, DiscordApiError> {
        let effect = DiscordEffect::ListMembers {
            page_size: MAX_MEMBER_PAGE,
        };
        match self.interpreter.interpret(effect).await {
            Ok(DiscordResponse::Members(members)) => Ok(members),
            Ok(other) => Err(unexpected_response("ListMembers", &other)),
            Err(e) => {
                warn!(error = %e, "Failed to list guild members");
                Err(e)
            }
        }
    }

    fn store_report(&self, report: &SweepReport) {
        *self
            .last_report
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(report.clone());
    }
}

fn unexpected_response(effect: &str, response: &DiscordResponse) -> DiscordApiError {
    DiscordApiError::permanent_without_source(format!(
        "unexpected response to {effect}: {response:?}"
    ))
}
