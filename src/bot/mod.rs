//! The bot: chat front-end glue around the reconciliation core.
//!
//! # Inbound surface
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`Bot::on_link_approved`] | upsert the link, then refresh and reconcile that one member |
//! | [`Bot::on_unlink`] | delete the link, then clear that member's managed roles |
//! | [`Bot::on_admin_refresh_requested`] | refresh and reconcile every member |
//!
//! Interactions are dispatched by [`Bot::handle_interaction`], which answers
//! synchronously and hands back an optional [`Followup`] for the slow part
//! (API calls, sweeps). The server runs followups after responding.

mod dispatch;
pub mod reply;

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::discord::DiscordApiError;
use crate::effects::{
    DiscordEffect, DiscordInterpreter, DiscordResponse, Embed, MessageRef, OutgoingMessage,
};
use crate::hiscores::{Hiscores, HiscoresFeed};
use crate::links::{LinkRegistry, LinkStore, LinkedUser, StoreError};
use crate::reconcile::{ReconciliationSweep, SweepError, SweepReport};
use crate::types::{ChannelId, UserId};

pub use dispatch::{Followup, Handled};
pub use reply::InteractionResponse;

/// Errors from bot operations.
#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sweep(#[from] SweepError),

    #[error(transparent)]
    Discord(#[from] DiscordApiError),
}

struct BotInner<I, F, S> {
    interpreter: Arc<I>,
    sweep: ReconciliationSweep<I, F, S>,
    settings: Settings,
    /// Token of the new-record webhook, if configured.
    webhook_token: Option<String>,
}

/// The hiscore roles bot. Cheap to clone.
pub struct Bot<I, F, S> {
    inner: Arc<BotInner<I, F, S>>,
}

impl<I, F, S> Clone for Bot<I, F, S> {
    fn clone(&self) -> Self {
        Bot {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<I, F, S> Bot<I, F, S>
where
    I: DiscordInterpreter,
    F: HiscoresFeed,
    S: LinkStore,
{
    pub fn new(
        interpreter: Arc<I>,
        feed: F,
        store: S,
        settings: Settings,
        webhook_token: Option<String>,
    ) -> Self {
        let sweep = ReconciliationSweep::new(
            Arc::clone(&interpreter),
            feed,
            Arc::new(Hiscores::new()),
            LinkRegistry::new(store),
            Arc::new(settings.hiscore_roles.clone()),
        );
        Bot {
            inner: Arc::new(BotInner {
                interpreter,
                sweep,
                settings,
                webhook_token,
            }),
        }
    }

    pub fn sweep(&self) -> &ReconciliationSweep<I, F, S> {
        &self.inner.sweep
    }

    pub fn registry(&self) -> &LinkRegistry<S> {
        self.inner.sweep.registry()
    }

    pub fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    /// Links `user` to `name` and reconciles that member.
    ///
    /// The link is kept even when the sweep fails; the next full sweep
    /// picks it up.
    pub async fn on_link_approved(&self, user: UserId, name: &str) -> Result<SweepReport, BotError> {
        self.registry().upsert(user, name)?;
        match self.inner.sweep.sweep_linked_user(user, name).await {
            Ok(report) => Ok(report),
            Err(e) => {
                warn!(user = %user, name, error = %e, "Linked user but could not update roles");
                Err(e.into())
            }
        }
    }

    /// Unlinks `user` and clears their managed roles.
    ///
    /// Returns the removed link, or `None` if the user was not linked.
    pub async fn on_unlink(&self, user: UserId) -> Result<Option<LinkedUser>, BotError> {
        let Some(removed) = self.registry().remove(user)? else {
            return Ok(None);
        };
        if let Err(e) = self.inner.sweep.clear_user(user).await {
            warn!(user = %user, error = %e, "Unlinked user but could not clear roles");
        }
        Ok(Some(removed))
    }

    /// Refreshes the leaderboard and reconciles every member.
    ///
    /// Returns the status line to show the admin.
    pub async fn on_admin_refresh_requested(&self) -> &'static str {
        match self.inner.sweep.run_full().await {
            Ok(report) => {
                info!(
                    members = report.members,
                    failed = report.failed,
                    "Admin refresh complete"
                );
                reply::ROLES_UPDATED
            }
            Err(SweepError::Refresh(_)) => reply::HISCORES_FAILED,
            Err(e) => {
                error!(error = %e, "Admin refresh failed");
                reply::ROLES_FAILED
            }
        }
    }

    // ─── Effect helpers ───────────────────────────────────────────────────────

    async fn send(
        &self,
        channel: ChannelId,
        message: OutgoingMessage,
    ) -> Result<MessageRef, DiscordApiError> {
        let effect = DiscordEffect::SendMessage { channel, message };
        expect_message(self.inner.interpreter.interpret(effect).await?)
    }

    async fn edit_original(
        &self,
        interaction_token: &str,
        content: impl Into<String>,
    ) -> Result<MessageRef, DiscordApiError> {
        let effect = DiscordEffect::EditOriginalResponse {
            interaction_token: interaction_token.to_string(),
            content: content.into(),
        };
        expect_message(self.inner.interpreter.interpret(effect).await?)
    }

    /// Replaces the embeds of the message an interaction was pressed on and
    /// removes its buttons.
    async fn update_original_embeds(
        &self,
        interaction_token: &str,
        embeds: Vec<Embed>,
    ) -> Result<MessageRef, DiscordApiError> {
        let effect = DiscordEffect::UpdateOriginalEmbeds {
            interaction_token: interaction_token.to_string(),
            embeds,
        };
        expect_message(self.inner.interpreter.interpret(effect).await?)
    }

    /// Shows `line` on the deferred response. Used on the way out of a
    /// failed followup, so an edit failure is only logged.
    async fn report_failure(&self, interaction_token: &str, line: &str) {
        if let Err(e) = self.edit_original(interaction_token, line).await {
            warn!(error = %e, "Could not report followup failure");
        }
    }
}

fn expect_message(response: DiscordResponse) -> Result<MessageRef, DiscordApiError> {
    match response {
        DiscordResponse::Message(message) => Ok(message),
        other => Err(DiscordApiError::permanent_without_source(format!(
            "expected a message, got {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::MemoryLinkStore;
    use crate::test_utils::{MockFeed, MockInterpreter, make_entry, member, test_settings};
    use crate::types::RoleId;

    type TestBot = Bot<MockInterpreter, MockFeed, MemoryLinkStore>;

    fn bot(interpreter: Arc<MockInterpreter>, feed: MockFeed) -> TestBot {
        Bot::new(interpreter, feed, MemoryLinkStore::new(), test_settings(), None)
    }

    #[tokio::test]
    async fn approved_link_grants_roles() {
        let interpreter = Arc::new(MockInterpreter::new());
        interpreter.add_member(member(100, &[]));
        let bot = bot(interpreter.clone(), MockFeed::ok(vec![make_entry("Zed", 1, 50)]));

        let report = bot.on_link_approved(UserId(100), "Zed").await.unwrap();

        assert_eq!(report.granted, 1);
        assert!(interpreter.has_role(UserId(100), RoleId(1)));
        assert!(bot.registry().find_by_id(UserId(100)).unwrap().is_some());
    }

    #[tokio::test]
    async fn approved_link_survives_failed_refresh() {
        let interpreter = Arc::new(MockInterpreter::new());
        interpreter.add_member(member(100, &[]));
        let bot = bot(interpreter.clone(), MockFeed::failing(502));

        let result = bot.on_link_approved(UserId(100), "Zed").await;

        assert!(matches!(result, Err(BotError::Sweep(SweepError::Refresh(_)))));
        assert!(interpreter.effects().is_empty());
        assert_eq!(
            bot.registry().find_by_id(UserId(100)).unwrap().unwrap().display_name,
            "Zed"
        );
    }

    #[tokio::test]
    async fn unlink_clears_roles() {
        let interpreter = Arc::new(MockInterpreter::new());
        interpreter.add_member(member(100, &[1, 11]));
        let bot = bot(interpreter.clone(), MockFeed::ok(vec![make_entry("Zed", 1, 600)]));
        bot.registry().upsert(UserId(100), "Zed").unwrap();

        let removed = bot.on_unlink(UserId(100)).await.unwrap();

        assert_eq!(removed.unwrap().display_name, "Zed");
        assert!(!interpreter.has_role(UserId(100), RoleId(1)));
        assert!(!interpreter.has_role(UserId(100), RoleId(11)));
        assert!(bot.on_unlink(UserId(100)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn admin_refresh_status_lines() {
        let interpreter = Arc::new(MockInterpreter::new());
        let feed = MockFeed::ok(vec![make_entry("Zed", 1, 50)]);
        let bot = bot(interpreter.clone(), feed);
        assert_eq!(bot.on_admin_refresh_requested().await, reply::ROLES_UPDATED);

        let bot2 = Bot::new(
            interpreter.clone(),
            MockFeed::failing(503),
            MemoryLinkStore::new(),
            test_settings(),
            None,
        );
        assert_eq!(bot2.on_admin_refresh_requested().await, reply::HISCORES_FAILED);

        interpreter.fail_member_listing();
        assert_eq!(bot.on_admin_refresh_requested().await, reply::ROLES_FAILED);
    }
}
