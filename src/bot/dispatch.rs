//! Interaction dispatch.
//!
//! [`Bot::handle_interaction`] never waits on the network: it checks what
//! it can against local state, picks the synchronous response, and returns
//! the rest of the work as a [`Followup`]. Anything that talks to the chat
//! platform or the leaderboard happens in [`Bot::run_followup`].

use tracing::{debug, error, info, warn};

use super::reply::{self, InteractionResponse};
use super::{Bot, BotError};
use crate::commands::{
    APPROVE_BUTTON, Command, DECLINE_BUTTON, INPUT_DISPLAY_NAME, INPUT_PROOF, LINK_REQUEST_MODAL,
    parse_command,
};
use crate::effects::{
    BUTTON_DANGER, BUTTON_SUCCESS, Component, DiscordEffect, DiscordInterpreter, Embed,
    OutgoingMessage,
};
use crate::embeds::{LinkRequest, NewRecord, RequestOrigin, approved, declined, webhook_sent_embed};
use crate::hiscores::HiscoresFeed;
use crate::links::LinkStore;
use crate::types::{MessageId, UserId};
use crate::webhooks::{Interaction, InteractionContext, InteractionMember, TargetMessage};

const LINK_MODAL_TITLE: &str = "Link User";

/// Work left to do after the synchronous response has been sent.
#[derive(Debug, Clone, PartialEq)]
pub enum Followup {
    /// Announce a link request and post it for review.
    LinkRequest {
        token: String,
        requester: InteractionMember,
        display_name: String,
        proof: Option<String>,
    },
    /// Link the user, mark the request approved, reconcile them and reply
    /// to the request.
    Approve {
        token: String,
        request: LinkRequest,
        /// The request embed as it reads once approved.
        approved: Embed,
    },
    /// Reply to the request.
    Decline { request: LinkRequest },
    Unlink { token: String, user: UserId },
    RefreshRoles { token: String },
    /// Repost a record, mark the webhook message sent, then refresh roles.
    ResendNewRecord {
        token: String,
        message_id: MessageId,
        embed: Embed,
        record: NewRecord,
    },
}

impl Followup {
    pub fn name(&self) -> &'static str {
        match self {
            Followup::LinkRequest { .. } => "link_request",
            Followup::Approve { .. } => "approve",
            Followup::Decline { .. } => "decline",
            Followup::Unlink { .. } => "unlink",
            Followup::RefreshRoles { .. } => "refresh_roles",
            Followup::ResendNewRecord { .. } => "resend_new_record",
        }
    }
}

/// The outcome of dispatching one interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Handled {
    pub response: InteractionResponse,
    pub followup: Option<Followup>,
}

impl Handled {
    fn reply(response: InteractionResponse) -> Self {
        Handled {
            response,
            followup: None,
        }
    }

    fn ephemeral(content: impl Into<String>) -> Self {
        Self::reply(InteractionResponse::ephemeral(content))
    }

    fn deferred(followup: Followup) -> Self {
        Handled {
            response: InteractionResponse::deferred(),
            followup: Some(followup),
        }
    }
}

impl<I, F, S> Bot<I, F, S>
where
    I: DiscordInterpreter,
    F: HiscoresFeed,
    S: LinkStore,
{
    /// Chooses the response to `interaction` and the work to do after it.
    pub fn handle_interaction(&self, interaction: &Interaction) -> Handled {
        let Some(ctx) = interaction.context() else {
            return Handled::reply(InteractionResponse::pong());
        };
        let Some(command) = parse_command(interaction) else {
            debug!(kind = interaction.kind(), "Interaction names no known command");
            return Handled::ephemeral(reply::UNKNOWN_COMMAND);
        };

        info!(
            command = command.name(),
            user = %ctx.member.user_id,
            "Handling command"
        );

        match command {
            Command::LinkName => Handled::reply(link_modal()),
            Command::SubmitLinkRequest {
                display_name,
                proof,
            } => self.handle_link_submission(ctx, display_name, proof),
            // The request is only marked approved once the link is stored.
            Command::ApproveLink { request } => match LinkRequest::from_embed(&request) {
                Ok(parsed) => Handled {
                    response: InteractionResponse::deferred_update(),
                    followup: Some(Followup::Approve {
                        token: ctx.token.clone(),
                        request: parsed,
                        approved: approved(&request),
                    }),
                },
                Err(e) => malformed(e),
            },
            Command::DeclineLink { request } => match LinkRequest::from_embed(&request) {
                Ok(parsed) => Handled {
                    response: InteractionResponse::update_embeds(vec![declined(&request)]),
                    followup: Some(Followup::Decline { request: parsed }),
                },
                Err(e) => malformed(e),
            },
            Command::UnlinkName => match self.registry().find_by_id(ctx.member.user_id) {
                Ok(Some(_)) => Handled::deferred(Followup::Unlink {
                    token: ctx.token.clone(),
                    user: ctx.member.user_id,
                }),
                Ok(None) => Handled::ephemeral(reply::ALREADY_UNLINKED),
                Err(e) => store_failed(e),
            },
            Command::RefreshRoles => {
                let admin_role = self.settings().admin_role;
                if !ctx.member.has_role(admin_role) {
                    return Handled::ephemeral(reply::admin_only(admin_role));
                }
                Handled::deferred(Followup::RefreshRoles {
                    token: ctx.token.clone(),
                })
            }
            Command::ResendNewRecord { message } => self.handle_resend(ctx, message),
        }
    }

    fn handle_link_submission(
        &self,
        ctx: &InteractionContext,
        display_name: String,
        proof: Option<String>,
    ) -> Handled {
        match self.registry().find_by_display_name(&display_name) {
            Ok(Some(_)) => Handled::ephemeral(reply::already_linked(&display_name)),
            Ok(None) => Handled::deferred(Followup::LinkRequest {
                token: ctx.token.clone(),
                requester: ctx.member.clone(),
                display_name,
                proof,
            }),
            Err(e) => store_failed(e),
        }
    }

    fn handle_resend(&self, ctx: &InteractionContext, message: TargetMessage) -> Handled {
        if message.webhook_id != Some(self.settings().new_record.webhook) {
            return Handled::ephemeral(reply::NOT_NEW_RECORD);
        }
        let Some(embed) = message.embeds.into_iter().next() else {
            return Handled::ephemeral(reply::MALFORMED_REQUEST);
        };
        match NewRecord::from_embed(&embed) {
            Ok(record) => Handled::deferred(Followup::ResendNewRecord {
                token: ctx.token.clone(),
                message_id: message.id,
                embed,
                record,
            }),
            Err(e) => malformed(e),
        }
    }

    // ─── Followups ────────────────────────────────────────────────────────────

    /// Runs a followup to completion. Failures are logged.
    pub async fn run_followup(&self, followup: Followup) {
        let name = followup.name();
        if let Err(e) = self.try_followup(followup).await {
            error!(followup = name, error = %e, "Followup failed");
        }
    }

    async fn try_followup(&self, followup: Followup) -> Result<(), BotError> {
        match followup {
            Followup::LinkRequest {
                token,
                requester,
                display_name,
                proof,
            } => {
                self.post_link_request(&token, requester, display_name, proof)
                    .await
            }

            Followup::Approve {
                token,
                request,
                approved,
            } => {
                match self
                    .on_link_approved(request.user_id, &request.display_name)
                    .await
                {
                    // The link is stored; roles catch up on the next sweep.
                    Ok(_) | Err(BotError::Sweep(_)) => {}
                    Err(e) => {
                        // Buttons stay in place so the admin can approve again.
                        self.report_failure(&token, reply::STORE_FAILED).await;
                        return Err(e);
                    }
                }
                self.update_original_embeds(&token, vec![approved]).await?;
                self.reply_to_origin(&request, reply::request_approved(request.user_id))
                    .await
            }

            Followup::Decline { request } => {
                info!(user = %request.user_id, name = %request.display_name, "Link request declined");
                self.reply_to_origin(&request, reply::request_declined(request.user_id))
                    .await
            }

            Followup::Unlink { token, user } => {
                let content = match self.on_unlink(user).await {
                    Ok(Some(link)) => reply::unlinked(&link.display_name),
                    Ok(None) => reply::ALREADY_UNLINKED.to_string(),
                    Err(e) => {
                        error!(user = %user, error = %e, "Unlink failed");
                        reply::STORE_FAILED.to_string()
                    }
                };
                self.edit_original(&token, content).await?;
                Ok(())
            }

            Followup::RefreshRoles { token } => {
                let status = self.on_admin_refresh_requested().await;
                self.edit_original(&token, status).await?;
                Ok(())
            }

            Followup::ResendNewRecord {
                token,
                message_id,
                embed,
                mut record,
            } => {
                if let Err(e) = record.set_player_ids(self.registry()) {
                    warn!(error = %e, "Could not resolve linked players, posting names");
                }
                let settings = self.settings().new_record;
                if let Err(e) = self
                    .send(settings.channel, OutgoingMessage::text(record.to_string()))
                    .await
                {
                    self.report_failure(&token, reply::SEND_FAILED).await;
                    return Err(e.into());
                }

                match &self.inner.webhook_token {
                    Some(webhook_token) => {
                        let effect = DiscordEffect::EditWebhookMessage {
                            webhook: settings.webhook,
                            token: webhook_token.clone(),
                            message: message_id,
                            embeds: vec![webhook_sent_embed(&embed)],
                        };
                        if let Err(e) = self.inner.interpreter.interpret(effect).await {
                            warn!(message_id = %message_id, error = %e, "Could not mark record as sent");
                        }
                    }
                    None => debug!("No webhook token configured, record message left unmarked"),
                }

                let status = self.on_admin_refresh_requested().await;
                self.edit_original(&token, status).await?;
                Ok(())
            }
        }
    }

    async fn post_link_request(
        &self,
        token: &str,
        requester: InteractionMember,
        display_name: String,
        proof: Option<String>,
    ) -> Result<(), BotError> {
        let announced = self
            .edit_original(token, reply::awaiting_approval(&display_name))
            .await?;

        let description = match self.sweep().refresh_snapshot().await {
            Ok(snapshot) if snapshot.contains(&display_name) => None,
            Ok(_) => Some(reply::not_on_leaderboard(&display_name)),
            Err(_) => Some(reply::LEADERBOARD_UNAVAILABLE.to_string()),
        };

        let request = LinkRequest {
            origin: RequestOrigin {
                channel_id: announced.channel_id,
                message_id: announced.id,
            },
            user_id: requester.user_id,
            display_name,
            proof,
        };
        let message = OutgoingMessage {
            embeds: vec![request.to_embed(requester.embed_author(), description)],
            components: vec![Component::action_row(vec![
                Component::button(BUTTON_SUCCESS, "Approve", APPROVE_BUTTON),
                Component::button(BUTTON_DANGER, "Decline", DECLINE_BUTTON),
            ])],
            ..Default::default()
        };
        let posted = match self.send(self.settings().admin_channel, message).await {
            Ok(posted) => posted,
            Err(e) => {
                self.report_failure(token, reply::SEND_FAILED).await;
                return Err(e.into());
            }
        };
        info!(
            user = %request.user_id,
            name = %request.display_name,
            message_id = %posted.id,
            "Posted link request for review"
        );
        Ok(())
    }

    async fn reply_to_origin(&self, request: &LinkRequest, content: String) -> Result<(), BotError> {
        let message = OutgoingMessage::text(content).replying_to(request.origin.message_id);
        self.send(request.origin.channel_id, message).await?;
        Ok(())
    }
}

fn link_modal() -> InteractionResponse {
    InteractionResponse::modal(
        LINK_REQUEST_MODAL,
        LINK_MODAL_TITLE,
        vec![
            Component::action_row(vec![
                Component::text_input("pvm-records.com display name", INPUT_DISPLAY_NAME)
                    .with_min_length(1),
            ]),
            Component::action_row(vec![
                Component::text_input("Screenshot of you saying your name in game", INPUT_PROOF)
                    .with_placeholder("https://imgur.com/12Djsd2")
                    .with_required(false),
            ]),
        ],
    )
}

fn malformed(error: impl std::fmt::Display) -> Handled {
    warn!(error = %error, "Could not read message embed");
    Handled::ephemeral(reply::MALFORMED_REQUEST)
}

fn store_failed(error: impl std::fmt::Display) -> Handled {
    error!(error = %error, "Link store read failed");
    Handled::ephemeral(reply::STORE_FAILED)
}
