//! Typed interaction events.
//!
//! These types carry the fields the bot acts on. Everything else in the
//! platform payload is dropped during parsing.

use std::collections::BTreeMap;

use crate::effects::{Embed, EmbedAuthor};
use crate::types::{ChannelId, MessageId, RoleId, UserId, WebhookId};

/// The member who triggered an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionMember {
    pub user_id: UserId,
    pub username: String,
    pub avatar_url: Option<String>,
    /// Guild roles held at the time of the interaction. Empty outside guilds.
    pub roles: Vec<RoleId>,
}

impl InteractionMember {
    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }

    /// Embed author block naming this member.
    pub fn embed_author(&self) -> EmbedAuthor {
        EmbedAuthor {
            name: self.username.clone(),
            icon_url: self.avatar_url.clone(),
        }
    }
}

/// Fields common to every non-ping interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionContext {
    pub id: String,
    /// Continuation token for editing the response later.
    pub token: String,
    pub channel_id: Option<ChannelId>,
    pub member: InteractionMember,
}

/// A message an interaction refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    /// Set when the message was posted by an incoming webhook.
    pub webhook_id: Option<WebhookId>,
    pub embeds: Vec<Embed>,
}

/// An interaction delivered to the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Endpoint liveness check; must be answered with a pong.
    Ping,

    /// A slash command, or a message command when `target` is set.
    Command {
        ctx: InteractionContext,
        name: String,
        target: Option<TargetMessage>,
    },

    /// A button press on a message.
    Component {
        ctx: InteractionContext,
        custom_id: String,
        message: TargetMessage,
    },

    /// A submitted modal; `values` maps text input ids to their contents.
    ModalSubmit {
        ctx: InteractionContext,
        custom_id: String,
        values: BTreeMap<String, String>,
    },
}

impl Interaction {
    pub fn context(&self) -> Option<&InteractionContext> {
        match self {
            Interaction::Ping => None,
            Interaction::Command { ctx, .. }
            | Interaction::Component { ctx, .. }
            | Interaction::ModalSubmit { ctx, .. } => Some(ctx),
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Interaction::Ping => "ping",
            Interaction::Command { .. } => "command",
            Interaction::Component { .. } => "component",
            Interaction::ModalSubmit { .. } => "modal_submit",
        }
    }
}
