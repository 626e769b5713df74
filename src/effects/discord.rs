//! Chat platform API effect types.
//!
//! These types describe role-membership and messaging operations as data,
//! without executing them. The interpreter in `crate::discord` executes them
//! against the real REST API; tests use a recording mock.

use serde::{Deserialize, Serialize};

use super::message::{Embed, MessageRef, OutgoingMessage};
use crate::types::{ChannelId, MessageId, RoleId, UserId, WebhookId};

/// A chat platform API effect.
///
/// Effects are guild-scoped: the interpreter is constructed for one guild, so
/// effects don't include it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiscordEffect {
    // ─── Role membership ──────────────────────────────────────────────────────
    /// Grant a role to a member.
    AddMemberRole { user: UserId, role: RoleId },

    /// Revoke a role from a member.
    RemoveMemberRole { user: UserId, role: RoleId },

    // ─── Members ──────────────────────────────────────────────────────────────
    /// Fetch a single guild member.
    GetMember { user: UserId },

    /// List every guild member, `page_size` at a time.
    ListMembers { page_size: u32 },

    // ─── Messages ─────────────────────────────────────────────────────────────
    /// Post a message in a channel.
    SendMessage {
        channel: ChannelId,
        message: OutgoingMessage,
    },

    /// Replace the content of a deferred interaction response. Answers with
    /// the edited message.
    EditOriginalResponse {
        interaction_token: String,
        content: String,
    },

    /// Replace the embeds of the message an interaction belongs to and remove
    /// its components. Answers with the edited message.
    UpdateOriginalEmbeds {
        interaction_token: String,
        embeds: Vec<Embed>,
    },

    /// Replace the embeds of a message posted by an incoming webhook.
    EditWebhookMessage {
        webhook: WebhookId,
        token: String,
        message: MessageId,
        embeds: Vec<Embed>,
    },
}

/// A guild member as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberData {
    pub user_id: UserId,
    pub username: String,
    /// Roles currently held. Absent or null on the wire means none.
    pub roles: Vec<RoleId>,
}

/// Response from a chat platform effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum DiscordResponse {
    /// Response to role mutations and edits.
    Ok,

    /// Response to `GetMember`.
    Member(MemberData),

    /// Response to `ListMembers`.
    Members(Vec<MemberData>),

    /// Response to `SendMessage` and the original-response edits.
    Message(MessageRef),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_serializes_with_type_tag() {
        let effect = DiscordEffect::AddMemberRole {
            user: UserId(1),
            role: RoleId(2),
        };
        let value = serde_json::to_value(&effect).unwrap();
        assert_eq!(value["type"], "add_member_role");
        assert_eq!(value["user"], "1");
        assert_eq!(value["role"], "2");
    }
}
