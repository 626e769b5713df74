//! Interaction responses and the status strings the bot replies with.

use serde::{Deserialize, Serialize};

use crate::effects::{Component, Embed};
use crate::types::{RoleId, UserId};

const RESPONSE_PONG: u8 = 1;
const RESPONSE_MESSAGE: u8 = 4;
const RESPONSE_DEFERRED_MESSAGE: u8 = 5;
const RESPONSE_DEFERRED_UPDATE: u8 = 6;
const RESPONSE_UPDATE_MESSAGE: u8 = 7;
const RESPONSE_MODAL: u8 = 9;

/// Message flag: only the caller sees the message.
pub const FLAG_EPHEMERAL: u64 = 1 << 6;

// ─── Status strings ───────────────────────────────────────────────────────────

pub const ROLES_UPDATED: &str = "Roles updated :arrows_counterclockwise:";
pub const HISCORES_FAILED: &str = ":warning: Failed to load hiscores, try again later.";
pub const ROLES_FAILED: &str = ":warning: Failed to update roles, try again later.";
pub const ALREADY_UNLINKED: &str = "Already unlinked.";
pub const NOT_NEW_RECORD: &str = "this is not a new record webhook";
pub const MALFORMED_REQUEST: &str = ":warning: This message could not be read.";
pub const STORE_FAILED: &str = ":warning: Something went wrong, try again later.";
pub const SEND_FAILED: &str = ":warning: Failed to post the message, try again later.";
pub const UNKNOWN_COMMAND: &str = "Unknown command.";
pub const LEADERBOARD_UNAVAILABLE: &str = ":warning: Failed to load pvm-records.com";

pub fn already_linked(name: &str) -> String {
    format!("{name} already linked.")
}

pub fn awaiting_approval(name: &str) -> String {
    format!("Verification request for {name} - awaiting approval.")
}

pub fn unlinked(name: &str) -> String {
    format!("Unlinked {name}.")
}

pub fn admin_only(admin_role: RoleId) -> String {
    format!(
        "Only those with {} are allowed to update roles.",
        admin_role.mention()
    )
}

pub fn request_approved(user: UserId) -> String {
    format!("{} Approved :white_check_mark:", user.mention())
}

pub fn request_declined(user: UserId) -> String {
    format!("{} Declined :x:", user.mention())
}

pub fn not_on_leaderboard(name: &str) -> String {
    format!(":warning: Couldn't find {name} on pvm-records.com")
}

// ─── Responses ────────────────────────────────────────────────────────────────

/// Payload of an interaction response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Embed>>,
    /// `Some(vec![])` clears the message's components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Component>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    /// Modal id (modal responses only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    /// Modal title (modal responses only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// The synchronous answer to an interaction request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ResponseData>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        InteractionResponse {
            kind: RESPONSE_PONG,
            data: None,
        }
    }

    /// A message visible to the channel.
    pub fn message(content: impl Into<String>) -> Self {
        InteractionResponse {
            kind: RESPONSE_MESSAGE,
            data: Some(ResponseData {
                content: Some(content.into()),
                ..Default::default()
            }),
        }
    }

    /// A message only the caller sees.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        InteractionResponse {
            kind: RESPONSE_MESSAGE,
            data: Some(ResponseData {
                content: Some(content.into()),
                flags: Some(FLAG_EPHEMERAL),
                ..Default::default()
            }),
        }
    }

    /// "Thinking..."; the content arrives later via an edit.
    pub fn deferred() -> Self {
        InteractionResponse {
            kind: RESPONSE_DEFERRED_MESSAGE,
            data: None,
        }
    }

    /// Acknowledges a component press; the message is edited later, if at all.
    pub fn deferred_update() -> Self {
        InteractionResponse {
            kind: RESPONSE_DEFERRED_UPDATE,
            data: None,
        }
    }

    /// Replaces the embeds of the message a component is attached to and
    /// removes its buttons.
    pub fn update_embeds(embeds: Vec<Embed>) -> Self {
        InteractionResponse {
            kind: RESPONSE_UPDATE_MESSAGE,
            data: Some(ResponseData {
                embeds: Some(embeds),
                components: Some(Vec::new()),
                ..Default::default()
            }),
        }
    }

    pub fn modal(
        custom_id: impl Into<String>,
        title: impl Into<String>,
        components: Vec<Component>,
    ) -> Self {
        InteractionResponse {
            kind: RESPONSE_MODAL,
            data: Some(ResponseData {
                custom_id: Some(custom_id.into()),
                title: Some(title.into()),
                components: Some(components),
                ..Default::default()
            }),
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        self.data
            .as_ref()
            .and_then(|d| d.flags)
            .is_some_and(|f| f & FLAG_EPHEMERAL != 0)
    }

    pub fn content(&self) -> Option<&str> {
        self.data.as_ref()?.content.as_deref()
    }

    pub fn is_deferred(&self) -> bool {
        self.kind == RESPONSE_DEFERRED_MESSAGE
    }
}
