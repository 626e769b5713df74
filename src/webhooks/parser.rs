//! Interaction payload parser.
//!
//! Parses raw interaction JSON into typed [`Interaction`] values. The parser
//! tolerates unknown fields and interaction types.
//!
//! # Parsing Strategy
//!
//! 1. The interaction type is read from the numeric `type` field
//! 2. The payload is parsed according to the type
//! 3. Unknown types return `Ok(None)` (ignored, not error)
//! 4. Malformed payloads return `Err` with details
//!
//! | `type` | Interaction |
//! |--------|-------------|
//! | 1 | [`Interaction::Ping`] |
//! | 2 | [`Interaction::Command`] |
//! | 3 | [`Interaction::Component`] |
//! | 5 | [`Interaction::ModalSubmit`] |

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use thiserror::Error;

use super::events::{Interaction, InteractionContext, InteractionMember, TargetMessage};
use crate::effects::{Component, Embed};
use crate::types::{ChannelId, MessageId, RoleId, UserId, WebhookId};

const TYPE_PING: u8 = 1;
const TYPE_APPLICATION_COMMAND: u8 = 2;
const TYPE_MESSAGE_COMPONENT: u8 = 3;
const TYPE_MODAL_SUBMIT: u8 = 5;

const AVATAR_CDN: &str = "https://cdn.discordapp.com/avatars";

/// Error type for interaction parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON deserialization failed (includes missing required fields).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A field the interaction type requires is absent.
    #[error("missing field {0}")]
    MissingField(&'static str),
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawInteraction {
    #[serde(rename = "type")]
    kind: u8,
    #[serde(default)]
    id: String,
    #[serde(default)]
    token: String,
    channel_id: Option<ChannelId>,
    member: Option<RawMember>,
    /// Present instead of `member` outside guilds.
    user: Option<RawUser>,
    data: Option<RawData>,
    message: Option<RawMessage>,
}

#[derive(Deserialize)]
struct RawMember {
    user: RawUser,
    #[serde(default)]
    roles: Vec<RoleId>,
}

#[derive(Deserialize)]
struct RawUser {
    id: UserId,
    username: String,
    avatar: Option<String>,
}

#[derive(Deserialize)]
struct RawData {
    name: Option<String>,
    custom_id: Option<String>,
    target_id: Option<MessageId>,
    resolved: Option<RawResolved>,
    #[serde(default)]
    components: Vec<Component>,
}

#[derive(Deserialize)]
struct RawResolved {
    #[serde(default)]
    messages: HashMap<String, RawMessage>,
}

#[derive(Deserialize)]
struct RawMessage {
    id: MessageId,
    channel_id: ChannelId,
    webhook_id: Option<WebhookId>,
    #[serde(default)]
    embeds: Vec<Embed>,
}

impl From<RawMessage> for TargetMessage {
    fn from(raw: RawMessage) -> Self {
        TargetMessage {
            id: raw.id,
            channel_id: raw.channel_id,
            webhook_id: raw.webhook_id,
            embeds: raw.embeds,
        }
    }
}

// ─── Parsing ──────────────────────────────────────────────────────────────────

/// Parses an interaction payload.
///
/// # Returns
///
/// * `Ok(Some(interaction))` - Successfully parsed a known interaction type
/// * `Ok(None)` - Unknown interaction type (ignored, not an error)
/// * `Err(e)` - Malformed payload or missing required fields
pub fn parse_interaction(payload: &[u8]) -> Result<Option<Interaction>, ParseError> {
    let raw: RawInteraction = serde_json::from_slice(payload)?;

    if raw.kind == TYPE_PING {
        return Ok(Some(Interaction::Ping));
    }
    if !matches!(
        raw.kind,
        TYPE_APPLICATION_COMMAND | TYPE_MESSAGE_COMPONENT | TYPE_MODAL_SUBMIT
    ) {
        return Ok(None);
    }

    let ctx = context(&raw)?;
    let data = raw.data.ok_or(ParseError::MissingField("data"))?;

    let interaction = match raw.kind {
        TYPE_APPLICATION_COMMAND => {
            let name = data.name.ok_or(ParseError::MissingField("data.name"))?;
            let target = match data.target_id {
                Some(target_id) => {
                    let mut messages = data.resolved.map(|r| r.messages).unwrap_or_default();
                    let message = messages
                        .remove(&target_id.to_string())
                        .ok_or(ParseError::MissingField("data.resolved.messages"))?;
                    Some(message.into())
                }
                None => None,
            };
            Interaction::Command { ctx, name, target }
        }
        TYPE_MESSAGE_COMPONENT => Interaction::Component {
            ctx,
            custom_id: data.custom_id.ok_or(ParseError::MissingField("data.custom_id"))?,
            message: raw
                .message
                .ok_or(ParseError::MissingField("message"))?
                .into(),
        },
        _ => Interaction::ModalSubmit {
            ctx,
            custom_id: data.custom_id.ok_or(ParseError::MissingField("data.custom_id"))?,
            values: text_input_values(&data.components),
        },
    };

    Ok(Some(interaction))
}

fn context(raw: &RawInteraction) -> Result<InteractionContext, ParseError> {
    let (user, roles) = match (&raw.member, &raw.user) {
        (Some(member), _) => (&member.user, member.roles.clone()),
        (None, Some(user)) => (user, Vec::new()),
        (None, None) => return Err(ParseError::MissingField("member")),
    };
    Ok(InteractionContext {
        id: raw.id.clone(),
        token: raw.token.clone(),
        channel_id: raw.channel_id,
        member: InteractionMember {
            user_id: user.id,
            username: user.username.clone(),
            avatar_url: user
                .avatar
                .as_ref()
                .map(|hash| format!("{AVATAR_CDN}/{}/{hash}.png", user.id)),
            roles,
        },
    })
}

/// Collects text input values from a modal's action rows.
fn text_input_values(rows: &[Component]) -> BTreeMap<String, String> {
    rows.iter()
        .flat_map(|row| row.components.iter())
        .filter_map(|input| Some((input.custom_id.clone()?, input.value.clone()?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEMBER: &str = r#""member": {
        "user": {"id": "100", "username": "zed", "avatar": "abc"},
        "roles": ["7", "8"]
    }"#;

    fn payload(kind: u8, rest: &str) -> Vec<u8> {
        format!(
            r#"{{"type": {kind}, "id": "1", "token": "tok", "channel_id": "55", {MEMBER}, {rest}}}"#
        )
        .into_bytes()
    }

    #[test]
    fn parses_ping() {
        let parsed = parse_interaction(br#"{"type": 1, "id": "1", "token": "t"}"#).unwrap();
        assert_eq!(parsed, Some(Interaction::Ping));
    }

    #[test]
    fn unknown_type_is_ignored() {
        let parsed = parse_interaction(&payload(4, r#""data": {}"#)).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn parses_slash_command() {
        let parsed = parse_interaction(&payload(2, r#""data": {"name": "unlink_name"}"#))
            .unwrap()
            .unwrap();
        let Interaction::Command { ctx, name, target } = parsed else {
            panic!("expected command");
        };
        assert_eq!(name, "unlink_name");
        assert!(target.is_none());
        assert_eq!(ctx.token, "tok");
        assert_eq!(ctx.channel_id, Some(ChannelId(55)));
        assert_eq!(ctx.member.user_id, UserId(100));
        assert!(ctx.member.has_role(RoleId(8)));
        assert_eq!(
            ctx.member.avatar_url.as_deref(),
            Some("https://cdn.discordapp.com/avatars/100/abc.png")
        );
    }

    #[test]
    fn parses_message_command_target() {
        let rest = r#""data": {
            "name": "resend_new_record",
            "target_id": "900",
            "resolved": {"messages": {"900": {
                "id": "900", "channel_id": "56", "webhook_id": "4",
                "embeds": [{"title": "New record", "fields": [{"name": "boss", "value": "Nex"}]}]
            }}}
        }"#;
        let parsed = parse_interaction(&payload(2, rest)).unwrap().unwrap();
        let Interaction::Command { target, .. } = parsed else {
            panic!("expected command");
        };
        let target = target.unwrap();
        assert_eq!(target.id, MessageId(900));
        assert_eq!(target.webhook_id, Some(WebhookId(4)));
        assert_eq!(target.embeds[0].field("boss"), Some("Nex"));
    }

    #[test]
    fn parses_button_press() {
        let rest = r#""data": {"custom_id": "approve_link", "component_type": 2},
            "message": {"id": "901", "channel_id": "57", "embeds": []}"#;
        let parsed = parse_interaction(&payload(3, rest)).unwrap().unwrap();
        let Interaction::Component {
            custom_id, message, ..
        } = parsed
        else {
            panic!("expected component");
        };
        assert_eq!(custom_id, "approve_link");
        assert_eq!(message.id, MessageId(901));
        assert!(message.webhook_id.is_none());
    }

    #[test]
    fn parses_modal_values() {
        let rest = r#""data": {"custom_id": "link_name_modal", "components": [
            {"type": 1, "components": [{"type": 4, "custom_id": "display_name", "value": "Zed"}]},
            {"type": 1, "components": [{"type": 4, "custom_id": "proof", "value": ""}]}
        ]}"#;
        let parsed = parse_interaction(&payload(5, rest)).unwrap().unwrap();
        let Interaction::ModalSubmit { values, .. } = parsed else {
            panic!("expected modal submit");
        };
        assert_eq!(values.get("display_name").map(String::as_str), Some("Zed"));
        assert_eq!(values.get("proof").map(String::as_str), Some(""));
    }

    #[test]
    fn dm_interactions_use_top_level_user() {
        let body = br#"{"type": 2, "id": "1", "token": "t",
            "user": {"id": "5", "username": "ash", "avatar": null},
            "data": {"name": "link_name"}}"#;
        let parsed = parse_interaction(body).unwrap().unwrap();
        let ctx = parsed.context().unwrap();
        assert_eq!(ctx.member.user_id, UserId(5));
        assert!(ctx.member.roles.is_empty());
        assert!(ctx.member.avatar_url.is_none());
    }

    #[test]
    fn malformed_payloads_error() {
        assert!(matches!(
            parse_interaction(b"not json"),
            Err(ParseError::JsonError(_))
        ));
        assert!(matches!(
            parse_interaction(&payload(3, r#""data": {"custom_id": "x"}"#)),
            Err(ParseError::MissingField("message"))
        ));
        assert!(matches!(
            parse_interaction(br#"{"type": 2, "data": {"name": "x"}}"#),
            Err(ParseError::MissingField("member"))
        ));
    }
}
