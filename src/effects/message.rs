//! Chat message payloads: embeds, components and outgoing messages.
//!
//! These mirror the platform's JSON shapes closely enough to be sent as-is and
//! to be parsed back out of incoming interactions.

use serde::{Deserialize, Serialize};

use crate::types::{ChannelId, MessageId};

/// Component type: a row that holds other components.
pub const COMPONENT_ACTION_ROW: u8 = 1;
/// Component type: a clickable button.
pub const COMPONENT_BUTTON: u8 = 2;
/// Component type: a text input inside a modal.
pub const COMPONENT_TEXT_INPUT: u8 = 4;

/// Button style: green.
pub const BUTTON_SUCCESS: u8 = 3;
/// Button style: red.
pub const BUTTON_DANGER: u8 = 4;

/// Text input style: single line.
pub const TEXT_INPUT_SHORT: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

impl EmbedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// A rich embed attached to a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<EmbedAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
}

impl Embed {
    /// Returns the value of the first field called `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// A message component (action row, button or text input).
///
/// The platform distinguishes kinds by a numeric `type`, so a single flat
/// struct covers all three; unused fields are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Submitted value of a text input (incoming modal submissions only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
}

impl Component {
    pub fn action_row(components: Vec<Component>) -> Self {
        Component {
            kind: COMPONENT_ACTION_ROW,
            components,
            ..Default::default()
        }
    }

    pub fn button(style: u8, label: impl Into<String>, custom_id: impl Into<String>) -> Self {
        Component {
            kind: COMPONENT_BUTTON,
            style: Some(style),
            label: Some(label.into()),
            custom_id: Some(custom_id.into()),
            ..Default::default()
        }
    }

    pub fn text_input(label: impl Into<String>, custom_id: impl Into<String>) -> Self {
        Component {
            kind: COMPONENT_TEXT_INPUT,
            style: Some(TEXT_INPUT_SHORT),
            label: Some(label.into()),
            custom_id: Some(custom_id.into()),
            ..Default::default()
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_min_length(mut self, min_length: u16) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }
}

/// Points a new message at the message it replies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageReference {
    pub message_id: MessageId,
}

/// A message the bot sends to a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embeds: Vec<Embed>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<Component>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_reference: Option<MessageReference>,
}

impl OutgoingMessage {
    /// A plain text message.
    pub fn text(content: impl Into<String>) -> Self {
        OutgoingMessage {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Marks this message as a reply to `message_id`.
    pub fn replying_to(mut self, message_id: MessageId) -> Self {
        self.message_reference = Some(MessageReference { message_id });
        self
    }
}

/// Identifies a message the platform created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageRef {
    pub id: MessageId,
    pub channel_id: ChannelId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_row_wire_shape() {
        let row = Component::action_row(vec![
            Component::button(BUTTON_SUCCESS, "Approve", "approve_button"),
            Component::button(BUTTON_DANGER, "Decline", "decline_button"),
        ]);
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["type"], 1);
        assert_eq!(value["components"][0]["type"], 2);
        assert_eq!(value["components"][0]["style"], 3);
        assert_eq!(value["components"][1]["custom_id"], "decline_button");
        assert!(value["components"][0].get("value").is_none());
    }

    #[test]
    fn text_message_omits_empty_parts() {
        let value = serde_json::to_value(OutgoingMessage::text("hi")).unwrap();
        assert_eq!(value, serde_json::json!({ "content": "hi" }));
    }

    #[test]
    fn reply_carries_reference() {
        let message = OutgoingMessage::text("hi").replying_to(MessageId(5));
        let value = serde_json::to_value(message).unwrap();
        assert_eq!(value["message_reference"]["message_id"], "5");
    }

    #[test]
    fn embed_field_lookup() {
        let embed = Embed {
            fields: vec![
                EmbedField::new("player", "Zed", false),
                EmbedField::new("player", "Ash", false),
            ],
            ..Default::default()
        };
        assert_eq!(embed.field("player"), Some("Zed"));
        assert_eq!(embed.field("boss"), None);
    }
}
