//! Request embeds: messages in the admin channel that point back at the
//! message which started a request.
//!
//! The origin is carried in the footer as
//! `Channel ID: {channel} | Message ID: {message}` so that a button press on
//! the embed can reply to the original message without any stored state.

use std::fmt;

use super::EmbedError;
use crate::effects::{Embed, EmbedAuthor, EmbedField, EmbedFooter};
use crate::types::{ChannelId, MessageId};

/// Pending request.
pub const REQUEST_COLOR: u32 = 0xABB8C3;
/// Approved request.
pub const APPROVED_COLOR: u32 = 53380;
/// Declined request.
pub const DECLINED_COLOR: u32 = 15406156;

pub const APPROVED_DESCRIPTION: &str = "Approved :white_check_mark:";
pub const DECLINED_DESCRIPTION: &str = "Declined :x:";

const CHANNEL_PREFIX: &str = "Channel ID: ";
const MESSAGE_SEPARATOR: &str = " | Message ID: ";

/// Where a request was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestOrigin {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

impl RequestOrigin {
    pub fn footer(&self) -> EmbedFooter {
        EmbedFooter {
            text: self.to_string(),
        }
    }

    /// Parses footer text written by [`RequestOrigin::footer`].
    pub fn parse_footer(text: &str) -> Result<Self, EmbedError> {
        let malformed = || EmbedError::MalformedFooter(text.to_string());
        let (channel, message) = text
            .strip_prefix(CHANNEL_PREFIX)
            .and_then(|rest| rest.split_once(MESSAGE_SEPARATOR))
            .ok_or_else(malformed)?;
        Ok(RequestOrigin {
            channel_id: channel.trim().parse().map_err(|_| malformed())?,
            message_id: message.trim().parse().map_err(|_| malformed())?,
        })
    }

    /// Reads the origin from a request embed's footer.
    pub fn from_embed(embed: &Embed) -> Result<Self, EmbedError> {
        let footer = embed.footer.as_ref().ok_or(EmbedError::MissingFooter)?;
        Self::parse_footer(&footer.text)
    }
}

impl fmt::Display for RequestOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            CHANNEL_PREFIX, self.channel_id, MESSAGE_SEPARATOR, self.message_id
        )
    }
}

/// Builds a pending request embed.
pub fn request_embed(
    origin: RequestOrigin,
    author: EmbedAuthor,
    title: impl Into<String>,
    description: Option<String>,
    fields: Vec<EmbedField>,
) -> Embed {
    Embed {
        title: Some(title.into()),
        description: description.filter(|d| !d.is_empty()),
        color: Some(REQUEST_COLOR),
        author: Some(author),
        footer: Some(origin.footer()),
        fields,
    }
}

/// The request embed, marked approved.
pub fn approved(request: &Embed) -> Embed {
    resolved(request, APPROVED_DESCRIPTION, APPROVED_COLOR)
}

/// The request embed, marked declined.
pub fn declined(request: &Embed) -> Embed {
    resolved(request, DECLINED_DESCRIPTION, DECLINED_COLOR)
}

fn resolved(request: &Embed, description: &str, color: u32) -> Embed {
    Embed {
        description: Some(description.to_string()),
        color: Some(color),
        ..request.clone()
    }
}
