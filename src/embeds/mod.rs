//! Chat message embeds the bot reads and writes.
//!
//! Embeds double as state: a link request embed in the admin channel holds
//! everything needed to approve or decline it, and new-record embeds are
//! parsed back out of the webhook's messages.

mod link_request;
mod new_record;
mod request;

use thiserror::Error;

pub use link_request::{
    FIELD_DISPLAY_NAME, FIELD_PROOF, FIELD_USER_ID, LINK_REQUEST_TITLE, LinkRequest,
};
pub use new_record::{NewRecord, SENT_COLOR, SENT_DESCRIPTION, webhook_sent_embed};
pub use request::{
    APPROVED_COLOR, APPROVED_DESCRIPTION, DECLINED_COLOR, DECLINED_DESCRIPTION, REQUEST_COLOR,
    RequestOrigin, approved, declined, request_embed,
};

/// Errors raised when an embed does not have the expected shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmbedError {
    #[error("embed has no footer")]
    MissingFooter,

    #[error("malformed request footer: {0:?}")]
    MalformedFooter(String),

    #[error("embed is missing field {0:?}")]
    MissingField(&'static str),

    #[error("embed field {field:?} has unexpected value {value:?}")]
    MalformedField { field: &'static str, value: String },
}
