//! Effects-as-data for chat platform operations.
//!
//! This module defines effect types that describe operations without executing them.
//! This enables:
//! - Pure core logic that returns effects as data
//! - Testability via mock interpreters
//! - Logging/tracing of intended operations

pub mod discord;
pub mod interpreter;
pub mod message;

pub use discord::{DiscordEffect, DiscordResponse, MemberData};
pub use interpreter::DiscordInterpreter;
pub use message::{
    BUTTON_DANGER, BUTTON_SUCCESS, Component, Embed, EmbedAuthor, EmbedField, EmbedFooter,
    MessageRef, MessageReference, OutgoingMessage,
};
