//! Core domain types for the hiscore roles bot.
//!
//! This module contains the identifiers and records shared by every other
//! module, designed to encode invariants via the type system.

pub mod entry;
pub mod ids;

// Re-export commonly used types at the module level
pub use entry::Entry;
pub use ids::{ApplicationId, ChannelId, GuildId, MessageId, RoleId, UserId, WebhookId};
