//! Chat platform REST client and effect interpreter.
//!
//! This module provides the implementation for executing `DiscordEffect`s via
//! reqwest. It implements the `DiscordInterpreter` trait defined in the
//! effects module.
//!
//! Key features:
//! - Guild-scoped client holding the bot token
//! - Distinguishes transient, not-found and permanent errors
//! - Paginated member listing

mod client;
mod error;
mod interpreter;

pub use client::{DEFAULT_API_BASE, DiscordClient};
pub use error::{DiscordApiError, DiscordErrorKind};
pub use interpreter::{MAX_MEMBER_PAGE, interpret_discord_effect};
