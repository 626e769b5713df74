//! Effect interpreter trait.
//!
//! The trait-based design enables:
//! - Mock interpreters for testing (see `crate::test_utils::MockInterpreter`)
//! - Logging/tracing interpreters

use std::future::Future;

use super::discord::{DiscordEffect, DiscordResponse};
use crate::discord::DiscordApiError;

/// Interprets chat platform effects against the platform API.
///
/// Implementations are constructed with a `GuildId`, so all effects executed
/// through a single interpreter instance are scoped to that guild.
///
/// # Example (mock for testing)
///
/// ```ignore
/// struct MockInterpreter {
///     members: HashMap<UserId, MemberData>,
/// }
///
/// impl DiscordInterpreter for MockInterpreter {
///     async fn interpret(&self, effect: DiscordEffect) -> Result<DiscordResponse, DiscordApiError> {
///         match effect {
///             DiscordEffect::GetMember { user } => self.members.get(&user)
///                 .cloned()
///                 .map(DiscordResponse::Member)
///                 .ok_or_else(|| DiscordApiError::not_found("unknown member")),
///             _ => Ok(DiscordResponse::Ok),
///         }
///     }
/// }
/// ```
pub trait DiscordInterpreter: Send + Sync {
    /// Execute an effect and return its response.
    fn interpret(
        &self,
        effect: DiscordEffect,
    ) -> impl Future<Output = Result<DiscordResponse, DiscordApiError>> + Send;
}
