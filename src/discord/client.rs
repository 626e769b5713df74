//! REST client wrapper scoped to a single guild.
//!
//! This module provides `DiscordClient`, which wraps a `reqwest::Client` with
//! the bot token and scopes all member and role operations to one guild. This
//! matches the design where effects are guild-scoped (the `DiscordEffect` enum
//! doesn't include the guild).

use reqwest::{Method, RequestBuilder};

use crate::types::{ApplicationId, GuildId};

/// Default REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// A chat platform REST client scoped to a specific guild.
#[derive(Clone)]
pub struct DiscordClient {
    /// The underlying HTTP client.
    http: reqwest::Client,

    /// API base URL without trailing slash.
    api_base: String,

    /// Bot token, sent as `Authorization: Bot <token>`.
    token: String,

    /// The guild this client is scoped to.
    guild: GuildId,

    /// The bot application, used for interaction follow-ups.
    application: ApplicationId,
}

impl DiscordClient {
    /// Creates a new client scoped to the given guild.
    pub fn new(
        http: reqwest::Client,
        api_base: impl Into<String>,
        token: impl Into<String>,
        guild: GuildId,
        application: ApplicationId,
    ) -> Self {
        let api_base: String = api_base.into();
        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.into(),
            guild,
            application,
        }
    }

    /// Returns the guild this client is scoped to.
    pub fn guild(&self) -> GuildId {
        self.guild
    }

    /// Returns the application id used for interaction follow-ups.
    pub fn application(&self) -> ApplicationId {
        self.application
    }

    /// Returns the API base URL.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Builds an absolute URL for an API path (which must start with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Builds an authenticated request.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("Authorization", format!("Bot {}", self.token))
    }

    /// Builds a request against an interaction or webhook endpoint.
    ///
    /// These endpoints authenticate by the token embedded in the path.
    pub fn webhook_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Path prefix for members of the scoped guild.
    pub fn members_path(&self) -> String {
        format!("/guilds/{}/members", self.guild)
    }
}

impl std::fmt::Debug for DiscordClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordClient")
            .field("api_base", &self.api_base)
            .field("guild", &self.guild)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DiscordClient {
        DiscordClient::new(
            reqwest::Client::new(),
            "https://example.test/api/v10/",
            "secret-token",
            GuildId(10),
            ApplicationId(20),
        )
    }

    #[test]
    fn url_joins_without_double_slash() {
        assert_eq!(
            client().url("/guilds/10/members"),
            "https://example.test/api/v10/guilds/10/members"
        );
    }

    #[test]
    fn debug_hides_token() {
        let debug = format!("{:?}", client());
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("guild"));
    }

    #[test]
    fn members_path_is_guild_scoped() {
        assert_eq!(client().members_path(), "/guilds/10/members");
    }
}
