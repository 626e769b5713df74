//! Process configuration from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DISCORD_TOKEN` | required |
//! | `DISCORD_APPLICATION_ID` | required |
//! | `DISCORD_PUBLIC_KEY` | required (hex Ed25519 key) |
//! | `DISCORD_API_BASE` | `https://discord.com/api/v10` |
//! | `HISCORES_ENDPOINT` | `http://pvm-records.com/v1/leaderboard` |
//! | `BOT_SETTINGS` | `bot_settings.json` |
//! | `LINKS_PATH` | `links.json` |
//! | `BIND_ADDR` | `0.0.0.0:3000` |
//! | `NEW_RECORD_WEBHOOK_TOKEN` | unset |

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use super::ConfigError;
use crate::discord::DEFAULT_API_BASE;
use crate::hiscores::DEFAULT_ENDPOINT;
use crate::types::ApplicationId;

pub const DEFAULT_SETTINGS_PATH: &str = "bot_settings.json";
pub const DEFAULT_LINKS_PATH: &str = "links.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone)]
pub struct EnvConfig {
    pub token: String,
    pub application_id: ApplicationId,
    /// Hex-encoded interaction verification key.
    pub public_key: String,
    pub api_base: String,
    pub hiscores_endpoint: String,
    pub settings_path: PathBuf,
    pub links_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Token of the new-record webhook; enables marking resent records.
    pub new_record_webhook_token: Option<String>,
}

impl fmt::Debug for EnvConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvConfig")
            .field("token", &"[REDACTED]")
            .field("application_id", &self.application_id)
            .field("public_key", &self.public_key)
            .field("api_base", &self.api_base)
            .field("hiscores_endpoint", &self.hiscores_endpoint)
            .field("settings_path", &self.settings_path)
            .field("links_path", &self.links_path)
            .field("bind_addr", &self.bind_addr)
            .field(
                "new_record_webhook_token",
                &self.new_record_webhook_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl EnvConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::MissingVar(key));

        let token = required("DISCORD_TOKEN")?;
        let application_id = required("DISCORD_APPLICATION_ID")?
            .trim()
            .parse::<ApplicationId>()
            .map_err(|_| ConfigError::InvalidVar {
                name: "DISCORD_APPLICATION_ID",
                reason: "expected a numeric id".to_string(),
            })?;
        let public_key = required("DISCORD_PUBLIC_KEY")?;

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidVar {
                name: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        Ok(EnvConfig {
            token,
            application_id,
            public_key,
            api_base: get("DISCORD_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            hiscores_endpoint: get("HISCORES_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            settings_path: get("BOT_SETTINGS")
                .unwrap_or_else(|| DEFAULT_SETTINGS_PATH.to_string())
                .into(),
            links_path: get("LINKS_PATH")
                .unwrap_or_else(|| DEFAULT_LINKS_PATH.to_string())
                .into(),
            bind_addr,
            new_record_webhook_token: get("NEW_RECORD_WEBHOOK_TOKEN"),
        })
    }
}
