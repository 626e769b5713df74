//! Bot settings file.
//!
//! ```json
//! {
//!   "guild": 1,
//!   "admin_channel": 2,
//!   "admin_role": 3,
//!   "new_record": {"webhook": 4, "channel": 5},
//!   "hiscore_roles": {
//!     "hiscores_leader": 10,
//!     "first_place_holder": 11,
//!     "second_place_holder": 12,
//!     "third_place_holder": 13,
//!     "scores": [[100, 20], [500, 21]]
//!   }
//! }
//! ```
//!
//! Ids may be written as numbers or strings. The role policy is validated
//! while the file is parsed, so a bad policy never reaches a sweep.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::eligibility::RolePolicy;
use crate::types::{ChannelId, GuildId, RoleId, WebhookId};

/// Where new-record notifications are posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecordSettings {
    /// Incoming webhook that authors new-record messages.
    pub webhook: WebhookId,
    /// Channel the webhook posts into.
    pub channel: ChannelId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub guild: GuildId,
    /// Channel where link requests are reviewed.
    pub admin_channel: ChannelId,
    /// Role allowed to approve links and refresh roles.
    pub admin_role: RoleId,
    pub new_record: NewRecordSettings,
    pub hiscore_roles: RolePolicy,
}

impl Settings {
    /// Reads and validates the settings file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "guild": 1,
        "admin_channel": "2",
        "admin_role": 3,
        "new_record": {"webhook": 4, "channel": 5},
        "hiscore_roles": {
            "hiscores_leader": 10,
            "first_place_holder": 11,
            "second_place_holder": 12,
            "third_place_holder": 13,
            "scores": [[100, 20], [500, "21"]]
        }
    }"#;

    #[test]
    fn parses_sample() {
        let settings = Settings::from_slice(SAMPLE.as_bytes()).unwrap();
        assert_eq!(settings.guild, GuildId(1));
        assert_eq!(settings.admin_channel, ChannelId(2));
        assert_eq!(settings.new_record.webhook, WebhookId(4));
        assert_eq!(settings.hiscore_roles.leader_role(), RoleId(10));
        let tiers = settings.hiscore_roles.score_thresholds();
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[1].min_score, 500);
        assert_eq!(tiers[1].role, RoleId(21));
    }

    #[test]
    fn rejects_invalid_policy() {
        let duplicated = SAMPLE.replace("\"third_place_holder\": 13", "\"third_place_holder\": 10");
        let err = Settings::from_slice(duplicated.as_bytes()).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
        assert!(err.to_string().contains("role 10"));
    }

    #[test]
    fn rejects_missing_section() {
        let err = Settings::from_slice(br#"{"guild": 1}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn load_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = Settings::load(&path).unwrap_err();
        assert!(err.to_string().contains("missing.json"));

        std::fs::write(&path, SAMPLE).unwrap();
        assert!(Settings::load(&path).is_ok());
    }
}
