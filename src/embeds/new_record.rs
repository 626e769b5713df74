//! New-record notifications posted by the leaderboard's webhook.
//!
//! The webhook embed carries one field per attribute. `player` and `pov`
//! repeat, once per player and per recording:
//!
//! | Field | Example |
//! |-------|---------|
//! | `boss` | `Nex` |
//! | `team_size` | `Duo` |
//! | `boss_mode` | `Normal` |
//! | `time` | `1:23.4` |
//! | `place` | `1` |
//! | `improvement` | `2.4` |
//! | `player` | `Zed` |
//! | `pov` | `https://youtu.be/...` |

use std::fmt;

use super::EmbedError;
use crate::effects::Embed;
use crate::links::{LinkRegistry, LinkStore, StoreError};

pub const SENT_DESCRIPTION: &str = "Sent :ballot_box_with_check:";
pub const SENT_COLOR: u32 = 0x0693E3;

/// Improvements at or below this many seconds are not mentioned.
const IMPROVEMENT_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub boss: String,
    pub team_size: String,
    pub boss_mode: String,
    pub time: String,
    /// 1, 2 or 3.
    pub place: u8,
    /// Improvement over the previous record, as written by the webhook.
    pub improvement: String,
    pub players: Vec<String>,
    pub povs: Vec<String>,
}

impl NewRecord {
    /// Parses a webhook embed. Unknown fields are ignored.
    pub fn from_embed(embed: &Embed) -> Result<Self, EmbedError> {
        let required = |name: &'static str| {
            embed
                .field(name)
                .map(str::to_string)
                .ok_or(EmbedError::MissingField(name))
        };

        let place_text = required("place")?;
        let place = match place_text.trim().parse::<u8>() {
            Ok(place @ 1..=3) => place,
            _ => {
                return Err(EmbedError::MalformedField {
                    field: "place",
                    value: place_text,
                });
            }
        };

        let improvement = required("improvement")?;
        if improvement.trim().parse::<f64>().is_err() {
            return Err(EmbedError::MalformedField {
                field: "improvement",
                value: improvement,
            });
        }

        let repeated = |name: &str| -> Vec<String> {
            embed
                .fields
                .iter()
                .filter(|f| f.name == name)
                .map(|f| f.value.clone())
                .collect()
        };

        Ok(NewRecord {
            boss: required("boss")?,
            team_size: required("team_size")?,
            boss_mode: required("boss_mode")?,
            time: required("time")?,
            place,
            improvement,
            players: repeated("player"),
            povs: repeated("pov"),
        })
    }

    /// Replaces each linked player name with a mention of the linked user.
    pub fn set_player_ids<S: LinkStore>(
        &mut self,
        registry: &LinkRegistry<S>,
    ) -> Result<(), StoreError> {
        for player in &mut self.players {
            if let Some(user) = registry.find_by_display_name(player)? {
                *player = user.user_id.mention();
            }
        }
        Ok(())
    }

    pub fn improvement_seconds(&self) -> f64 {
        self.improvement.trim().parse().unwrap_or(0.0)
    }

    fn place_ordinal(&self) -> &'static str {
        match self.place {
            1 => "1st",
            2 => "2nd",
            _ => "3rd",
        }
    }
}

impl fmt::Display for NewRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} place {} {} - {} - {} has been achieved by {}",
            self.place_ordinal(),
            self.team_size,
            self.boss,
            self.boss_mode,
            self.time,
            self.players.join(", ")
        )?;
        if self.improvement_seconds() > IMPROVEMENT_THRESHOLD {
            write!(
                f,
                " - beating the previous time by {} seconds!",
                self.improvement.trim()
            )?;
        }
        write!(f, "\n{}", self.povs.join("\n"))
    }
}

/// The webhook embed, marked as sent to the announcement channel.
pub fn webhook_sent_embed(embed: &Embed) -> Embed {
    Embed {
        title: embed.title.clone(),
        fields: embed.fields.clone(),
        description: Some(SENT_DESCRIPTION.to_string()),
        color: Some(SENT_COLOR),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EmbedField;
    use crate::links::MemoryLinkStore;
    use crate::types::UserId;

    fn record_embed(place: &str, improvement: &str) -> Embed {
        Embed {
            title: Some("New record".to_string()),
            fields: vec![
                EmbedField::new("boss", "Nex", true),
                EmbedField::new("team_size", "Duo", true),
                EmbedField::new("boss_mode", "Normal", true),
                EmbedField::new("time", "1:23.4", true),
                EmbedField::new("place", place, true),
                EmbedField::new("improvement", improvement, true),
                EmbedField::new("player", "Zed", false),
                EmbedField::new("player", "Ash", false),
                EmbedField::new("pov", "https://video.example/1", false),
                EmbedField::new("pov", "https://video.example/2", false),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn parses_repeated_fields() {
        let record = NewRecord::from_embed(&record_embed("2", "1.5")).unwrap();
        assert_eq!(record.place, 2);
        assert_eq!(record.players, vec!["Zed", "Ash"]);
        assert_eq!(record.povs.len(), 2);
        assert_eq!(record.improvement_seconds(), 1.5);
    }

    #[test]
    fn formats_with_improvement() {
        let record = NewRecord::from_embed(&record_embed("1", "2.0")).unwrap();
        assert_eq!(
            record.to_string(),
            "1st place Duo Nex - Normal - 1:23.4 has been achieved by Zed, Ash \
             - beating the previous time by 2.0 seconds!\n\
             https://video.example/1\nhttps://video.example/2"
        );
    }

    #[test]
    fn small_improvement_is_omitted() {
        let record = NewRecord::from_embed(&record_embed("3", "0.1")).unwrap();
        assert_eq!(
            record.to_string(),
            "3rd place Duo Nex - Normal - 1:23.4 has been achieved by Zed, Ash\n\
             https://video.example/1\nhttps://video.example/2"
        );
    }

    #[test]
    fn rejects_bad_place_and_missing_fields() {
        assert!(matches!(
            NewRecord::from_embed(&record_embed("4", "0")),
            Err(EmbedError::MalformedField { field: "place", .. })
        ));
        assert!(matches!(
            NewRecord::from_embed(&record_embed("1", "fast")),
            Err(EmbedError::MalformedField { field: "improvement", .. })
        ));

        let mut embed = record_embed("1", "0");
        embed.fields.retain(|f| f.name != "boss");
        assert!(matches!(
            NewRecord::from_embed(&embed),
            Err(EmbedError::MissingField("boss"))
        ));
    }

    #[test]
    fn linked_players_become_mentions() {
        let registry = LinkRegistry::new(MemoryLinkStore::new());
        registry.upsert(UserId(42), "Ash").unwrap();

        let mut record = NewRecord::from_embed(&record_embed("1", "0")).unwrap();
        record.set_player_ids(&registry).unwrap();

        assert_eq!(record.players, vec!["Zed", "<@42>"]);
    }

    #[test]
    fn sent_embed_keeps_title_and_fields() {
        let original = record_embed("1", "0");
        let sent = webhook_sent_embed(&original);
        assert_eq!(sent.title, original.title);
        assert_eq!(sent.fields, original.fields);
        assert_eq!(sent.description.as_deref(), Some(SENT_DESCRIPTION));
        assert_eq!(sent.color, Some(SENT_COLOR));
    }
}
