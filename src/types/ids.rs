//! Newtype wrappers for chat platform identifiers.
//!
//! The chat platform identifies everything by 64-bit "snowflakes". These types
//! prevent accidental mixing of different ID kinds (e.g., passing a `ChannelId`
//! where a `RoleId` is expected) and make the code more self-documenting.
//!
//! On the wire the platform encodes snowflakes as JSON strings, while the bot
//! settings file historically stores them as plain numbers. Deserialization
//! accepts either form; serialization always produces a string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serde helpers for snowflakes that may be encoded as strings or numbers.
pub(crate) mod snowflake {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        struct SnowflakeVisitor;

        impl Visitor<'_> for SnowflakeVisitor {
            type Value = u64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a snowflake as an unsigned integer or a string of digits")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
                Ok(v)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
                u64::try_from(v).map_err(|_| E::custom(format!("negative snowflake: {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
                v.parse()
                    .map_err(|_| E::custom(format!("invalid snowflake: {v:?}")))
            }
        }

        deserializer.deserialize_any(SnowflakeVisitor)
    }
}

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(#[serde(with = "snowflake")] pub u64);

        impl $name {
            /// Returns the raw snowflake value.
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                $name(n)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map($name)
            }
        }
    };
}

snowflake_id!(
    /// A platform user. Doubles as the guild member id.
    UserId
);

snowflake_id!(
    /// A role within the guild.
    RoleId
);

snowflake_id!(
    /// The guild (server) the bot manages.
    GuildId
);

snowflake_id!(
    /// A text channel.
    ChannelId
);

snowflake_id!(
    /// A chat message.
    MessageId
);

snowflake_id!(
    /// The bot's application, used for interaction follow-ups.
    ApplicationId
);

snowflake_id!(
    /// An incoming webhook (e.g. the new-record feed).
    WebhookId
);

impl UserId {
    /// Formats the user as a chat mention (`<@id>`).
    pub fn mention(self) -> String {
        format!("<@{}>", self.0)
    }

    /// Parses a user mention of the form `<@id>` (or the legacy `<@!id>`).
    pub fn parse_mention(s: &str) -> Option<Self> {
        let inner = s.trim().strip_prefix("<@")?.strip_suffix('>')?;
        let digits = inner.strip_prefix('!').unwrap_or(inner);
        digits.parse().ok().map(UserId)
    }
}

impl RoleId {
    /// Formats the role as a chat mention (`<@&id>`).
    pub fn mention(self) -> String {
        format!("<@&{}>", self.0)
    }
}
