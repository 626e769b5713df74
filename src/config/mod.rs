//! Startup configuration: the settings file and the environment.

mod env;
mod settings;

use std::path::PathBuf;

use thiserror::Error;

pub use env::{DEFAULT_BIND_ADDR, DEFAULT_LINKS_PATH, DEFAULT_SETTINGS_PATH, EnvConfig};
pub use settings::{NewRecordSettings, Settings};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed settings, including an invalid role policy.
    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    #[error("environment variable {name} is invalid: {reason}")]
    InvalidVar { name: &'static str, reason: String },
}
