//! Chat platform API error types.
//!
//! This module defines error types that distinguish between kinds of API
//! failure. The bot never retries; the kind only decides how loudly a failure
//! is logged and lets callers recognise the common "member is gone" case:
//!
//! - **Transient** errors would likely succeed later (5xx, rate limits, network)
//! - **NotFound** means the target no longer exists (member left the guild)
//! - **Permanent** errors need a human (missing permissions, bad request)

use std::fmt;
use thiserror::Error;

/// The kind of API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscordErrorKind {
    /// Transient error - the next sweep will probably succeed.
    ///
    /// Examples:
    /// - HTTP 5xx (server errors)
    /// - HTTP 429 (rate limited)
    /// - Network timeouts
    Transient,

    /// The member, channel or message does not exist (HTTP 404).
    NotFound,

    /// Permanent error - requires human intervention.
    ///
    /// Examples:
    /// - HTTP 403 (bot role below the managed role, missing permission)
    /// - HTTP 400 (malformed request)
    /// - Authentication failures (401)
    Permanent,
}

impl DiscordErrorKind {
    /// Categorizes an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            404 => DiscordErrorKind::NotFound,
            429 => DiscordErrorKind::Transient,
            code if (500..600).contains(&code) => DiscordErrorKind::Transient,
            _ => DiscordErrorKind::Permanent,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, DiscordErrorKind::Transient)
    }
}

/// A chat platform API error with categorization.
#[derive(Debug, Error)]
pub struct DiscordApiError {
    /// The kind of error.
    pub kind: DiscordErrorKind,

    /// The HTTP status code, if available.
    pub status_code: Option<u16>,

    /// A human-readable description of the error.
    pub message: String,

    /// The underlying HTTP client error, if available.
    #[source]
    pub source: Option<reqwest::Error>,
}

impl fmt::Display for DiscordApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status_code {
            Some(code) => write!(f, "chat API error (HTTP {}): {}", code, self.message),
            None => write!(f, "chat API error: {}", self.message),
        }
    }
}

impl DiscordApiError {
    /// Creates an error from a non-success HTTP response.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let message = if body.is_empty() {
            "empty response body".to_string()
        } else {
            body
        };
        Self {
            kind: DiscordErrorKind::from_status(status),
            status_code: Some(status),
            message,
            source: None,
        }
    }

    /// Categorizes a reqwest error.
    ///
    /// Errors carrying a status are categorized by it; connect and timeout
    /// failures are transient; everything else (decode, builder) is permanent.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let kind = match status_code {
            Some(code) => DiscordErrorKind::from_status(code),
            None if err.is_connect() || err.is_timeout() || err.is_request() => {
                DiscordErrorKind::Transient
            }
            None => DiscordErrorKind::Permanent,
        };
        Self {
            kind,
            status_code,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Creates a not-found error without a source.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: DiscordErrorKind::NotFound,
            status_code: Some(404),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a permanent error without a source.
    pub fn permanent_without_source(message: impl Into<String>) -> Self {
        Self {
            kind: DiscordErrorKind::Permanent,
            status_code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transient error without a source.
    pub fn transient_without_source(message: impl Into<String>) -> Self {
        Self {
            kind: DiscordErrorKind::Transient,
            status_code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if the target member/message no longer exists.
    pub fn is_not_found(&self) -> bool {
        self.kind == DiscordErrorKind::NotFound
    }
}
