//! Leaderboard feed client.
//!
//! The feed is a single `GET` endpoint returning a JSON array of entries.
//! There is no retry: any failure means "no refresh" and the caller keeps the
//! previous snapshot.

use std::future::Future;

use reqwest::StatusCode;
use thiserror::Error;

use crate::types::Entry;

/// Default leaderboard endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://pvm-records.com/v1/leaderboard";

/// Errors that can occur while fetching the leaderboard.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network-level failure (DNS, connect, timeout, ...).
    #[error("leaderboard request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The feed answered with something other than 200 OK.
    #[error("leaderboard returned HTTP {0}")]
    Status(u16),

    /// The body was not a JSON array of entries.
    #[error("leaderboard payload could not be decoded: {0}")]
    Decode(String),

    /// The feed answered with an empty leaderboard.
    #[error("leaderboard payload was empty")]
    Empty,
}

/// A source of leaderboard entries.
pub trait HiscoresFeed: Send + Sync {
    /// Fetches the complete leaderboard.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Entry>, FeedError>> + Send;
}

/// HTTP implementation of [`HiscoresFeed`].
#[derive(Debug, Clone)]
pub struct HttpFeed {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpFeed {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        HttpFeed {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl HiscoresFeed for HttpFeed {
    async fn fetch(&self) -> Result<Vec<Entry>, FeedError> {
        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(FeedError::Request)?;

        if response.status() != StatusCode::OK {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await.map_err(FeedError::Request)?;
        decode_entries(&body)
    }
}

/// Decodes a feed payload.
///
/// An empty array is reported as [`FeedError::Empty`] so that an outage that
/// serves `[]` never wipes everyone's roles.
pub fn decode_entries(body: &[u8]) -> Result<Vec<Entry>, FeedError> {
    let entries: Vec<Entry> =
        serde_json::from_slice(body).map_err(|e| FeedError::Decode(e.to_string()))?;
    if entries.is_empty() {
        return Err(FeedError::Empty);
    }
    Ok(entries)
}
