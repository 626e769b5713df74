//! Leaderboard snapshots and their atomic publication.
//!
//! A [`LeaderboardSnapshot`] is immutable once built. [`Hiscores`] holds the
//! current snapshot behind an `Arc`; a successful refresh swaps in a new `Arc`
//! while readers that already hold the old one keep using it. Readers never
//! observe a half-updated leaderboard.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::feed::{FeedError, HiscoresFeed};
use crate::types::Entry;

/// An immutable view of the leaderboard at one point in time.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardSnapshot {
    entries: Vec<Entry>,
    /// Index of the first entry carrying each name.
    by_name: HashMap<String, usize>,
    fetched_at: Option<DateTime<Utc>>,
}

impl LeaderboardSnapshot {
    /// Builds a snapshot from freshly fetched entries.
    pub fn new(entries: Vec<Entry>, fetched_at: DateTime<Utc>) -> Self {
        let mut by_name = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            by_name.entry(entry.name.clone()).or_insert(i);
        }
        LeaderboardSnapshot {
            entries,
            by_name,
            fetched_at: Some(fetched_at),
        }
    }

    /// Returns the entry for `name`, or a sentinel entry if the name is not
    /// on the leaderboard. Matching is exact.
    pub fn entry_by_name(&self, name: &str) -> Entry {
        self.find(name)
            .cloned()
            .unwrap_or_else(|| Entry::missing(name))
    }

    /// Returns the entry for `name` if it is on the leaderboard.
    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// When the snapshot was fetched. `None` for the initial empty snapshot.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }
}

/// Holder of the current leaderboard snapshot.
#[derive(Debug, Default)]
pub struct Hiscores {
    current: RwLock<Arc<LeaderboardSnapshot>>,
}

impl Hiscores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> Arc<LeaderboardSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fetches the leaderboard and publishes it as the current snapshot.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn refresh<F: HiscoresFeed>(
        &self,
        feed: &F,
    ) -> Result<Arc<LeaderboardSnapshot>, FeedError> {
        match feed.fetch().await {
            Ok(entries) => {
                let snapshot = Arc::new(LeaderboardSnapshot::new(entries, Utc::now()));
                self.publish(snapshot.clone());
                debug!(entries = snapshot.len(), "Published leaderboard snapshot");
                Ok(snapshot)
            }
            Err(e) => {
                warn!(error = %e, "Leaderboard refresh failed, keeping previous snapshot");
                Err(e)
            }
        }
    }

    /// Replaces the current snapshot.
    pub fn publish(&self, snapshot: Arc<LeaderboardSnapshot>) {
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = snapshot;
    }
}
