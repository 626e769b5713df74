//! Hiscores leaderboard: feed client and in-memory snapshot.
//!
//! Data flows one way: the feed is fetched wholesale, turned into an
//! immutable [`LeaderboardSnapshot`], and published through [`Hiscores`].
//! Entries are never patched incrementally.

mod feed;
mod snapshot;

pub use feed::{DEFAULT_ENDPOINT, FeedError, HiscoresFeed, HttpFeed, decode_entries};
pub use snapshot::{Hiscores, LeaderboardSnapshot};
