//! Leaderboard standing for a single display name.

use serde::{Deserialize, Serialize};

/// A hiscores leaderboard entry, as served by the leaderboard feed.
///
/// Entries are immutable: a refresh replaces the whole leaderboard rather than
/// patching individual entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    /// Leaderboard position, 1-based. `0` means "not on the leaderboard".
    pub rank: u32,
    pub name: String,
    pub score: u64,
    pub first_places: u32,
    pub second_places: u32,
    pub third_places: u32,
}

impl Entry {
    /// The sentinel "absent" entry. Evaluating it yields no eligible roles.
    pub fn empty() -> Self {
        Entry::missing("")
    }

    /// A sentinel entry for a name that is not on the leaderboard.
    pub fn missing(name: impl Into<String>) -> Self {
        Entry {
            id: 0,
            rank: 0,
            name: name.into(),
            score: 0,
            first_places: 0,
            second_places: 0,
            third_places: 0,
        }
    }

    /// Returns true for sentinel entries (rank 0 with all counters zero).
    pub fn is_empty(&self) -> bool {
        self.rank == 0
            && self.score == 0
            && self.first_places == 0
            && self.second_places == 0
            && self.third_places == 0
    }

    /// Rank 1 on the leaderboard.
    pub fn is_leader(&self) -> bool {
        self.rank == 1
    }

    /// Best placement is a first place.
    pub fn first_best(&self) -> bool {
        self.first_places >= 1
    }

    /// Best placement is a second place.
    pub fn second_best(&self) -> bool {
        self.first_places == 0 && self.second_places >= 1
    }

    /// Best placement is a third place.
    pub fn third_best(&self) -> bool {
        self.first_places == 0 && self.second_places == 0 && self.third_places >= 1
    }
}
