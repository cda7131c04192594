use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// How many entries survive on the board.
pub const LEADERBOARD_CAPACITY: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    /// Elapsed seconds for the won round.
    pub time: u32,
}

/// Best elapsed times, fastest first, at most [`LEADERBOARD_CAPACITY`] long.
///
/// Stored as a plain sequence of entries. Whatever is loaded gets sorted and truncated again, so a
/// hand-edited or stale record cannot break the ordering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<LeaderboardEntry>", into = "Vec<LeaderboardEntry>")]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `time` would make it onto the board.
    pub fn qualifies(&self, time: u32) -> bool {
        self.rank_for(time) < LEADERBOARD_CAPACITY
    }

    /// Adds a result, returning its 0-based rank if it made the cut. An equal time ranks below
    /// the entries already holding it.
    pub fn record(&mut self, name: impl Into<String>, time: u32) -> Option<usize> {
        let rank = self.rank_for(time);
        if rank >= LEADERBOARD_CAPACITY {
            log::debug!("time {} did not make the leaderboard", time);
            return None;
        }

        self.entries.insert(
            rank,
            LeaderboardEntry {
                name: name.into(),
                time,
            },
        );
        self.entries.truncate(LEADERBOARD_CAPACITY);
        Some(rank)
    }

    fn rank_for(&self, time: u32) -> usize {
        self.entries.partition_point(|entry| entry.time <= time)
    }
}

impl From<Vec<LeaderboardEntry>> for Leaderboard {
    fn from(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by_key(|entry| entry.time);
        entries.truncate(LEADERBOARD_CAPACITY);
        Self { entries }
    }
}

impl From<Leaderboard> for Vec<LeaderboardEntry> {
    fn from(leaderboard: Leaderboard) -> Self {
        leaderboard.entries
    }
}
