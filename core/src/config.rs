use core::fmt;
use core::str::FromStr;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Grid dimensions offered to the player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl GridSize {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    pub const fn dimensions(self) -> Coord2 {
        use GridSize::*;
        match self {
            Small => (4, 4),
            Medium => (6, 6),
            Large => (8, 8),
        }
    }

    pub const fn label(self) -> &'static str {
        use GridSize::*;
        match self {
            Small => "4x4",
            Medium => "6x6",
            Large => "8x8",
        }
    }

    pub const fn total_pairs(self) -> CellCount {
        let (rows, cols) = self.dimensions();
        mult(rows, cols) / 2
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GridSize {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|size| size.label().eq_ignore_ascii_case(s))
            .ok_or(GameError::UnknownGridSize)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Long countdown.
    Relaxed,
    #[default]
    Normal,
    /// Normal countdown, but the first mismatch loses the round.
    SuddenDeath,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Relaxed, Self::Normal, Self::SuddenDeath];

    pub const fn time_limit_secs(self) -> u32 {
        use Difficulty::*;
        match self {
            Relaxed => 600,
            Normal | SuddenDeath => 300,
        }
    }

    pub const fn mismatch_loses(self) -> bool {
        matches!(self, Self::SuddenDeath)
    }

    pub const fn label(self) -> &'static str {
        use Difficulty::*;
        match self {
            Relaxed => "relaxed",
            Normal => "normal",
            SuddenDeath => "sudden-death",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.label().eq_ignore_ascii_case(s))
            .ok_or(GameError::UnknownDifficulty)
    }
}

/// Delays used by the session scheduler.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// Countdown tick period.
    pub tick: Duration,
    /// How long a mismatched pair stays face-up.
    pub mismatch_delay: Duration,
    /// Cooldown between a lost or timed out round and the automatic reset.
    pub reset_cooldown: Duration,
}

impl Timing {
    pub const DEFAULT: Self = Self {
        tick: Duration::from_secs(1),
        mismatch_delay: Duration::from_secs(1),
        reset_cooldown: Duration::from_secs(120),
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}
