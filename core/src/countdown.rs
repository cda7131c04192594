use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Seconds left after this tick.
    Running(u32),
    Expired,
}

/// Whole-second countdown plus a monotonic elapsed counter for scoring.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    limit_secs: u32,
    remaining_secs: u32,
    elapsed_secs: u32,
}

impl Countdown {
    pub const fn new(limit_secs: u32) -> Self {
        Self {
            limit_secs,
            remaining_secs: limit_secs,
            elapsed_secs: 0,
        }
    }

    pub const fn limit_secs(&self) -> u32 {
        self.limit_secs
    }

    pub const fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub const fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub const fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        self.remaining_secs = self.remaining_secs.saturating_sub(1);

        if self.is_expired() {
            TickOutcome::Expired
        } else {
            TickOutcome::Running(self.remaining_secs)
        }
    }
}
