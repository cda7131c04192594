use alloc::collections::VecDeque;
use core::time::Duration;

use crate::*;

/// Deferred work owned by a session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Task {
    CountdownTick,
    HidePair([Coord2; 2]),
    AutoReset,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Scheduled {
    pub due: Duration,
    /// Round the task was scheduled for.
    pub round: u32,
    pub task: Task,
}

/// Pending tasks ordered by due time, ties kept in scheduling order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scheduler {
    queue: VecDeque<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, round: u32, task: Task) {
        let index = self.queue.partition_point(|pending| pending.due <= due);
        log::trace!("schedule {:?} at {:?} for round {}", task, due, round);
        self.queue.insert(index, Scheduled { due, round, task });
    }

    /// Removes and returns the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<Scheduled> {
        if self.queue.front()?.due <= now {
            self.queue.pop_front()
        } else {
            None
        }
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.front().map(|scheduled| scheduled.due)
    }

    pub fn cancel_all(&mut self) {
        if !self.queue.is_empty() {
            log::trace!("cancel {} pending tasks", self.queue.len());
            self.queue.clear();
        }
    }

    pub fn pending(&self) -> impl Iterator<Item = &Scheduled> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
