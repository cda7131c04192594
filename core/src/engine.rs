use alloc::collections::BTreeSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    Ready,
    Active,
    Won,
    TimedOut,
    /// Mismatch under a difficulty where mismatches lose.
    Lost,
    /// Ended by the player.
    Abandoned,
}

impl RoundState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub const fn is_finished(self) -> bool {
        matches!(
            self,
            Self::Won | Self::TimedOut | Self::Lost | Self::Abandoned
        )
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::Ready
    }
}

/// Face-up, unresolved cells in click order.
pub type Selection = SmallVec<[Coord2; 2]>;

/// Where the two-cell selection protocol stands between clicks. A second click resolves
/// immediately, so there is no resting state with two cells selected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    OneSelected(Coord2),
}

/// Grid plus the two-cell selection protocol. Knows nothing about time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchEngine {
    grid: Grid,
    selection: Selection,
    matched: BTreeSet<PairValue>,
    state: RoundState,
}

impl MatchEngine {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            selection: Selection::new(),
            matched: BTreeSet::new(),
            state: Default::default(),
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn size(&self) -> Coord2 {
        self.grid.size()
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.grid[coords]
    }

    pub fn selection(&self) -> &[Coord2] {
        &self.selection
    }

    pub fn selection_state(&self) -> SelectionState {
        match self.selection.first() {
            Some(&coords) => SelectionState::OneSelected(coords),
            None => SelectionState::Idle,
        }
    }

    pub fn matched_values(&self) -> &BTreeSet<PairValue> {
        &self.matched
    }

    pub fn total_pairs(&self) -> CellCount {
        self.grid.pair_count()
    }

    pub fn pairs_left(&self) -> CellCount {
        let matched = CellCount::try_from(self.matched.len()).unwrap_or(CellCount::MAX);
        self.total_pairs().saturating_sub(matched)
    }

    /// `Ready` ⇒ `Active`. Returns whether the state changed.
    pub fn start(&mut self) -> bool {
        if self.state.is_ready() {
            self.state = RoundState::Active;
            true
        } else {
            false
        }
    }

    pub fn select(&mut self, coords: Coord2) -> Result<SelectOutcome> {
        let coords = self.grid.validate_coords(coords)?;

        if !self.state.is_active() || !self.grid[coords].is_selectable() {
            return Ok(SelectOutcome::Ignored);
        }

        self.grid[coords].revealed = true;
        self.selection.push(coords);

        if self.selection.len() < 2 {
            return Ok(SelectOutcome::Revealed);
        }

        let first = self.selection[0];
        let second = self.selection[1];
        self.selection.clear();

        let value = self.grid[first].value;
        if value != self.grid[second].value {
            return Ok(SelectOutcome::Mismatched([first, second]));
        }

        self.mark_matched(value);

        // a duplicate-value grid can run out of cells before every pair is counted
        if self.matched.len() == usize::from(self.total_pairs()) || self.grid.all_disabled() {
            self.finish(RoundState::Won);
            Ok(SelectOutcome::Won(value))
        } else {
            Ok(SelectOutcome::Matched(value))
        }
    }

    /// Turns a mismatched pair face-down again, skipping cells matched in the meantime.
    pub fn hide_pair(&mut self, pair: [Coord2; 2]) -> bool {
        let mut updated = false;
        for coords in pair {
            if self.grid.validate_coords(coords).is_err() {
                log::warn!("hide for out of bounds cell {:?}", coords);
                continue;
            }
            let cell = &mut self.grid[coords];
            if cell.revealed && !cell.disabled && !self.selection.contains(&coords) {
                cell.revealed = false;
                updated = true;
            }
        }
        updated
    }

    pub fn time_out(&mut self) -> bool {
        self.finish_active(RoundState::TimedOut)
    }

    pub fn lose(&mut self) -> bool {
        self.finish_active(RoundState::Lost)
    }

    pub fn abandon(&mut self) -> bool {
        self.finish_active(RoundState::Abandoned)
    }

    fn mark_matched(&mut self, value: PairValue) {
        self.matched.insert(value);

        // a sound grid has exactly two, but match by value in case it does not
        let mut disabled = 0;
        for cell in self.grid.cells_mut().filter(|cell| cell.value == value) {
            cell.revealed = true;
            cell.disabled = true;
            disabled += 1;
        }
        if disabled != 2 {
            log::warn!("value {} disabled {} cells, expected 2", value, disabled);
        }
    }

    fn finish_active(&mut self, end: RoundState) -> bool {
        if self.state.is_active() {
            self.finish(end);
            true
        } else {
            false
        }
    }

    fn finish(&mut self, end: RoundState) {
        if self.state.is_finished() {
            return;
        }

        log::debug!(
            "round over: {:?}, {} of {} pairs",
            end,
            self.matched.len(),
            self.total_pairs()
        );
        self.state = end;
        self.selection.clear();
    }
}
