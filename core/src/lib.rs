#![no_std]

extern crate alloc;

use core::ops::{Index, IndexMut};
use hashbrown::HashMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use config::*;
pub use countdown::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use leaderboard::*;
pub use scheduler::*;
pub use session::*;
pub use types::*;

mod cell;
mod config;
mod countdown;
mod engine;
mod error;
mod generator;
mod leaderboard;
mod scheduler;
mod session;
mod types;

/// Everything needed to deal and run a round.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub grid_size: GridSize,
    pub difficulty: Difficulty,
    pub timing: Timing,
}

impl GameConfig {
    pub const fn new(grid_size: GridSize, difficulty: Difficulty) -> Self {
        Self {
            grid_size,
            difficulty,
            timing: Timing::DEFAULT,
        }
    }

    pub const fn with_timing(self, timing: Timing) -> Self {
        Self { timing, ..self }
    }

    pub const fn size(&self) -> Coord2 {
        self.grid_size.dimensions()
    }

    pub const fn time_limit_secs(&self) -> u32 {
        self.difficulty.time_limit_secs()
    }
}

/// Checks that a grid of `size` can be filled with pairs.
pub fn validate_size(size: Coord2) -> Result<Coord2> {
    let total = mult(size.0, size.1);
    if total == 0 || total % 2 != 0 {
        Err(GameError::OddCellCount)
    } else {
        Ok(size)
    }
}

/// Rectangular board of cells where every value appears exactly twice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridCells")]
pub struct Grid {
    cells: Array2<Cell>,
}

/// Unchecked wire form of a [`Grid`].
#[derive(Deserialize)]
struct GridCells {
    cells: Array2<Cell>,
}

impl TryFrom<GridCells> for Grid {
    type Error = GameError;

    fn try_from(GridCells { cells }: GridCells) -> Result<Self> {
        let (rows, cols) = cells.dim();
        let size = (
            Coord::try_from(rows).map_err(|_| GameError::InvalidGridShape)?,
            Coord::try_from(cols).map_err(|_| GameError::InvalidGridShape)?,
        );
        validate_size(size)?;
        check_pairs(cells.iter().map(|cell| cell.value))?;
        Ok(Self { cells })
    }
}

fn check_pairs(values: impl Iterator<Item = PairValue>) -> Result<()> {
    let mut counts: HashMap<PairValue, u8> = HashMap::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        *count = count.saturating_add(1);
    }
    if counts.values().any(|&count| count != 2) {
        Err(GameError::UnpairedValue)
    } else {
        Ok(())
    }
}

impl Grid {
    /// Builds a grid from row-major values, rejecting anything that is not a clean set of pairs.
    pub fn from_values(size: Coord2, values: &[PairValue]) -> Result<Self> {
        let size = validate_size(size)?;
        if values.len() != usize::from(mult(size.0, size.1)) {
            return Err(GameError::InvalidGridShape);
        }

        check_pairs(values.iter().copied())?;
        Ok(Self::from_paired_values(size, values))
    }

    /// Shapes row-major values into a grid without recounting them. `values` must hold exactly one
    /// entry per cell.
    pub(crate) fn from_paired_values(size: Coord2, values: &[PairValue]) -> Self {
        let cols = usize::from(size.1);
        let cells = Array2::from_shape_fn(size.to_nd_index(), |(row, col)| {
            Cell::hidden(values[row * cols + col])
        });
        Self { cells }
    }

    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        // dimensions were built from `Coord` values
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn pair_count(&self) -> CellCount {
        self.total_cells() / 2
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        iter_coords(self.size())
    }

    /// Cell values in row-major order.
    pub fn values(&self) -> impl Iterator<Item = PairValue> + '_ {
        self.cells.iter().map(|cell| cell.value)
    }

    /// Coordinates of every cell holding `value`.
    pub fn positions_of(&self, value: PairValue) -> impl Iterator<Item = Coord2> + '_ {
        self.iter_coords().filter(move |&coords| self[coords].value == value)
    }

    pub fn all_disabled(&self) -> bool {
        self.cells.iter().all(|cell| cell.disabled)
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

/// Result of clicking a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Cell already face-up, or the round does not accept clicks.
    Ignored,
    /// First cell of a selection turned face-up.
    Revealed,
    Matched(PairValue),
    /// Both cells stay face-up until hidden by the caller.
    Mismatched([Coord2; 2]),
    /// Final pair matched.
    Won(PairValue),
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Ignored)
    }
}
