use alloc::vec::Vec;

use crate::*;
pub use shuffled::*;

mod shuffled;

pub trait GridGenerator {
    /// Deals a grid of `size` cells, rejecting sizes that cannot be filled with pairs.
    fn generate(self, size: Coord2) -> Result<Grid>;
}

/// Deals a fixed grid, for replaying a known layout.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedGridGenerator {
    values: Vec<PairValue>,
}

impl FixedGridGenerator {
    pub fn new(values: Vec<PairValue>) -> Self {
        Self { values }
    }
}

impl GridGenerator for FixedGridGenerator {
    fn generate(self, size: Coord2) -> Result<Grid> {
        Grid::from_values(size, &self.values)
    }
}
