use super::*;

/// Generation strategy that lays out every pair value twice and applies a uniform Fisher–Yates shuffle.
#[derive(Clone, Debug, PartialEq)]
pub struct ShuffledGridGenerator {
    seed: u64,
}

impl ShuffledGridGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Deals one of the preset sizes, which always hold an even number of cells.
    pub fn deal(self, grid_size: GridSize) -> Grid {
        let size = grid_size.dimensions();
        let values = self.shuffled_values(mult(size.0, size.1));
        Grid::from_paired_values(size, &values)
    }

    fn shuffled_values(&self, total_cells: CellCount) -> Vec<PairValue> {
        use rand::prelude::*;

        let mut values: Vec<PairValue> = (0..total_cells).map(|i| i / 2 + 1).collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        for i in (1..values.len()).rev() {
            let j = rng.random_range(0..=i);
            values.swap(i, j);
        }

        values
    }
}

impl GridGenerator for ShuffledGridGenerator {
    fn generate(self, size: Coord2) -> Result<Grid> {
        let size = validate_size(size)?;
        let values = self.shuffled_values(mult(size.0, size.1));
        log::trace!("dealt {}x{} grid from seed {}", size.0, size.1, self.seed);
        Ok(Grid::from_paired_values(size, &values))
    }
}
