use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Grid must have an even, non-zero number of cells")]
    OddCellCount,
    #[error("Grid values do not match declared size")]
    InvalidGridShape,
    #[error("Every value must appear exactly twice")]
    UnpairedValue,
    #[error("Unknown grid size, expected one of 4x4, 6x6, 8x8")]
    UnknownGridSize,
    #[error("Unknown difficulty, expected one of relaxed, normal, sudden-death")]
    UnknownDifficulty,
}

pub type Result<T> = core::result::Result<T, GameError>;
