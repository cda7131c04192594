use serde::{Deserialize, Serialize};

use crate::PairValue;

/// One grid position: the value it hides plus its face-up state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub value: PairValue,
    /// Currently face-up.
    pub revealed: bool,
    /// Permanently matched, stays face-up.
    pub disabled: bool,
}

impl Cell {
    pub const fn hidden(value: PairValue) -> Self {
        Self {
            value,
            revealed: false,
            disabled: false,
        }
    }

    /// Whether a click on this cell can flip it.
    pub const fn is_selectable(self) -> bool {
        !self.revealed && !self.disabled
    }
}
