use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_BOARD_DIMENSION, DEFAULT_MAX_LINE_LENGTH};

/// Knobs that change how a replay file is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    /// Longest accepted physical line, terminator excluded
    pub max_line_length: usize,
    /// Largest accepted board side length
    pub max_board_dimension: usize,
    /// Reject move records with fewer than `dim * dim` tiles instead of
    /// zero-filling the rest
    pub strict_tiles: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            max_board_dimension: DEFAULT_MAX_BOARD_DIMENSION,
            strict_tiles: false,
        }
    }
}

impl LoadOptions {
    pub fn strict(mut self, strict_tiles: bool) -> Self {
        self.strict_tiles = strict_tiles;
        self
    }
}
