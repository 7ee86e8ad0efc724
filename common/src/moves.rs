use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    None,
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Decodes the on-disk encoding `0=None, 1=Up, 2=Down, 3=Left, 4=Right`.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Direction::None),
            1 => Some(Direction::Up),
            2 => Some(Direction::Down),
            3 => Some(Direction::Left),
            4 => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Direction::None => 0,
            Direction::Up => 1,
            Direction::Down => 2,
            Direction::Left => 3,
            Direction::Right => 4,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::None => "none",
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Direction that produced a move and the one leading away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveDirections {
    pub prev: Direction,
    pub next: Direction,
}

/// One recorded ply and the board as it looked afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub score: i64,
    pub best_score: i64,
    pub is_win: bool,
    pub prev_direction: Direction,
    pub next_direction: Direction,
    pub board_dimension: usize,
    pub sentinel_value: i64,
    pub spawn_count: u32,
    /// Row-major, `board_dimension * board_dimension` long
    pub tiles: Vec<i64>,
}

impl Move {
    pub fn directions(&self) -> MoveDirections {
        MoveDirections {
            prev: self.prev_direction,
            next: self.next_direction,
        }
    }

    pub fn tile(&self, index: usize) -> Option<i64> {
        self.tiles.get(index).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[i64]> {
        // chunks() panics on zero, and a 0x0 board has no rows anyway
        self.tiles.chunks(self.board_dimension.max(1))
    }

    pub fn highest_tile(&self) -> i64 {
        self.tiles.iter().copied().max().unwrap_or(0)
    }
}
