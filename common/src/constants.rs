/// Longest physical line accepted by the line reader, in bytes
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Largest board side length accepted in a move record
pub const DEFAULT_MAX_BOARD_DIMENSION: usize = 64;

/// Marker line for an empty undo/redo list section
pub const EMPTY_LIST_MARKER: &str = "NULL:";

/// Move index meaning "no move selected", i.e. the empty board before move 0
pub const NO_MOVE: MoveIndex = -1;

/// Signed so that `NO_MOVE` can be expressed
pub type MoveIndex = isize;
