use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can abort a replay load.
///
/// Line numbers are 1-based physical line numbers in the replay file.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to open replay file {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read replay data")]
    Read(#[from] io::Error),

    #[error("unexpected end of file while reading {expected}")]
    UnexpectedEof { expected: &'static str },

    #[error("line {line} exceeds the {limit} byte limit")]
    LineTooLong { line: usize, limit: usize },

    #[error("line {line}: missing '{delimiter}' delimiter")]
    MissingDelimiter { line: usize, delimiter: char },

    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: invalid {field} {token:?}")]
    InvalidInteger {
        line: usize,
        field: &'static str,
        token: String,
    },

    #[error("line {line}: direction {value} is out of range 0..=4")]
    InvalidDirection { line: usize, value: i64 },

    #[error("line {line}: board dimension {dimension} exceeds limit {limit}")]
    BoardTooLarge {
        line: usize,
        dimension: usize,
        limit: usize,
    },

    #[error("line {line}: expected {expected} tiles, found {found}")]
    ShortTileList {
        line: usize,
        expected: usize,
        found: usize,
    },
}

pub type ReplayResult<T> = Result<T, ReplayError>;
