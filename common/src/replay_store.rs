use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::LoadOptions;
use crate::constants::{MoveIndex, NO_MOVE};
use crate::error::{ReplayError, ReplayResult};
use crate::line_reader::LineReader;
use crate::moves::{Move, MoveDirections};
use crate::parser::{ParsedReplay, parse_replay};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Replay {
    loaded: bool,
    file_name: String,
    did_undo: bool,
    playback_delay_ms: u64,
    moves: Vec<Move>,
}

/// The currently loaded replay and the queries a viewer needs.
///
/// Loading is all-or-nothing: a candidate is parsed on the side and only
/// replaces the published replay once the whole file has been read. Queries
/// never fail; an index outside the replay yields 0, `false`,
/// `Direction::None` or an empty slice. Use [`ReplayStore::is_valid_index`]
/// when the distinction matters.
#[derive(Debug, Clone, Default)]
pub struct ReplayStore {
    options: LoadOptions,
    replay: Replay,
}

impl ReplayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            options,
            replay: Replay::default(),
        }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Loads a replay file. On error the previously loaded replay stays in place.
    pub fn load(&mut self, path: impl AsRef<Path>) -> ReplayResult<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| {
            warn!("Failed to open replay file {:?}: {}", path, source);
            ReplayError::Open {
                path: path.to_path_buf(),
                source,
            }
        })?;
        self.load_from_reader(path.display().to_string(), BufReader::new(file))
    }

    /// Loads a replay from any buffered source, recording `name` as the file name.
    pub fn load_from_reader<R: BufRead>(
        &mut self,
        name: impl Into<String>,
        reader: R,
    ) -> ReplayResult<()> {
        let name = name.into();
        let mut lines = LineReader::new(reader, self.options.max_line_length);

        let parsed = match parse_replay(&mut lines, &self.options) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Failed to load replay {}: {}", name, e);
                return Err(e);
            }
        };

        let ParsedReplay {
            did_undo,
            playback_delay_ms,
            moves,
        } = parsed;
        info!("Loaded replay {} with {} moves", name, moves.len());

        self.replay = Replay {
            loaded: true,
            file_name: name,
            did_undo,
            playback_delay_ms,
            moves,
        };
        Ok(())
    }

    pub fn is_loaded(&self) -> bool {
        self.replay.loaded
    }

    pub fn file_name(&self) -> &str {
        &self.replay.file_name
    }

    pub fn did_undo(&self) -> bool {
        self.replay.did_undo
    }

    pub fn move_count(&self) -> usize {
        self.replay.moves.len()
    }

    pub fn moves(&self) -> &[Move] {
        &self.replay.moves
    }

    pub fn playback_delay_ms(&self) -> u64 {
        self.replay.playback_delay_ms
    }

    pub fn playback_delay(&self) -> Duration {
        Duration::from_millis(self.replay.playback_delay_ms)
    }

    /// `NO_MOVE` or any index in `[0, move_count - 1]`.
    pub fn is_valid_index(&self, index: MoveIndex) -> bool {
        index == NO_MOVE || self.move_at(index).is_some()
    }

    pub fn move_at(&self, index: MoveIndex) -> Option<&Move> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.replay.moves.get(i))
    }

    // Dimension, sentinel and spawn count are written on every move but
    // never change within a file, so move 0 speaks for all of them.

    pub fn board_dimension(&self) -> usize {
        self.replay.moves.first().map_or(0, |m| m.board_dimension)
    }

    pub fn sentinel_value(&self) -> i64 {
        self.replay.moves.first().map_or(0, |m| m.sentinel_value)
    }

    pub fn spawn_count(&self) -> u32 {
        self.replay.moves.first().map_or(0, |m| m.spawn_count)
    }

    pub fn game_won(&self) -> bool {
        self.replay.moves.last().is_some_and(|m| m.is_win)
    }

    pub fn tile_at(&self, tile_index: usize, move_index: MoveIndex) -> i64 {
        self.move_at(move_index)
            .and_then(|m| m.tile(tile_index))
            .unwrap_or(0)
    }

    pub fn tiles_at(&self, move_index: MoveIndex) -> &[i64] {
        self.move_at(move_index)
            .map(|m| m.tiles.as_slice())
            .unwrap_or(&[])
    }

    /// Score after the move; 0 before the first move.
    pub fn score_at(&self, move_index: MoveIndex) -> i64 {
        self.move_at(move_index).map_or(0, |m| m.score)
    }

    pub fn best_score_at(&self, move_index: MoveIndex) -> i64 {
        self.move_at(move_index).map_or(0, |m| m.best_score)
    }

    pub fn is_win_at(&self, move_index: MoveIndex) -> bool {
        self.move_at(move_index).is_some_and(|m| m.is_win)
    }

    pub fn directions_at(&self, move_index: MoveIndex) -> MoveDirections {
        self.move_at(move_index)
            .map(Move::directions)
            .unwrap_or_default()
    }

    pub fn format_move_tiles(&self, move_index: MoveIndex) -> Option<String> {
        let mv = self.move_at(move_index)?;
        let mut out = format!("move {}:\n", move_index);
        for row in mv.rows() {
            let cells: Vec<String> = row.iter().map(|t| format!("{:>5}", t)).collect();
            let _ = writeln!(out, "{}", cells.join(""));
        }
        Some(out)
    }

    pub fn format_all_tiles(&self) -> String {
        (0..self.move_count() as MoveIndex)
            .filter_map(|i| self.format_move_tiles(i))
            .collect()
    }

    pub fn log_move_tiles(&self, move_index: MoveIndex) {
        match self.format_move_tiles(move_index) {
            Some(dump) => debug!("{}", dump),
            None => debug!("No move at index {}", move_index),
        }
    }

    pub fn log_all_tiles(&self) {
        for index in 0..self.move_count() as MoveIndex {
            self.log_move_tiles(index);
        }
    }
}
