use super::reader::ReplayReader;
use common::{LoadOptions, Move, MoveDirections, MoveIndex, ReplayError, ReplayStore, NO_MOVE};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    NoFileLoaded,
    /// Loaded, showing the empty board before move 0
    FileLoaded,
    PositionedAtMove(usize),
}

/// Cursor over a loaded replay.
///
/// Every movement is checked against the replay bounds; a rejected
/// movement returns `false` and leaves the cursor where it was.
pub struct ReplayPlayer {
    store: ReplayStore,
    current_move: MoveIndex,
}

impl ReplayPlayer {
    pub fn new(options: LoadOptions) -> Self {
        Self::from_store(ReplayStore::with_options(options))
    }

    pub fn from_store(store: ReplayStore) -> Self {
        Self {
            store,
            current_move: NO_MOVE,
        }
    }

    /// Loads a new replay and rewinds to before the first move.
    /// On failure both the replay and the cursor are unchanged.
    pub fn load(&mut self, path: &Path) -> Result<(), ReplayError> {
        ReplayReader::load_into(&mut self.store, path)?;
        self.current_move = NO_MOVE;
        Ok(())
    }

    pub fn store(&self) -> &ReplayStore {
        &self.store
    }

    pub fn state(&self) -> PlaybackState {
        if !self.store.is_loaded() {
            PlaybackState::NoFileLoaded
        } else if self.current_move == NO_MOVE {
            PlaybackState::FileLoaded
        } else {
            PlaybackState::PositionedAtMove(self.current_move as usize)
        }
    }

    pub fn current_index(&self) -> MoveIndex {
        self.current_move
    }

    /// Jump to a specific move
    pub fn seek_to_move(&mut self, index: MoveIndex) -> bool {
        if index < 0 || !self.store.is_valid_index(index) {
            debug!(
                "Rejected seek to move {} (replay has {} moves)",
                index,
                self.store.move_count()
            );
            return false;
        }
        self.current_move = index;
        true
    }

    pub fn seek_first(&mut self) -> bool {
        self.seek_to_move(0)
    }

    pub fn seek_last(&mut self) -> bool {
        self.seek_to_move(self.store.move_count() as MoveIndex - 1)
    }

    /// Move forward by n moves
    pub fn step_forward(&mut self, moves: usize) -> bool {
        let target = MoveIndex::try_from(moves)
            .ok()
            .and_then(|n| self.current_move.checked_add(n));
        match target {
            Some(index) => self.seek_to_move(index),
            None => false,
        }
    }

    /// Move back by n moves; never returns to the empty board
    pub fn step_backward(&mut self, moves: usize) -> bool {
        let target = MoveIndex::try_from(moves)
            .ok()
            .and_then(|n| self.current_move.checked_sub(n));
        match target {
            Some(index) => self.seek_to_move(index),
            None => false,
        }
    }

    pub fn current_move(&self) -> Option<&Move> {
        self.store.move_at(self.current_move)
    }

    pub fn current_tiles(&self) -> &[i64] {
        self.store.tiles_at(self.current_move)
    }

    pub fn current_score(&self) -> i64 {
        self.store.score_at(self.current_move)
    }

    pub fn current_best_score(&self) -> i64 {
        self.store.best_score_at(self.current_move)
    }

    pub fn current_directions(&self) -> MoveDirections {
        self.store.directions_at(self.current_move)
    }
}
