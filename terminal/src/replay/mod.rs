pub mod player;
pub mod reader;

use common::ReplayStore;
use serde::{Deserialize, Serialize};

/// Replay metadata as printed by `info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub file_name: String,
    pub move_count: usize,
    pub board_dimension: usize,
    pub sentinel_value: i64,
    pub spawn_count: u32,
    pub playback_delay_ms: u64,
    pub did_undo: bool,
    pub game_won: bool,
    pub final_score: i64,
    pub best_score: i64,
    pub highest_tile: i64,
}

impl ReplaySummary {
    pub fn from_store(store: &ReplayStore) -> Self {
        let last = store.move_count() as isize - 1;
        let highest_tile = store
            .moves()
            .iter()
            .map(|m| m.highest_tile())
            .max()
            .unwrap_or(0);

        Self {
            file_name: store.file_name().to_string(),
            move_count: store.move_count(),
            board_dimension: store.board_dimension(),
            sentinel_value: store.sentinel_value(),
            spawn_count: store.spawn_count(),
            playback_delay_ms: store.playback_delay_ms(),
            did_undo: store.did_undo(),
            game_won: store.game_won(),
            final_score: store.score_at(last),
            best_score: store.best_score_at(last),
            highest_tile,
        }
    }
}
