use serde::Serialize;

use crate::game_state::{GameState, Phase};
use crate::pieces::{get_shape, Piece, Shape};
use crate::types::{Cell, PieceKind, Rotation, BOARD_WIDTH, VISIBLE_HEIGHT};

/// Read-only view of one board for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// Visible rows only, top to bottom
    pub board: [[Cell; BOARD_WIDTH as usize]; VISIBLE_HEIGHT as usize],
    pub active: Option<Piece>,
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    pub next_shape: Shape,
    pub score: u32,
    pub lines: u32,
    pub elapsed_secs: u32,
    pub pending_garbage: u8,
    pub gravity_ms: u32,
    pub phase: Phase,
    pub game_over: bool,
    pub episode_id: u32,
}

impl GameSnapshot {
    pub fn capture(game: &GameState) -> Self {
        let next = game.next_piece();
        Self {
            board: game.board().visible(),
            active: game.active(),
            ghost_y: game.ghost_y(),
            next,
            next_shape: get_shape(next, Rotation::North),
            score: game.score(),
            lines: game.lines(),
            elapsed_secs: game.elapsed_secs(),
            pending_garbage: game.pending_garbage(),
            gravity_ms: game.gravity_ms(),
            phase: game.phase(),
            game_over: game.is_game_over(),
            episode_id: game.episode_id(),
        }
    }

    pub fn playable(&self) -> bool {
        !self.game_over
    }

    /// Number of non-empty visible cells
    pub fn filled_cells(&self) -> usize {
        self.board
            .iter()
            .flatten()
            .filter(|cell| **cell != Cell::Empty)
            .count()
    }
}
