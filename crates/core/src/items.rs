//! Item effects - explosive, weight and single-row marker
//!
//! Effects mutate the board synchronously and report what they touched; any
//! flashing or staging is left to whoever renders the emitted events.

use arrayvec::ArrayVec;

use crate::board::{Board, Region};
use crate::pieces::Piece;
use crate::rng::SimpleRng;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, EXPLOSION_SIZE, ITEM_INTERVAL_LINES};

/// Columns touched by a weight drop (a weight is at most four wide)
pub type Columns = ArrayVec<i8, 4>;

/// Row-clear predicate.
///
/// A row clears when every cell is filled, or when it holds a settled line marker
/// and at most one cell is still unfilled.
pub fn row_qualifies(row: &[Cell]) -> bool {
    let unfilled = row.iter().filter(|cell| !cell.is_filled()).count();
    unfilled == 0 || (unfilled <= 1 && row.iter().any(Cell::is_marker))
}

/// Clear the blast square around the piece's core cell on both layers.
/// Returns `None` for pieces without a core.
pub fn explode(board: &mut Board, piece: &Piece) -> Option<Region> {
    let (cx, cy) = piece.core()?;
    Some(board.clear_square(cx, cy, EXPLOSION_SIZE))
}

/// Punch the piece through its own columns and re-place it flush with the floor.
/// Returns the relocated piece and the columns that were emptied.
pub fn drop_weight(board: &mut Board, piece: &Piece) -> (Piece, Columns) {
    board.erase(piece);
    let shape = piece.shape();
    let columns: Columns = (piece.x..piece.x + shape.width as i8).collect();
    for &x in &columns {
        board.clear_column(x);
    }
    let landed = piece.at(piece.x, BOARD_HEIGHT as i8 - shape.height as i8);
    board.place(&landed);
    (landed, columns)
}

/// Hands out an item piece once enough rows have been cleared
#[derive(Debug, Clone, Default)]
pub struct ItemDispenser {
    lines: u32,
}

impl ItemDispenser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_lines(&mut self, rows: u32) {
        self.lines += rows;
    }

    /// Rows cleared since the last item was handed out
    pub fn progress(&self) -> u32 {
        self.lines
    }

    /// An item kind if one is due, chosen uniformly
    pub fn take_due(&mut self, rng: &mut SimpleRng) -> Option<PieceKind> {
        if self.lines < ITEM_INTERVAL_LINES {
            return None;
        }
        self.lines -= ITEM_INTERVAL_LINES;
        let idx = rng.next_range(PieceKind::ITEMS.len() as u32) as usize;
        Some(PieceKind::ITEMS[idx])
    }
}
