//! Garbage/attack queue
//!
//! Each board owns the queue of garbage rows it still has to absorb. The opponent
//! never touches it directly: cleared-line counts are handed over through
//! [`AttackQueue::queue_attack`], and the rows are pushed into the board at the next
//! spawn via [`AttackQueue::drain`].

use arrayvec::ArrayVec;

use crate::board::Board;
use crate::rng::SimpleRng;
use crate::types::{Cell, ATTACK_CAP, BOARD_WIDTH};

const WIDTH: usize = BOARD_WIDTH as usize;

/// One garbage row: filled except for a single hole column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GarbageRow([Cell; WIDTH]);

impl GarbageRow {
    pub fn with_gap(gap: usize) -> Self {
        let mut cells = [Cell::GarbageFill; WIDTH];
        if let Some(cell) = cells.get_mut(gap) {
            *cell = Cell::GarbageHole;
        }
        Self(cells)
    }

    pub fn random(rng: &mut SimpleRng) -> Self {
        Self::with_gap(rng.next_range(BOARD_WIDTH as u32) as usize)
    }

    pub fn cells(&self) -> &[Cell; WIDTH] {
        &self.0
    }

    /// Column of the hole
    pub fn gap(&self) -> Option<usize> {
        self.0.iter().position(|cell| *cell == Cell::GarbageHole)
    }
}

/// Result of draining the queue into a board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Nothing was pending
    Empty,
    /// This many rows were inserted
    Inserted(u8),
    /// Inserting this many rows would lift settled cells out of the playfield;
    /// the board was left untouched
    Overflow(u8),
}

/// Stack of pending garbage rows; the last pushed row is the newest
#[derive(Debug, Clone, Default)]
pub struct AttackQueue {
    rows: Vec<GarbageRow>,
}

impl AttackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows still owed to the board
    pub fn pending(&self) -> u8 {
        self.rows.len() as u8
    }

    /// Queue `lines` garbage rows, accepting only what fits under the cap.
    /// Returns the number of rows accepted.
    pub fn queue_attack(&mut self, lines: u8, rng: &mut SimpleRng) -> u8 {
        let accepted = lines.min(ATTACK_CAP.saturating_sub(self.pending()));
        for _ in 0..accepted {
            self.rows.push(GarbageRow::random(rng));
        }
        accepted
    }

    /// Insert every pending row at the bottom of `board`, oldest lowest.
    ///
    /// All rows go in as one transfer; on overflow nothing is inserted and the queue
    /// keeps its rows.
    pub fn drain(&mut self, board: &mut Board) -> DrainOutcome {
        let count = self.rows.len();
        if count == 0 {
            return DrainOutcome::Empty;
        }
        if !board.can_insert(count) {
            return DrainOutcome::Overflow(count as u8);
        }

        // Popping yields newest first, which is also top-to-bottom order.
        let mut batch: ArrayVec<GarbageRow, { ATTACK_CAP as usize }> = ArrayVec::new();
        while !batch.is_full() {
            match self.rows.pop() {
                Some(row) => batch.push(row),
                None => break,
            }
        }
        board.insert_garbage(&batch);
        DrainOutcome::Inserted(batch.len() as u8)
    }
}
