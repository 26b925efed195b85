//! Board module - manages the game grid
//!
//! The board is 10 columns x 25 rows. Rows 0-4 are a hidden spawn buffer, rows 5-24
//! are visible. Coordinates: (x, y) where x ranges 0..9 (left to right) and y ranges
//! 0..24 (top to bottom).
//!
//! Storage is split in two flat arrays:
//! - `settled`: locked minos and garbage rows, the only cells that block pieces
//! - `overlay`: the active piece's `Falling` cells and its `Ghost` preview
//!
//! Keeping the active piece out of the settled layer means collision checks are pure
//! queries and a failed move never has to be rolled back.

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::garbage::GarbageRow;
use crate::items::row_qualifies;
use crate::pieces::Piece;
use crate::types::{Cell, BOARD_HEIGHT, BOARD_WIDTH, HIDDEN_ROWS, VISIBLE_HEIGHT};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;
const HEIGHT: usize = BOARD_HEIGHT as usize;

/// Row indices, at most one per board row
pub type Rows = ArrayVec<usize, HEIGHT>;

/// Inclusive rectangle of board cells, already clamped to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    pub x0: i8,
    pub y0: i8,
    pub x1: i8,
    pub y1: i8,
}

impl Region {
    pub fn contains(&self, x: i8, y: i8) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// The game board - settled grid plus the active piece's visual layer
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    settled: [Cell; BOARD_SIZE],
    overlay: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            settled: [Cell::Empty; BOARD_SIZE],
            overlay: [Cell::Empty; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Cell as a renderer sees it: the overlay wins over the settled layer
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| match self.overlay[idx] {
            Cell::Empty => self.settled[idx],
            cell => cell,
        })
    }

    /// Settled-layer cell only
    pub fn settled(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.settled[idx])
    }

    /// Write a settled-layer cell
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.settled[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether (x, y) is inside the board and not blocked
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        matches!(self.settled(x, y), Some(cell) if !cell.is_filled())
    }

    /// True if any mino of `piece` at anchor (x, y) is out of bounds or overlaps a
    /// settled or garbage-fill cell. Pure query.
    pub fn collides(&self, piece: &Piece, x: i8, y: i8) -> bool {
        piece
            .shape()
            .offsets()
            .any(|(dx, dy, _)| !self.is_free(x + dx, y + dy))
    }

    /// Lowest y the piece can fall to from its current anchor
    pub fn ghost_y(&self, piece: &Piece) -> i8 {
        let mut y = piece.y;
        while !self.collides(piece, piece.x, y + 1) {
            y += 1;
        }
        y
    }

    /// Whether the piece rests on the floor or on a settled cell
    pub fn bottom_contact(&self, piece: &Piece) -> bool {
        self.collides(piece, piece.x, piece.y + 1)
    }

    /// Mark the piece as `Falling` and its landing footprint as `Ghost`.
    /// Returns the ghost row.
    pub fn place(&mut self, piece: &Piece) -> i8 {
        let ghost_y = self.ghost_y(piece);
        let shape = piece.shape();
        for (dx, dy, _) in shape.offsets() {
            if let Some(idx) = Self::index(piece.x + dx, ghost_y + dy) {
                self.overlay[idx] = Cell::Ghost;
            }
        }
        for (dx, dy, tag) in shape.offsets() {
            if let Some(idx) = Self::index(piece.x + dx, piece.y + dy) {
                self.overlay[idx] = Cell::Falling(piece.mino(tag));
            }
        }
        ghost_y
    }

    /// Clear the piece's `Falling` cells and the ghost preview. Never touches settled
    /// cells.
    pub fn erase(&mut self, piece: &Piece) {
        for (dx, dy, _) in piece.shape().offsets() {
            if let Some(idx) = Self::index(piece.x + dx, piece.y + dy) {
                self.overlay[idx] = Cell::Empty;
            }
        }
        // Only one piece is ever on the overlay, so every ghost is ours.
        for cell in self.overlay.iter_mut().filter(|cell| **cell == Cell::Ghost) {
            *cell = Cell::Empty;
        }
    }

    /// Settle every `Falling` cell, keeping its kind and tag, and drop the ghost
    pub fn fix_falling(&mut self) {
        for (settled, overlay) in self.settled.iter_mut().zip(self.overlay.iter_mut()) {
            if let Cell::Falling(mino) = *overlay {
                *settled = Cell::Settled(mino);
            }
            *overlay = Cell::Empty;
        }
    }

    fn row(&self, y: usize) -> &[Cell] {
        let start = y * WIDTH;
        &self.settled[start..start + WIDTH]
    }

    /// Rows that qualify for clearing, top to bottom
    pub fn full_rows(&self) -> Rows {
        (0..HEIGHT).filter(|&y| row_qualifies(self.row(y))).collect()
    }

    /// Remove the given rows and shift everything above down, preserving column order.
    /// Uses a two-pointer pass with `copy_within`; vacated top rows become empty.
    pub fn clear_rows(&mut self, rows: &[usize]) {
        if rows.is_empty() {
            return;
        }

        let mut write_y = HEIGHT;
        for read_y in (0..HEIGHT).rev() {
            if rows.contains(&read_y) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src = read_y * WIDTH;
                self.settled.copy_within(src..src + WIDTH, write_y * WIDTH);
            }
        }

        for cell in &mut self.settled[..write_y * WIDTH] {
            *cell = Cell::Empty;
        }
    }

    /// True if anything settled sits in the top visible row or above it
    pub fn top_row_occupied(&self) -> bool {
        self.settled[..(HIDDEN_ROWS as usize + 1) * WIDTH]
            .iter()
            .any(Cell::is_filled)
    }

    /// Whether `count` rows can be pushed in from below without lifting any
    /// settled cell above the visible area
    pub fn can_insert(&self, count: usize) -> bool {
        let limit = ((HIDDEN_ROWS as usize) + count).min(HEIGHT);
        !self.settled[..limit * WIDTH].iter().any(Cell::is_filled)
    }

    /// Push garbage rows in at the bottom, given top to bottom.
    /// Returns false and leaves the board untouched on overflow.
    pub fn insert_garbage(&mut self, rows: &[GarbageRow]) -> bool {
        let count = rows.len();
        if count == 0 {
            return true;
        }
        if !self.can_insert(count) {
            return false;
        }

        self.settled.copy_within(count * WIDTH.., 0);
        for (i, row) in rows.iter().enumerate() {
            let start = (HEIGHT - count + i) * WIDTH;
            self.settled[start..start + WIDTH].copy_from_slice(row.cells());
        }
        true
    }

    /// Empty a whole column on both layers
    pub fn clear_column(&mut self, x: i8) {
        for y in 0..BOARD_HEIGHT as i8 {
            if let Some(idx) = Self::index(x, y) {
                self.settled[idx] = Cell::Empty;
                self.overlay[idx] = Cell::Empty;
            }
        }
    }

    /// Empty a `size` x `size` square centred on (cx, cy) on both layers.
    /// Returns the affected region clamped to the board.
    pub fn clear_square(&mut self, cx: i8, cy: i8, size: u8) -> Region {
        let half = (size / 2) as i8;
        let region = Region {
            x0: (cx - half).max(0),
            y0: (cy - half).max(0),
            x1: (cx + half).min(BOARD_WIDTH as i8 - 1),
            y1: (cy + half).min(BOARD_HEIGHT as i8 - 1),
        };
        for y in region.y0..=region.y1 {
            for x in region.x0..=region.x1 {
                if let Some(idx) = Self::index(x, y) {
                    self.settled[idx] = Cell::Empty;
                    self.overlay[idx] = Cell::Empty;
                }
            }
        }
        region
    }

    /// Whether any `Falling` or `Ghost` marker is on the board
    pub fn has_overlay(&self) -> bool {
        self.overlay.iter().any(|cell| *cell != Cell::Empty)
    }

    /// Composite view of the visible rows
    pub fn visible(&self) -> [[Cell; WIDTH]; VISIBLE_HEIGHT as usize] {
        let mut out = [[Cell::Empty; WIDTH]; VISIBLE_HEIGHT as usize];
        for (row, y) in out.iter_mut().zip(HIDDEN_ROWS as i8..BOARD_HEIGHT as i8) {
            for (cell, x) in row.iter_mut().zip(0..BOARD_WIDTH as i8) {
                *cell = self.get(x, y).unwrap_or_default();
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
