//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the simulation.
//! All types are plain data with no behaviour beyond parsing and small predicates,
//! so they can be used by the core, a renderer, or a headless runner alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 25 rows, of which rows 0-4 are a hidden spawn buffer and rows 5-24
//!   are the visible playfield
//! - **Spawn anchor**: (3, 4), the top-left of the piece's bounding box, one row
//!   above the visible top
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame step used by headless runners |
//! | `BASE_GRAVITY_MS` | 1000 | Gravity interval at session start |
//! | `GRAVITY_FLOOR_MS` | 250 | Gravity never gets faster than this |
//! | `GRAVITY_STEP_DECAY_MS` | 5 | Shortening applied on every gravity step |
//! | `LOCK_DELAY_MS` | 500 | Grace period after first resting contact |
//! | `CLEAR_WINDOW_MS` | 500 | Line-clear / explosion window before the next spawn |
//! | `CLOCK_TICK_MS` | 1000 | Elapsed-time tick |
//!
//! # Examples
//!
//! ```
//! use tetris_duel_types::{Intent, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::T;
//! assert_eq!(PieceKind::from_str("t"), Some(piece));
//! assert!(!piece.is_item());
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Intent::from_str("hardLock"), Some(Intent::HardLock));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 25);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Visible playfield height (20 rows)
pub const VISIBLE_HEIGHT: u8 = 20;

/// Hidden buffer rows above the visible playfield
pub const HIDDEN_ROWS: u8 = 5;

/// Total board height including the hidden buffer
pub const BOARD_HEIGHT: u8 = VISIBLE_HEIGHT + HIDDEN_ROWS;

/// Spawn anchor column (top-left of the bounding box)
pub const SPAWN_X: i8 = 3;

/// Spawn anchor row, one row above the visible top
pub const SPAWN_Y: i8 = HIDDEN_ROWS as i8 - 1;

/// Frame step used by headless runners (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at session start
pub const BASE_GRAVITY_MS: u32 = 1000;

/// Gravity interval floor
pub const GRAVITY_FLOOR_MS: u32 = 250;

/// Gravity shortening applied on every gravity step
pub const GRAVITY_STEP_DECAY_MS: u32 = 5;

/// Lock delay once the piece first rests on something
pub const LOCK_DELAY_MS: u32 = 500;

/// Flash interval of the clear animation the renderer is expected to play
pub const CLEAR_FLASH_MS: u32 = 50;

/// Number of flashes in a clear animation
pub const CLEAR_FLASHES: u32 = 10;

/// Window between a line clear (or explosion) and the next spawn
pub const CLEAR_WINDOW_MS: u32 = CLEAR_FLASH_MS * CLEAR_FLASHES;

/// Elapsed-time clock tick
pub const CLOCK_TICK_MS: u32 = 1000;

/// Maximum number of garbage rows that may be pending against one board
pub const ATTACK_CAP: u8 = 10;

/// Side length of the explosive piece's blast square (odd)
pub const EXPLOSION_SIZE: u8 = 5;

/// Cleared rows needed before the next item piece is handed out
pub const ITEM_INTERVAL_LINES: u32 = 10;

/// Points awarded per cleared row
pub const LINE_CLEAR_SCORE: u32 = 25;

/// Default time-attack match duration in seconds
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 120;

/// The ten piece kinds: seven standard tetrominoes and three item variants
///
/// - **I**: the long piece, uses its own kick table
/// - **O**: the square piece, never kicks
/// - **T**, **S**, **Z**, **J**, **L**: share the standard kick table
/// - **Explosive**: clears a square around its core cell on lock
/// - **Weight**: punches through its columns to the floor on lock, cannot rotate
/// - **SingleRow**: carries a line marker that lets a nearly full row clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
    Explosive,
    Weight,
    SingleRow,
}

impl PieceKind {
    /// The seven standard tetrominoes, in bag order
    pub const STANDARD: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// The item variants handed out in item mode
    pub const ITEMS: [PieceKind; 3] = [PieceKind::Explosive, PieceKind::Weight, PieceKind::SingleRow];

    /// Whether this kind is one of the item variants
    pub fn is_item(&self) -> bool {
        matches!(
            self,
            PieceKind::Explosive | PieceKind::Weight | PieceKind::SingleRow
        )
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_duel_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("I"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("weight"), Some(PieceKind::Weight));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "explosive" => Some(PieceKind::Explosive),
            "weight" => Some(PieceKind::Weight),
            "singlerow" => Some(PieceKind::SingleRow),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::Explosive => "explosive",
            PieceKind::Weight => "weight",
            PieceKind::SingleRow => "singleRow",
        }
    }
}

/// Rotation states, numbered 0..3 clockwise from the spawn orientation
///
/// The rotation cycle goes: North → East → South → West → North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_duel_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotation counter in 0..=3
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Parse rotation from string
    ///
    /// Accepts full names or single letters (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Some(Rotation::North),
            "east" | "e" => Some(Rotation::East),
            "south" | "s" => Some(Rotation::South),
            "west" | "w" => Some(Rotation::West),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Semantic intents delivered by the UI layer between ticks
///
/// The core never sees raw key events; whoever owns the keyboard translates
/// keys into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Intent {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece 90° clockwise (with kicks)
    Rotate,
    /// Drop piece one cell, scored like a gravity step
    SoftDrop,
    /// Snap piece to its ghost row and start the lock delay
    HardLock,
    /// Rebuild the session from scratch
    Restart,
}

impl Intent {
    /// Parse intent from its camelCase name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_duel_types::Intent;
    ///
    /// assert_eq!(Intent::from_str("moveLeft"), Some(Intent::MoveLeft));
    /// assert_eq!(Intent::from_str("ROTATE"), Some(Intent::Rotate));
    /// assert_eq!(Intent::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Intent::MoveLeft),
            "moveright" => Some(Intent::MoveRight),
            "rotate" => Some(Intent::Rotate),
            "softdrop" => Some(Intent::SoftDrop),
            "hardlock" => Some(Intent::HardLock),
            "restart" => Some(Intent::Restart),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::MoveLeft => "moveLeft",
            Intent::MoveRight => "moveRight",
            Intent::Rotate => "rotate",
            Intent::SoftDrop => "softDrop",
            Intent::HardLock => "hardLock",
            Intent::Restart => "restart",
        }
    }
}

/// Difficulty, selecting the piece-draw distribution and line-clear speed-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

/// Game mode
///
/// - **General**: standard pieces only
/// - **Item**: item pieces are injected every `ITEM_INTERVAL_LINES` cleared rows
/// - **TimeAttack**: the session ends after a fixed duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameMode {
    #[default]
    General,
    Item,
    TimeAttack,
}

impl GameMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "general" => Some(GameMode::General),
            "item" => Some(GameMode::Item),
            "timeattack" => Some(GameMode::TimeAttack),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::General => "general",
            GameMode::Item => "item",
            GameMode::TimeAttack => "timeAttack",
        }
    }
}

/// Per-cell visual tag carried by a piece's cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MinoTag {
    #[default]
    Plain,
    /// Centre of an explosive piece's blast
    Core,
    /// Single-row marker
    Marker,
}

/// One cell of a piece: which kind it belongs to and how it is tagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mino {
    pub kind: PieceKind,
    pub tag: MinoTag,
}

impl Mino {
    pub fn new(kind: PieceKind, tag: MinoTag) -> Self {
        Self { kind, tag }
    }
}

/// A cell marker on the board
///
/// `Falling` and `Ghost` only exist while there is an active piece.
/// `GarbageHole` is the gap of a garbage row: pieces may move into it, but it does
/// not count towards filling the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cell {
    #[default]
    Empty,
    Falling(Mino),
    Ghost,
    Settled(Mino),
    GarbageHole,
    GarbageFill,
}

impl Cell {
    /// Whether the cell blocks pieces and counts towards a full row
    pub fn is_filled(&self) -> bool {
        matches!(self, Cell::Settled(_) | Cell::GarbageFill)
    }

    /// Whether the cell is a settled single-row marker
    pub fn is_marker(&self) -> bool {
        matches!(
            self,
            Cell::Settled(Mino {
                tag: MinoTag::Marker,
                ..
            })
        )
    }

    /// Whether the cell belongs to the active piece's visual layer
    pub fn is_transient(&self) -> bool {
        matches!(self, Cell::Falling(_) | Cell::Ghost)
    }
}
