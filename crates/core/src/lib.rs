//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the whole simulation: board, pieces, rotation, the lock state
//! machine, garbage exchange and item effects. It has **zero dependencies** on UI,
//! input devices or I/O, making it:
//!
//! - **Deterministic**: the same seed and intent sequence produce the same game
//! - **Testable**: every rule is reachable from a plain function call
//! - **Portable**: a terminal, a GUI or a headless runner can drive it
//!
//! # Module Structure
//!
//! - [`board`]: 10x25 grid with a separate overlay for the falling piece and its ghost
//! - [`pieces`]: static catalog of the ten piece kinds and the `Piece` value type
//! - [`kicks`]: anchor corrections and wall kick tables
//! - [`game_state`]: the controller and lock state machine
//! - [`garbage`]: attack queue and garbage rows
//! - [`items`]: explosive, weight and single-row marker effects
//! - [`rng`]: LCG, bag and weighted piece generation
//! - [`scoring`]: drop scoring and gravity ramp
//! - [`clock`]: turns wall time into gravity and clock ticks
//! - [`versus`]: two boards joined by the attack hand-off
//!
//! # Example
//!
//! ```
//! use tetris_duel_core::{GameConfig, GameState};
//! use tetris_duel_types::Intent;
//!
//! let mut game = GameState::new(GameConfig::with_seed(12345));
//! game.start();
//!
//! game.apply(Intent::MoveRight);
//! game.apply(Intent::Rotate);
//! game.apply(Intent::HardLock);
//!
//! // The lock delay runs until the next gravity tick.
//! let outcome = game.tick(true);
//! assert!(outcome.applied);
//! ```
//!
//! # Timing
//!
//! The core never sleeps or owns a timer. Call `tick(true)` when the armed gravity
//! interval elapses and `tick(false)` once per second, or let [`Clock`] do it from
//! wall time. Every [`Outcome`] carrying `rearm_ms` restarts the gravity countdown.

pub mod board;
pub mod clock;
pub mod config;
pub mod events;
pub mod game_state;
pub mod garbage;
pub mod items;
pub mod kicks;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod versus;

pub use tetris_duel_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Region};
pub use clock::Clock;
pub use config::GameConfig;
pub use events::{GameEvent, GameOverReason, Outcome};
pub use game_state::{GameState, Phase};
pub use garbage::{AttackQueue, DrainOutcome, GarbageRow};
pub use items::{row_qualifies, ItemDispenser};
pub use kicks::try_rotate;
pub use pieces::{get_shape, spec, Piece, PieceSpec, Shape};
pub use rng::{PieceQueue, SimpleRng};
pub use snapshot::GameSnapshot;
pub use versus::{MatchResult, Side, Versus};
