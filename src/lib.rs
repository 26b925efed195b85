//! Tetris Duel (workspace facade crate).
//!
//! The simulation lives in dedicated crates under `crates/`; this package re-exports
//! them as `tetris_duel::{core, types}` and adds config file loading for the
//! headless runner.

pub mod config;

pub use tetris_duel_core as core;
pub use tetris_duel_types as types;
