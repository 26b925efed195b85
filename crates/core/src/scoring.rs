//! Scoring module - drop scoring and the gravity speed ramp
//!
//! Faster gravity is worth more: every gravity step (or soft drop) scores
//! `201 - interval / 5`, so a step at the 1000ms start is worth 1 point and a step at
//! the 250ms floor is worth 151.

use crate::types::{
    Difficulty, GRAVITY_FLOOR_MS, GRAVITY_STEP_DECAY_MS, LINE_CLEAR_SCORE,
};

/// Points for one gravity step at the given interval
pub fn gravity_step_score(gravity_ms: u32) -> u32 {
    201u32.saturating_sub(gravity_ms / 5)
}

/// Interval after one gravity step
pub fn next_gravity_interval(gravity_ms: u32) -> u32 {
    shorten(gravity_ms, GRAVITY_STEP_DECAY_MS)
}

/// How much a line clear shortens the gravity interval
pub fn clear_speedup_ms(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 10,
        Difficulty::Normal => 12,
        Difficulty::Hard => 14,
    }
}

/// Interval after a line clear
pub fn gravity_after_clear(gravity_ms: u32, difficulty: Difficulty) -> u32 {
    shorten(gravity_ms, clear_speedup_ms(difficulty))
}

fn shorten(gravity_ms: u32, by: u32) -> u32 {
    if gravity_ms > GRAVITY_FLOOR_MS {
        gravity_ms.saturating_sub(by).max(GRAVITY_FLOOR_MS)
    } else {
        gravity_ms
    }
}

/// Points for clearing `rows` rows at once
pub fn line_clear_score(rows: usize) -> u32 {
    LINE_CLEAR_SCORE * rows as u32
}
