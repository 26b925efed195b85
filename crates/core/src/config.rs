//! Session configuration

use serde::{Deserialize, Serialize};

use crate::types::{Difficulty, GameMode, DEFAULT_TIME_LIMIT_SECS, LOCK_DELAY_MS};

/// Options recognised by a session. Every field has a default, so `{}` is a valid
/// config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub mode: GameMode,
    pub seed: u32,
    /// Match duration in time-attack mode
    pub time_limit_secs: u32,
    pub lock_delay_ms: u32,
    /// Whether cleared lines are reported as outgoing attacks
    pub attacks_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            mode: GameMode::General,
            seed: 1,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            lock_delay_ms: LOCK_DELAY_MS,
            attacks_enabled: false,
        }
    }
}

impl GameConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn items_enabled(&self) -> bool {
        self.mode == GameMode::Item
    }

    /// Time limit in seconds, if this mode has one
    pub fn time_limit(&self) -> Option<u32> {
        (self.mode == GameMode::TimeAttack).then_some(self.time_limit_secs)
    }
}
