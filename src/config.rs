//! Config file loading for the runner
//!
//! A config is a JSON object with the camelCase fields of [`GameConfig`]; missing
//! fields take their defaults. Environment variables override the file:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `TETRIS_DUEL_SEED` | `seed` |
//! | `TETRIS_DUEL_DIFFICULTY` | `difficulty` |
//! | `TETRIS_DUEL_MODE` | `mode` |

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::core::GameConfig;
use crate::types::{Difficulty, GameMode};

/// Longest lock delay a config may ask for
pub const MAX_LOCK_DELAY_MS: u32 = 5000;

/// Read, parse and validate a config file
pub fn load_config(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = parse_config(&text).with_context(|| format!("in {}", path.display()))?;
    Ok(config)
}

/// Parse and validate config JSON
pub fn parse_config(text: &str) -> Result<GameConfig> {
    let config: GameConfig = serde_json::from_str(text).context("invalid config JSON")?;
    validate(&config)?;
    Ok(config)
}

pub fn validate(config: &GameConfig) -> Result<()> {
    if config.time_limit_secs == 0 {
        bail!("timeLimitSecs must be greater than zero");
    }
    if !(1..=MAX_LOCK_DELAY_MS).contains(&config.lock_delay_ms) {
        bail!(
            "lockDelayMs must be between 1 and {}, got {}",
            MAX_LOCK_DELAY_MS,
            config.lock_delay_ms
        );
    }
    Ok(())
}

/// Apply `TETRIS_DUEL_*` overrides from the process environment
pub fn apply_env(config: GameConfig) -> Result<GameConfig> {
    apply_overrides(config, |key| std::env::var(key).ok())
}

fn apply_overrides(
    mut config: GameConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<GameConfig> {
    let var = |key: &str| {
        lookup(key)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    if let Some(seed) = var("TETRIS_DUEL_SEED") {
        config.seed = seed
            .parse()
            .with_context(|| format!("TETRIS_DUEL_SEED is not a number: {seed}"))?;
    }
    if let Some(name) = var("TETRIS_DUEL_DIFFICULTY") {
        match Difficulty::from_str(&name) {
            Some(difficulty) => config.difficulty = difficulty,
            None => bail!("unknown difficulty: {name}"),
        }
    }
    if let Some(name) = var("TETRIS_DUEL_MODE") {
        match GameMode::from_str(&name) {
            Some(mode) => config.mode = mode,
            None => bail!("unknown mode: {name}"),
        }
    }
    Ok(config)
}
