//! Headless match runner (default binary).
//!
//! Drives one board or a two-player match with a random autoplayer at a fixed
//! 16ms frame step, logs notable events to stderr and prints the final snapshots as
//! JSON on stdout.
//!
//! ```text
//! tetris-duel [--config <path>] [--seed <n>] [--frames <n>] [--single]
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;

use tetris_duel::config::{apply_env, load_config, validate};
use tetris_duel::core::{
    Clock, GameConfig, GameEvent, GameSnapshot, GameState, MatchResult, Outcome, Side,
    SimpleRng, Versus,
};
use tetris_duel::types::{Intent, TICK_MS};

/// Default run length: five minutes of frames
const DEFAULT_FRAMES: u32 = 5 * 60 * 1000 / TICK_MS;

/// Frames between autoplayer decisions
const DECISION_FRAMES: u32 = 6;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    seed: Option<u32>,
    frames: Option<u32>,
    single: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or_else(|| anyhow!("--config needs a path"))?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--seed" => {
                let value = args.next().ok_or_else(|| anyhow!("--seed needs a value"))?;
                parsed.seed = Some(value.parse().with_context(|| format!("bad seed: {value}"))?);
            }
            "--frames" => {
                let value = args.next().ok_or_else(|| anyhow!("--frames needs a value"))?;
                parsed.frames =
                    Some(value.parse().with_context(|| format!("bad frame count: {value}"))?);
            }
            "--single" => parsed.single = true,
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(parsed)
}

/// Random intent source standing in for a human
struct Autoplayer {
    rng: SimpleRng,
}

impl Autoplayer {
    const INTENTS: [Intent; 5] = [
        Intent::MoveLeft,
        Intent::MoveRight,
        Intent::Rotate,
        Intent::SoftDrop,
        Intent::HardLock,
    ];

    fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    fn pick(&mut self) -> Intent {
        Self::INTENTS[self.rng.next_range(Self::INTENTS.len() as u32) as usize]
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    frames: u32,
    result: Option<MatchResult>,
    players: Vec<GameSnapshot>,
}

fn log_events(tag: &str, outcome: &Outcome) {
    for event in &outcome.events {
        match event {
            GameEvent::LinesCleared { rows, was_attack } => {
                eprintln!("[Match] {tag} cleared {} row(s), attack={was_attack}", rows.len());
            }
            GameEvent::Exploded { region } => {
                eprintln!("[Match] {tag} exploded {region:?}");
            }
            GameEvent::AttackReceived { lines } => {
                eprintln!("[Match] {tag} received {lines} garbage row(s)");
            }
            GameEvent::GameOver {
                final_score,
                lines,
                elapsed_secs,
                reason,
            } => {
                eprintln!(
                    "[Match] {tag} game over ({reason:?}): score={final_score} lines={lines} time={elapsed_secs}s"
                );
            }
            _ => {}
        }
    }
}

fn run_single(config: GameConfig, frames: u32) -> Report {
    let mut game = GameState::new(config);
    let mut bot = Autoplayer::new(config.seed ^ 0x9e37_79b9);
    let mut clock = Clock::for_game(&game);
    clock.observe(&game.start());

    let mut played = 0;
    for frame in 0..frames {
        played = frame + 1;
        if frame % DECISION_FRAMES == 0 {
            let out = game.apply(bot.pick());
            clock.observe(&out);
            log_events("solo", &out);
        }
        let out = clock.advance(&mut game, TICK_MS);
        log_events("solo", &out);
        if game.is_game_over() {
            break;
        }
    }

    Report {
        frames: played,
        result: None,
        players: vec![game.snapshot()],
    }
}

fn run_versus(config: GameConfig, frames: u32) -> Report {
    let mut game = Versus::new(config);
    let mut bots = [
        Autoplayer::new(config.seed ^ 0x9e37_79b9),
        Autoplayer::new(config.seed ^ 0x85eb_ca6b),
    ];
    let tags = ["p1", "p2"];
    game.start();

    let mut played = 0;
    for frame in 0..frames {
        played = frame + 1;
        if frame % DECISION_FRAMES == 0 {
            for (side, bot) in [Side::One, Side::Two].into_iter().zip(bots.iter_mut()) {
                let outs = game.apply(side, bot.pick());
                for (tag, out) in tags.iter().zip(&outs) {
                    log_events(tag, out);
                }
            }
        }
        let outs = game.advance(TICK_MS);
        for (tag, out) in tags.iter().zip(&outs) {
            log_events(tag, out);
        }
        if game.is_finished() {
            break;
        }
    }

    if let Some(result) = game.result() {
        eprintln!("[Match] result: {result:?}");
    }
    Report {
        frames: played,
        result: game.result(),
        players: vec![
            game.player(Side::One).snapshot(),
            game.player(Side::Two).snapshot(),
        ],
    }
}

fn main() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };
    config = apply_env(config)?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    validate(&config)?;

    eprintln!(
        "[Config] difficulty={} mode={} seed={} single={}",
        config.difficulty.as_str(),
        config.mode.as_str(),
        config.seed,
        args.single
    );

    let frames = args.frames.unwrap_or(DEFAULT_FRAMES);
    let report = if args.single {
        run_single(config, frames)
    } else {
        run_versus(config, frames)
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
