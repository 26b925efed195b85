//! Two-player match
//!
//! Two independent sessions share a piece seed so both players see the same piece
//! sequence. The only thing that crosses between them is the attack hand-off: after
//! every intent or clock advance, each side's cleared-line count is moved into the
//! opponent's attack queue in one call.

use serde::Serialize;

use crate::clock::Clock;
use crate::config::GameConfig;
use crate::events::{GameOverReason, Outcome};
use crate::game_state::GameState;
use crate::types::Intent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub fn index(self) -> usize {
        match self {
            Side::One => 0,
            Side::Two => 1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchResult {
    Winner(Side),
    Draw,
}

#[derive(Debug, Clone)]
pub struct Versus {
    players: [GameState; 2],
    clocks: [Clock; 2],
    result: Option<MatchResult>,
}

impl Versus {
    /// Attacks are always on in a match, whatever the config says
    pub fn new(config: GameConfig) -> Self {
        let config = GameConfig {
            attacks_enabled: true,
            ..config
        };
        let players = [
            GameState::new(config).with_garbage_seed(config.seed.wrapping_mul(2).wrapping_add(1)),
            GameState::new(config).with_garbage_seed(config.seed.wrapping_mul(3).wrapping_add(7)),
        ];
        let clocks = [Clock::for_game(&players[0]), Clock::for_game(&players[1])];
        Self {
            players,
            clocks,
            result: None,
        }
    }

    pub fn start(&mut self) -> [Outcome; 2] {
        let mut outs = [self.players[0].start(), self.players[1].start()];
        for (clock, out) in self.clocks.iter_mut().zip(&outs) {
            clock.observe(out);
        }
        self.exchange(&mut outs);
        outs
    }

    pub fn player(&self, side: Side) -> &GameState {
        &self.players[side.index()]
    }

    pub fn player_mut(&mut self, side: Side) -> &mut GameState {
        &mut self.players[side.index()]
    }

    pub fn result(&self) -> Option<MatchResult> {
        self.result
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    /// Apply one player's intent; `Restart` restarts the whole match
    pub fn apply(&mut self, side: Side, intent: Intent) -> [Outcome; 2] {
        if intent == Intent::Restart {
            return self.restart();
        }
        let mut outs = [Outcome::noop(), Outcome::noop()];
        if self.is_finished() {
            return outs;
        }
        let out = self.players[side.index()].apply(intent);
        self.clocks[side.index()].observe(&out);
        outs[side.index()] = out;
        self.exchange(&mut outs);
        outs
    }

    /// Advance both boards by the same wall time
    pub fn advance(&mut self, elapsed_ms: u32) -> [Outcome; 2] {
        let mut outs = [Outcome::noop(), Outcome::noop()];
        if self.is_finished() {
            return outs;
        }
        for ((player, clock), out) in self
            .players
            .iter_mut()
            .zip(self.clocks.iter_mut())
            .zip(outs.iter_mut())
        {
            *out = clock.advance(player, elapsed_ms);
        }
        self.exchange(&mut outs);
        outs
    }

    pub fn restart(&mut self) -> [Outcome; 2] {
        let mut outs = [Outcome::noop(), Outcome::noop()];
        for ((player, clock), out) in self
            .players
            .iter_mut()
            .zip(self.clocks.iter_mut())
            .zip(outs.iter_mut())
        {
            *out = player.apply(Intent::Restart);
            *clock = Clock::for_game(player);
        }
        self.result = None;
        outs
    }

    /// Move each side's cleared lines to the opponent, then settle the result
    fn exchange(&mut self, outs: &mut [Outcome; 2]) {
        for side in [Side::One, Side::Two] {
            let lines = self.players[side.index()].take_outgoing_attack();
            if lines > 0 {
                let target = side.opponent().index();
                let received = self.players[target].receive_attack(lines);
                outs[target].merge(received);
            }
        }
        self.result = self.evaluate();
    }

    fn evaluate(&self) -> Option<MatchResult> {
        let [one, two] = &self.players;
        let time_up = [one, two]
            .iter()
            .any(|p| p.game_over_reason() == Some(GameOverReason::TimeUp));
        if time_up {
            return Some(match one.score().cmp(&two.score()) {
                std::cmp::Ordering::Greater => MatchResult::Winner(Side::One),
                std::cmp::Ordering::Less => MatchResult::Winner(Side::Two),
                std::cmp::Ordering::Equal => MatchResult::Draw,
            });
        }
        match (one.is_game_over(), two.is_game_over()) {
            (true, true) => Some(MatchResult::Draw),
            (true, false) => Some(MatchResult::Winner(Side::Two)),
            (false, true) => Some(MatchResult::Winner(Side::One)),
            (false, false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::GameEvent;
    use crate::types::{Cell, GameMode, Mino, MinoTag, PieceKind, BOARD_WIDTH, LOCK_DELAY_MS};

    fn block() -> Cell {
        Cell::Settled(Mino::new(PieceKind::S, MinoTag::Plain))
    }

    #[test]
    fn test_both_sides_share_piece_sequence() {
        let mut game = Versus::new(GameConfig::with_seed(77));
        game.start();
        assert_eq!(
            game.player(Side::One).active().map(|p| p.kind),
            game.player(Side::Two).active().map(|p| p.kind)
        );
        assert_eq!(
            game.player(Side::One).next_piece(),
            game.player(Side::Two).next_piece()
        );
    }

    #[test]
    fn test_cleared_lines_reach_opponent() {
        let mut game = Versus::new(GameConfig::default());
        game.start();
        let one = game.player_mut(Side::One);
        for y in [23, 24] {
            for x in 0..BOARD_WIDTH as i8 {
                one.board_mut().set(x, y, block());
            }
        }

        game.apply(Side::One, Intent::HardLock);
        let outs = game.advance(LOCK_DELAY_MS);

        assert_eq!(game.player(Side::One).lines(), 2);
        assert!(outs[1]
            .events
            .contains(&GameEvent::AttackReceived { lines: 2 }));
        assert_eq!(game.player(Side::Two).pending_garbage(), 2);
        assert_eq!(game.player(Side::One).pending_garbage(), 0);
    }

    #[test]
    fn test_top_out_gives_other_side_the_win() {
        let mut game = Versus::new(GameConfig::default());
        game.start();
        for _ in 0..2000 {
            game.apply(Side::One, Intent::HardLock);
            game.advance(LOCK_DELAY_MS);
            if game.is_finished() {
                break;
            }
        }
        assert_eq!(game.result(), Some(MatchResult::Winner(Side::Two)));
        assert!(game.player(Side::One).is_game_over());
    }

    #[test]
    fn test_time_up_compares_scores() {
        let config = GameConfig {
            mode: GameMode::TimeAttack,
            time_limit_secs: 5,
            ..GameConfig::default()
        };
        let mut game = Versus::new(config);
        game.start();
        game.apply(Side::Two, Intent::SoftDrop);
        game.advance(5_000);
        assert_eq!(game.result(), Some(MatchResult::Winner(Side::Two)));
    }

    #[test]
    fn test_finished_match_ignores_intents() {
        let config = GameConfig {
            mode: GameMode::TimeAttack,
            time_limit_secs: 1,
            ..GameConfig::default()
        };
        let mut game = Versus::new(config);
        game.start();
        game.advance(1_000);
        assert_eq!(game.result(), Some(MatchResult::Draw));
        let outs = game.apply(Side::One, Intent::MoveLeft);
        assert!(!outs[0].applied);

        game.apply(Side::One, Intent::Restart);
        assert!(game.result().is_none());
        assert_eq!(game.player(Side::Two).episode_id(), 1);
    }
}
