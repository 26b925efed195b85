//! Game state module - the piece controller and lock state machine
//!
//! This module ties together all core components: board, pieces, RNG, attack queue
//! and item effects. It owns the active and next piece plus all session counters.
//!
//! # Lifecycle
//!
//! ```text
//! Spawning -> Falling -> (LockPending <-> Falling) -> Locking -> LineClearing -> Spawning
//!     \                                                  \
//!      +-> GameOver (block out, garbage overflow)         +-> GameOver (top out)
//! ```
//!
//! There are no internal timers. The caller fires `tick(true)` whenever the gravity
//! interval elapses and `tick(false)` once per second. Lock delay and the line-clear
//! window are expressed by re-arming the gravity interval: every [`Outcome`] whose
//! `rearm_ms` is set tells the scheduler when the next gravity tick is due.

use serde::Serialize;

use crate::board::Board;
use crate::config::GameConfig;
use crate::events::{GameEvent, GameOverReason, Outcome};
use crate::garbage::{AttackQueue, DrainOutcome};
use crate::items::{drop_weight, explode, ItemDispenser};
use crate::kicks::try_rotate;
use crate::pieces::{spec, ItemEffect, Piece};
use crate::rng::{PieceQueue, SimpleRng};
use crate::scoring::{gravity_after_clear, gravity_step_score, line_clear_score, next_gravity_interval};
use crate::snapshot::GameSnapshot;
use crate::types::*;

/// Where the controller is in the lock state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Spawning,
    Falling,
    /// Resting on something; the lock delay is running
    LockPending,
    Locking,
    /// Rows cleared or explosion resolved; the next spawn waits for the window
    LineClearing,
    GameOver,
}

/// Complete session state for one board
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Board,
    active: Option<Piece>,
    next: PieceKind,
    queue: PieceQueue,
    items: ItemDispenser,
    incoming: AttackQueue,
    garbage_rng: SimpleRng,
    /// Lines cleared since the opponent last collected them
    outgoing: u8,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    score: u32,
    lines: u32,
    elapsed_secs: u32,
    gravity_ms: u32,
    /// Interval the gravity tick is currently armed with
    armed_ms: u32,
    phase: Phase,
    started: bool,
    game_over_reason: Option<GameOverReason>,
}

impl GameState {
    /// Create a new session; nothing spawns until [`start`](Self::start)
    pub fn new(config: GameConfig) -> Self {
        let mut queue = PieceQueue::new(config.seed, config.difficulty);
        let next = queue.draw();

        Self {
            config,
            board: Board::new(),
            active: None,
            next,
            queue,
            items: ItemDispenser::new(),
            incoming: AttackQueue::new(),
            garbage_rng: SimpleRng::new(config.seed.rotate_left(16) ^ 0x5bd1_e995),
            outgoing: 0,
            episode_id: 0,
            score: 0,
            lines: 0,
            elapsed_secs: 0,
            gravity_ms: BASE_GRAVITY_MS,
            armed_ms: BASE_GRAVITY_MS,
            phase: Phase::Spawning,
            started: false,
            game_over_reason: None,
        }
    }

    /// Reseed the garbage hole generator (two boards sharing a piece seed should
    /// still get different holes)
    pub fn with_garbage_seed(mut self, seed: u32) -> Self {
        self.garbage_rng = SimpleRng::new(seed);
        self
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) -> Outcome {
        let mut out = Outcome::noop();
        if self.started {
            return out;
        }
        self.started = true;
        self.spawn(&mut out);
        out
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn gravity_ms(&self) -> u32 {
        self.gravity_ms
    }

    /// Interval until the next gravity tick, as last armed
    pub fn tick_interval_ms(&self) -> u32 {
        self.armed_ms
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn pending_garbage(&self) -> u8 {
        self.incoming.pending()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for scenario setup
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn ghost_y(&self) -> Option<i8> {
        self.active.map(|piece| self.board.ghost_y(&piece))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(self)
    }

    /// Apply an intent between ticks
    pub fn apply(&mut self, intent: Intent) -> Outcome {
        let mut out = Outcome::noop();
        match intent {
            Intent::Restart => {
                self.restart(&mut out);
                return out;
            }
            _ if !self.controllable() => return out,
            Intent::MoveLeft => self.shift(-1, &mut out),
            Intent::MoveRight => self.shift(1, &mut out),
            Intent::Rotate => self.rotate(&mut out),
            Intent::SoftDrop => {
                if self.phase == Phase::Falling && self.step_down(&mut out) {
                    self.refresh_contact(&mut out);
                }
            }
            Intent::HardLock => self.hard_lock(&mut out),
        }
        out
    }

    /// Advance the session by one gravity tick (`true`) or one clock tick (`false`)
    pub fn tick(&mut self, gravity_step: bool) -> Outcome {
        let mut out = Outcome::noop();
        if !self.started || self.is_game_over() {
            return out;
        }

        if !gravity_step {
            self.elapsed_secs += 1;
            out.applied = true;
            if let Some(limit) = self.config.time_limit() {
                if self.elapsed_secs >= limit {
                    self.game_over(GameOverReason::TimeUp, &mut out);
                }
            }
            return out;
        }

        match self.phase {
            Phase::Spawning | Phase::LineClearing => self.spawn(&mut out),
            Phase::LockPending => self.expire_lock_delay(&mut out),
            Phase::Falling => self.fall(&mut out),
            Phase::Locking | Phase::GameOver => {}
        }
        out
    }

    /// Hand-off entry point: queue garbage owed to this board
    pub fn receive_attack(&mut self, lines: u8) -> Outcome {
        let mut out = Outcome::noop();
        if self.is_game_over() || lines == 0 {
            return out;
        }
        let accepted = self.incoming.queue_attack(lines, &mut self.garbage_rng);
        if accepted > 0 {
            out.applied = true;
            out.events.push(GameEvent::AttackReceived { lines: accepted });
        }
        out
    }

    /// Collect the lines this board has cleared since the last call
    pub fn take_outgoing_attack(&mut self) -> u8 {
        std::mem::take(&mut self.outgoing)
    }

    fn controllable(&self) -> bool {
        self.active.is_some() && matches!(self.phase, Phase::Falling | Phase::LockPending)
    }

    fn arm(&mut self, ms: u32, out: &mut Outcome) {
        self.armed_ms = ms;
        out.rearm_ms = Some(ms);
    }

    fn draw_next(&mut self) -> PieceKind {
        if self.config.items_enabled() {
            if let Some(item) = self.items.take_due(self.queue.rng_mut()) {
                return item;
            }
        }
        self.queue.draw()
    }

    fn spawn(&mut self, out: &mut Outcome) {
        self.phase = Phase::Spawning;
        out.applied = true;

        match self.incoming.drain(&mut self.board) {
            DrainOutcome::Empty => {}
            DrainOutcome::Inserted(lines) => {
                out.events.push(GameEvent::GarbageInserted { lines });
            }
            DrainOutcome::Overflow(_) => {
                self.game_over(GameOverReason::GarbageOverflow, out);
                return;
            }
        }

        let kind = self.next;
        self.next = self.draw_next();
        let piece = Piece::spawn(kind);
        if self.board.collides(&piece, piece.x, piece.y) {
            self.game_over(GameOverReason::BlockOut, out);
            return;
        }

        self.board.place(&piece);
        self.active = Some(piece);
        self.phase = Phase::Falling;
        out.events.push(GameEvent::PieceSpawned { kind });
        if self.board.bottom_contact(&piece) {
            self.start_lock_delay(out);
        } else {
            self.arm(self.gravity_ms, out);
        }
    }

    fn start_lock_delay(&mut self, out: &mut Outcome) {
        self.phase = Phase::LockPending;
        self.arm(self.config.lock_delay_ms, out);
    }

    /// Re-derive contact after a position change; starts or cancels the lock delay
    fn refresh_contact(&mut self, out: &mut Outcome) {
        let Some(piece) = self.active else {
            return;
        };
        let contact = self.board.bottom_contact(&piece);
        match (self.phase, contact) {
            (Phase::Falling, true) => self.start_lock_delay(out),
            (Phase::LockPending, false) => {
                self.phase = Phase::Falling;
                self.arm(self.gravity_ms, out);
            }
            _ => {}
        }
    }

    /// Replace the active piece on the board
    fn reposition(&mut self, from: Piece, to: Piece) {
        self.board.erase(&from);
        self.board.place(&to);
        self.active = Some(to);
    }

    /// Move the piece one row down, scored by the current speed.
    /// Starts the lock delay instead when the piece already rests.
    fn step_down(&mut self, out: &mut Outcome) -> bool {
        let Some(piece) = self.active else {
            return false;
        };
        if self.board.bottom_contact(&piece) {
            self.start_lock_delay(out);
            out.applied = true;
            return false;
        }

        self.reposition(piece, piece.at(piece.x, piece.y + 1));
        self.score += gravity_step_score(self.gravity_ms);
        out.applied = true;
        true
    }

    /// One gravity step: the only place the fall speed decays
    fn fall(&mut self, out: &mut Outcome) {
        if !self.step_down(out) {
            return;
        }
        self.gravity_ms = next_gravity_interval(self.gravity_ms);
        self.arm(self.gravity_ms, out);
        self.refresh_contact(out);
    }

    fn shift(&mut self, dx: i8, out: &mut Outcome) {
        let Some(piece) = self.active else {
            return;
        };
        let x = piece.x + dx;
        let max_x = BOARD_WIDTH as i8 - piece.shape().width as i8;
        if x < 0 || x > max_x || self.board.collides(&piece, x, piece.y) {
            return;
        }

        self.reposition(piece, piece.at(x, piece.y));
        out.applied = true;
        self.refresh_contact(out);
    }

    fn rotate(&mut self, out: &mut Outcome) {
        let Some(piece) = self.active else {
            return;
        };
        let board = &self.board;
        let Some(rotated) = try_rotate(piece, |p| !board.collides(p, p.x, p.y)) else {
            return;
        };

        self.reposition(piece, rotated);
        out.applied = true;
        self.refresh_contact(out);
    }

    fn hard_lock(&mut self, out: &mut Outcome) {
        let Some(piece) = self.active else {
            return;
        };
        let ghost_y = self.board.ghost_y(&piece);
        if ghost_y != piece.y {
            self.reposition(piece, piece.at(piece.x, ghost_y));
            out.applied = true;
        }
        // A running countdown is never restarted.
        if self.phase != Phase::LockPending {
            self.start_lock_delay(out);
            out.applied = true;
        }
    }

    fn expire_lock_delay(&mut self, out: &mut Outcome) {
        match self.active {
            Some(piece) if self.board.bottom_contact(&piece) => self.resolve_lock(out),
            Some(_) => {
                self.phase = Phase::Falling;
                self.fall(out);
            }
            None => self.spawn(out),
        }
    }

    fn resolve_lock(&mut self, out: &mut Outcome) {
        let Some(mut piece) = self.active.take() else {
            return;
        };
        self.phase = Phase::Locking;
        out.applied = true;
        let effect = spec(piece.kind).effect;

        if self.config.items_enabled() && effect == Some(ItemEffect::Weight) {
            let (landed, columns) = drop_weight(&mut self.board, &piece);
            piece = landed;
            out.events.push(GameEvent::weight_dropped(&columns));
        }

        if effect == Some(ItemEffect::Explosive) {
            let region = explode(&mut self.board, &piece);
            self.board.fix_falling();
            out.events.push(GameEvent::BlockLocked {
                kind: piece.kind,
                x: piece.x,
                y: piece.y,
            });
            if let Some(region) = region {
                out.events.push(GameEvent::Exploded { region });
            }
            self.open_clear_window(out);
            return;
        }

        self.board.fix_falling();
        out.events.push(GameEvent::BlockLocked {
            kind: piece.kind,
            x: piece.x,
            y: piece.y,
        });

        let rows = self.board.full_rows();
        if !rows.is_empty() {
            self.board.clear_rows(&rows);
            let count = rows.len();
            self.lines += count as u32;
            self.score += line_clear_score(count);
            self.gravity_ms = gravity_after_clear(self.gravity_ms, self.config.difficulty);
            self.items.record_lines(count as u32);
            if self.config.attacks_enabled {
                self.outgoing = self.outgoing.saturating_add(count as u8);
            }
            out.events.push(GameEvent::LinesCleared {
                rows: rows.to_vec(),
                was_attack: self.config.attacks_enabled,
            });
        }

        if self.board.top_row_occupied() {
            self.game_over(GameOverReason::TopOut, out);
            return;
        }

        if rows.is_empty() {
            self.spawn(out);
        } else {
            self.open_clear_window(out);
        }
    }

    /// Defer the next spawn by the clear window on top of the gravity interval
    fn open_clear_window(&mut self, out: &mut Outcome) {
        self.phase = Phase::LineClearing;
        self.arm(CLEAR_WINDOW_MS + self.gravity_ms, out);
    }

    fn game_over(&mut self, reason: GameOverReason, out: &mut Outcome) {
        if let Some(piece) = self.active.take() {
            self.board.erase(&piece);
        }
        self.phase = Phase::GameOver;
        self.game_over_reason = Some(reason);
        out.applied = true;
        out.events.push(GameEvent::GameOver {
            final_score: self.score,
            lines: self.lines,
            elapsed_secs: self.elapsed_secs,
            reason,
        });
    }

    fn restart(&mut self, out: &mut Outcome) {
        let config = GameConfig {
            seed: self.queue.seed(),
            ..self.config
        };
        let garbage_seed = self.garbage_rng.state();
        let next_episode = self.episode_id.wrapping_add(1);
        *self = Self::new(config).with_garbage_seed(garbage_seed);
        self.episode_id = next_episode;
        out.merge(self.start());
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> Cell {
        Cell::Settled(Mino::new(PieceKind::Z, MinoTag::Plain))
    }

    fn started(config: GameConfig) -> GameState {
        let mut game = GameState::new(config);
        game.start();
        game
    }

    /// Swap the active piece for `piece`, as if it had just spawned there
    fn force_active(game: &mut GameState, piece: Piece) {
        if let Some(old) = game.active.take() {
            game.board.erase(&old);
        }
        game.board.place(&piece);
        game.active = Some(piece);
        game.phase = Phase::Falling;
    }

    #[test]
    fn test_new_game_state() {
        let game = GameState::new(GameConfig::with_seed(12345));
        assert!(!game.started());
        assert_eq!(game.phase(), Phase::Spawning);
        assert_eq!(game.score(), 0);
        assert_eq!(game.gravity_ms(), BASE_GRAVITY_MS);
        assert!(game.active().is_none());
    }

    #[test]
    fn test_start_spawns_at_anchor() {
        let mut game = GameState::new(GameConfig::with_seed(7));
        let expected = game.next_piece();
        let out = game.start();

        let active = game.active().unwrap();
        assert_eq!(active.kind, expected);
        assert_eq!((active.x, active.y), (SPAWN_X, SPAWN_Y));
        assert_eq!(game.phase(), Phase::Falling);
        assert_eq!(out.rearm_ms, Some(BASE_GRAVITY_MS));
        assert!(out
            .events
            .contains(&GameEvent::PieceSpawned { kind: expected }));
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut game = started(GameConfig::default());
        assert!(!game.start().applied);
    }

    #[test]
    fn test_gravity_tick_moves_down_and_scores() {
        let mut game = started(GameConfig::default());
        let y = game.active().unwrap().y;
        let out = game.tick(true);
        assert!(out.applied);
        assert_eq!(game.active().unwrap().y, y + 1);
        assert_eq!(game.score(), 1);
        assert_eq!(game.gravity_ms(), BASE_GRAVITY_MS - GRAVITY_STEP_DECAY_MS);
        assert_eq!(out.rearm_ms, Some(game.gravity_ms()));
    }

    #[test]
    fn test_clock_tick_counts_seconds() {
        let mut game = started(GameConfig::default());
        let y = game.active().unwrap().y;
        game.tick(false);
        game.tick(false);
        assert_eq!(game.elapsed_secs(), 2);
        assert_eq!(game.active().unwrap().y, y);
    }

    #[test]
    fn test_time_attack_ends_at_limit() {
        let config = GameConfig {
            mode: GameMode::TimeAttack,
            time_limit_secs: 3,
            ..GameConfig::default()
        };
        let mut game = started(config);
        assert!(!game.tick(false).is_game_over());
        assert!(!game.tick(false).is_game_over());
        let out = game.tick(false);
        assert!(out.is_game_over());
        assert_eq!(game.game_over_reason(), Some(GameOverReason::TimeUp));
        assert!(!game.board().has_overlay());
    }

    #[test]
    fn test_move_respects_walls() {
        let mut game = started(GameConfig::default());
        force_active(&mut game, Piece::new(PieceKind::O, Rotation::North, 0, 10));
        assert!(!game.apply(Intent::MoveLeft).applied);
        assert!(game.apply(Intent::MoveRight).applied);
        assert_eq!(game.active().unwrap().x, 1);

        force_active(&mut game, Piece::new(PieceKind::O, Rotation::North, 8, 10));
        assert!(!game.apply(Intent::MoveRight).applied);
    }

    #[test]
    fn test_move_blocked_by_settled() {
        let mut game = started(GameConfig::default());
        force_active(&mut game, Piece::new(PieceKind::O, Rotation::North, 4, 10));
        game.board_mut().set(6, 11, block());
        let before = game.board().clone();
        assert!(!game.apply(Intent::MoveRight).applied);
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn test_contact_starts_lock_delay() {
        let mut game = started(GameConfig::default());
        force_active(&mut game, Piece::new(PieceKind::O, Rotation::North, 4, 22));
        let out = game.tick(true);
        assert_eq!(game.active().unwrap().y, 23);
        assert_eq!(game.phase(), Phase::LockPending);
        assert_eq!(out.rearm_ms, Some(LOCK_DELAY_MS));
    }

    #[test]
    fn test_move_off_ledge_cancels_lock_delay() {
        let mut game = started(GameConfig::default());
        game.board_mut().set(4, 12, block());
        game.board_mut().set(5, 12, block());
        force_active(&mut game, Piece::new(PieceKind::O, Rotation::North, 4, 10));
        game.tick(true);
        assert_eq!(game.phase(), Phase::LockPending);

        game.apply(Intent::MoveLeft);
        assert_eq!(game.phase(), Phase::LockPending);
        let out = game.apply(Intent::MoveLeft);
        assert_eq!(game.phase(), Phase::Falling);
        assert_eq!(out.rearm_ms, Some(game.gravity_ms()));
    }

    #[test]
    fn test_lock_expiry_resumes_fall_without_contact() {
        let mut game = started(GameConfig::default());
        force_active(&mut game, Piece::new(PieceKind::O, Rotation::North, 4, 10));
        game.phase = Phase::LockPending;
        game.tick(true);
        assert_eq!(game.phase(), Phase::Falling);
        assert_eq!(game.active().unwrap().y, 11);
    }

    #[test]
    fn test_hard_lock_snaps_then_waits() {
        let mut game = started(GameConfig::default());
        force_active(&mut game, Piece::new(PieceKind::T, Rotation::North, 3, 6));
        let out = game.apply(Intent::HardLock);
        assert_eq!(game.active().unwrap().y, 23);
        assert_eq!(game.phase(), Phase::LockPending);
        assert_eq!(out.rearm_ms, Some(LOCK_DELAY_MS));
        assert!(game.board().get(4, 24).map_or(false, |c| !c.is_filled()));

        let out = game.tick(true);
        assert!(out.events.iter().any(|e| matches!(
            e,
            GameEvent::BlockLocked {
                kind: PieceKind::T,
                ..
            }
        )));
        assert_eq!(
            game.board().settled(4, 24),
            Some(Cell::Settled(Mino::new(PieceKind::T, MinoTag::Plain)))
        );
        assert_eq!(game.phase(), Phase::Falling);
    }

    #[test]
    fn test_soft_drop_while_resting_is_noop() {
        let mut game = started(GameConfig::default());
        force_active(&mut game, Piece::new(PieceKind::O, Rotation::North, 4, 23));
        game.phase = Phase::LockPending;
        let out = game.apply(Intent::SoftDrop);
        assert!(!out.applied);
        assert_eq!(game.phase(), Phase::LockPending);
    }

    #[test]
    fn test_soft_drop_scores_like_gravity() {
        let mut game = started(GameConfig::default());
        let y = game.active().unwrap().y;
        for step in 1..=10 {
            let out = game.apply(Intent::SoftDrop);
            assert!(out.applied);
            assert_eq!(out.rearm_ms, None);
            assert_eq!(game.active().unwrap().y, y + step);
        }
        assert_eq!(game.score(), 10);
        assert_eq!(game.gravity_ms(), BASE_GRAVITY_MS);
    }

    #[test]
    fn test_soft_drop_onto_stack_starts_lock_delay() {
        let mut game = started(GameConfig::default());
        force_active(&mut game, Piece::new(PieceKind::O, Rotation::North, 4, 22));
        let out = game.apply(Intent::SoftDrop);
        assert_eq!(game.active().unwrap().y, 23);
        assert_eq!(game.phase(), Phase::LockPending);
        assert_eq!(out.rearm_ms, Some(LOCK_DELAY_MS));
        assert_eq!(game.gravity_ms(), BASE_GRAVITY_MS);
    }

    #[test]
    fn test_repeated_hard_lock_keeps_countdown() {
        let mut game = started(GameConfig::default());
        force_active(&mut game, Piece::new(PieceKind::T, Rotation::North, 3, 6));
        assert_eq!(game.apply(Intent::HardLock).rearm_ms, Some(LOCK_DELAY_MS));

        let again = game.apply(Intent::HardLock);
        assert!(!again.applied);
        assert_eq!(again.rearm_ms, None);
        assert_eq!(game.phase(), Phase::LockPending);
    }

    #[test]
    fn test_rotation_commits_fourth_kick() {
        let mut game = started(GameConfig::default());
        game.board_mut().set(5, 10, block());
        game.board_mut().set(4, 9, block());
        game.board_mut().set(6, 12, block());
        force_active(&mut game, Piece::new(PieceKind::J, Rotation::North, 4, 10));

        assert!(game.apply(Intent::Rotate).applied);

        let active = game.active().unwrap();
        assert_eq!(active.rotation, Rotation::East);
        assert_eq!((active.x, active.y), (4, 12));
    }

    #[test]
    fn test_rotation_failure_reverts() {
        let mut game = started(GameConfig::default());
        for y in 0..BOARD_HEIGHT as i8 {
            for x in [2, 7] {
                game.board_mut().set(x, y, block());
            }
        }
        for x in 3..7 {
            game.board_mut().set(x, 11, block());
            game.board_mut().set(x, 8, block());
        }
        let piece = Piece::new(PieceKind::I, Rotation::North, 3, 10);
        force_active(&mut game, piece);
        let before = game.board().clone();

        assert!(!game.apply(Intent::Rotate).applied);
        assert_eq!(game.active(), Some(piece));
        assert_eq!(game.board(), &before);
    }

    #[test]
    fn test_spawn_overlap_is_block_out() {
        let mut game = GameState::new(GameConfig::default());
        for y in 4..=5 {
            for x in 3..=6 {
                game.board_mut().set(x, y, block());
            }
        }
        let out = game.start();
        assert!(out.is_game_over());
        assert_eq!(game.game_over_reason(), Some(GameOverReason::BlockOut));
        assert!(game.active().is_none());
        assert!(!game.apply(Intent::MoveLeft).applied);
        assert!(!game.tick(true).applied);
    }

    #[test]
    fn test_single_row_clear() {
        let mut game = started(GameConfig::default());
        for x in 0..BOARD_WIDTH as i8 {
            game.board_mut().set(x, 24, block());
        }
        game.board_mut().set(2, 23, block());
        force_active(&mut game, Piece::new(PieceKind::O, Rotation::North, 7, 10));

        game.apply(Intent::HardLock);
        let out = game.tick(true);

        assert_eq!(out.lines_cleared(), 1);
        assert!(out.events.contains(&GameEvent::LinesCleared {
            rows: vec![24],
            was_attack: false,
        }));
        assert_eq!(game.lines(), 1);
        assert_eq!(game.score(), LINE_CLEAR_SCORE);
        assert_eq!(game.phase(), Phase::LineClearing);
        assert_eq!(out.rearm_ms, Some(CLEAR_WINDOW_MS + game.gravity_ms()));
        assert_eq!(game.board().settled(2, 24), Some(block()));
        assert_eq!(game.board().settled(0, 24), Some(Cell::Empty));
        assert!(game.board().full_rows().is_empty());

        let out = game.tick(true);
        assert!(out
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::PieceSpawned { .. })));
        assert_eq!(game.phase(), Phase::Falling);
    }

    #[test]
    fn test_clear_feeds_outgoing_attack() {
        let config = GameConfig {
            attacks_enabled: true,
            ..GameConfig::default()
        };
        let mut game = started(config);
        for y in [23, 24] {
            for x in 0..8 {
                game.board_mut().set(x, y, block());
            }
        }
        force_active(&mut game, Piece::new(PieceKind::O, Rotation::North, 8, 10));
        game.apply(Intent::HardLock);
        game.tick(true);

        assert_eq!(game.take_outgoing_attack(), 2);
        assert_eq!(game.take_outgoing_attack(), 0);
    }

    #[test]
    fn test_top_out_after_lock() {
        let mut game = started(GameConfig::default());
        for y in 8..BOARD_HEIGHT as i8 {
            game.board_mut().set(0, y, block());
        }
        force_active(&mut game, Piece::new(PieceKind::I, Rotation::East, 0, 4));
        game.phase = Phase::LockPending;

        let out = game.tick(true);

        assert!(out.is_game_over());
        assert_eq!(game.game_over_reason(), Some(GameOverReason::TopOut));
    }

    #[test]
    fn test_explosive_clears_five_by_five() {
        let config = GameConfig {
            mode: GameMode::Item,
            ..GameConfig::default()
        };
        let mut game = started(config);
        for y in 14..BOARD_HEIGHT as i8 {
            for x in 0..9 {
                game.board_mut().set(x, y, block());
            }
        }
        let piece = Piece::new(PieceKind::Explosive, Rotation::North, 4, 12);
        force_active(&mut game, piece);
        let before = game.board().clone();

        game.apply(Intent::HardLock);
        let out = game.tick(true);

        let region = out
            .events
            .iter()
            .find_map(|e| match e {
                GameEvent::Exploded { region } => Some(*region),
                _ => None,
            })
            .unwrap();
        assert_eq!((region.x0, region.y0, region.x1, region.y1), (2, 10, 6, 14));
        for y in 0..BOARD_HEIGHT as i8 {
            for x in 0..BOARD_WIDTH as i8 {
                if region.contains(x, y) {
                    assert_eq!(game.board().get(x, y), Some(Cell::Empty), "({x}, {y})");
                } else {
                    assert_eq!(game.board().settled(x, y), before.settled(x, y), "({x}, {y})");
                }
            }
        }
        assert_eq!(game.phase(), Phase::LineClearing);
        assert!(game.active().is_none());
    }

    #[test]
    fn test_weight_drops_in_item_mode() {
        let config = GameConfig {
            mode: GameMode::Item,
            ..GameConfig::default()
        };
        let mut game = started(config);
        for x in 0..BOARD_WIDTH as i8 {
            game.board_mut().set(x, 20, block());
        }
        force_active(&mut game, Piece::new(PieceKind::Weight, Rotation::North, 3, 18));
        game.phase = Phase::LockPending;

        let out = game.tick(true);

        assert!(out.events.contains(&GameEvent::WeightDropped {
            columns: vec![3, 4, 5, 6]
        }));
        assert_eq!(
            game.board().settled(3, 24),
            Some(Cell::Settled(Mino::new(PieceKind::Weight, MinoTag::Plain)))
        );
        assert_eq!(game.board().settled(3, 20), Some(Cell::Empty));
        assert_eq!(game.board().settled(2, 20), Some(block()));
    }

    #[test]
    fn test_single_row_marker_clears_partial_row() {
        let config = GameConfig {
            mode: GameMode::Item,
            ..GameConfig::default()
        };
        let mut game = started(config);
        // The piece's bottom row fills 3..=5; column 9 stays open.
        for x in 0..BOARD_WIDTH as i8 {
            if !(3..=5).contains(&x) && x != 9 {
                game.board_mut().set(x, 24, block());
            }
        }
        force_active(&mut game, Piece::new(PieceKind::SingleRow, Rotation::North, 3, 10));
        game.apply(Intent::HardLock);
        let out = game.tick(true);

        assert_eq!(game.active(), None);
        assert!(out.events.contains(&GameEvent::LinesCleared {
            rows: vec![24],
            was_attack: false,
        }));
    }

    #[test]
    fn test_received_garbage_drains_on_spawn() {
        let mut game = started(GameConfig::default());
        let out = game.receive_attack(3);
        assert!(out.events.contains(&GameEvent::AttackReceived { lines: 3 }));
        assert_eq!(game.pending_garbage(), 3);

        game.apply(Intent::HardLock);
        let out = game.tick(true);

        assert!(out.events.contains(&GameEvent::GarbageInserted { lines: 3 }));
        assert_eq!(game.pending_garbage(), 0);
        let holes = (0..BOARD_WIDTH as i8)
            .filter(|&x| game.board().settled(x, 24) == Some(Cell::GarbageHole))
            .count();
        assert_eq!(holes, 1);
    }

    #[test]
    fn test_garbage_overflow_ends_game() {
        let mut game = started(GameConfig::default());
        game.board_mut().set(0, 9, block());
        game.receive_attack(5);
        let before_cell = game.board().settled(0, 9);

        game.apply(Intent::HardLock);
        let out = game.tick(true);

        assert!(out.is_game_over());
        assert_eq!(game.game_over_reason(), Some(GameOverReason::GarbageOverflow));
        assert_eq!(game.board().settled(0, 9), before_cell);
    }

    #[test]
    fn test_restart_increments_episode_id() {
        let mut game = started(GameConfig::default());
        game.tick(true);
        let out = game.apply(Intent::Restart);
        assert!(out.applied);
        assert_eq!(game.episode_id(), 1);
        assert_eq!(game.score(), 0);
        assert!(game.started());
        assert_eq!(game.phase(), Phase::Falling);
    }

    #[test]
    fn test_restart_after_game_over() {
        let config = GameConfig {
            mode: GameMode::TimeAttack,
            time_limit_secs: 1,
            ..GameConfig::default()
        };
        let mut game = started(config);
        game.tick(false);
        assert!(game.is_game_over());
        game.apply(Intent::Restart);
        assert!(!game.is_game_over());
        assert_eq!(game.elapsed_secs(), 0);
    }
}
