//! Fixed-step scheduler for one session
//!
//! Turns elapsed wall time into the two tick streams the controller expects: gravity
//! ticks at the currently armed interval and clock ticks every second. Both go
//! through the same `&mut GameState`, in time order, so they can never interleave.

use crate::events::Outcome;
use crate::game_state::GameState;
use crate::types::CLOCK_TICK_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    interval_ms: u32,
    gravity_acc_ms: u32,
    clock_acc_ms: u32,
}

impl Clock {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            gravity_acc_ms: 0,
            clock_acc_ms: 0,
        }
    }

    /// A clock armed with the game's current gravity interval
    pub fn for_game(game: &GameState) -> Self {
        Self::new(game.tick_interval_ms())
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Milliseconds until the next gravity tick
    pub fn until_gravity_ms(&self) -> u32 {
        self.interval_ms.saturating_sub(self.gravity_acc_ms)
    }

    /// Restart the gravity countdown with a new interval
    pub fn rearm(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
        self.gravity_acc_ms = 0;
    }

    /// Pick up a re-arm request from an intent or tick outcome
    pub fn observe(&mut self, outcome: &Outcome) {
        if let Some(ms) = outcome.rearm_ms {
            self.rearm(ms);
        }
    }

    /// Advance by `elapsed_ms`, firing every tick that falls due
    pub fn advance(&mut self, game: &mut GameState, elapsed_ms: u32) -> Outcome {
        let mut out = Outcome::noop();
        let mut remaining = elapsed_ms;

        while !game.is_game_over() {
            let to_gravity = self.until_gravity_ms();
            let to_clock = CLOCK_TICK_MS - self.clock_acc_ms;
            let step = to_gravity.min(to_clock);
            if step > remaining {
                self.gravity_acc_ms += remaining;
                self.clock_acc_ms += remaining;
                break;
            }
            remaining -= step;
            self.gravity_acc_ms += step;
            self.clock_acc_ms += step;

            if self.clock_acc_ms >= CLOCK_TICK_MS {
                self.clock_acc_ms = 0;
                out.merge(game.tick(false));
                if game.is_game_over() {
                    break;
                }
            }
            if self.gravity_acc_ms >= self.interval_ms {
                self.gravity_acc_ms = 0;
                let tick = game.tick(true);
                self.observe(&tick);
                out.merge(tick);
            }
        }
        out
    }
}
