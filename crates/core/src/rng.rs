//! RNG module - deterministic piece generation
//!
//! A small LCG drives everything random in a session, so the same seed always
//! produces the same game.
//!
//! Piece selection depends on difficulty:
//! - **Normal**: batches of four shuffled 7-bags
//! - **Easy**: weighted draw favouring the long piece (6/36 vs 5/36)
//! - **Hard**: weighted draw against the long piece (5/41 vs 6/41)
//!
//! Pieces are held in a lookahead deque that is topped up whenever it runs low.

use std::collections::VecDeque;

use crate::types::{Difficulty, PieceKind};

/// Lookahead length below which the queue is refilled
pub const LOOKAHEAD_LOW_WATER: usize = 3;

/// 7-bags generated per refill in bag mode
pub const BAGS_PER_BATCH: usize = 4;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        // High bits of an LCG are far better distributed than the low ones.
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Relative weight of the long piece and of every other standard piece
fn weights(difficulty: Difficulty) -> Option<(u32, u32)> {
    match difficulty {
        Difficulty::Easy => Some((6, 5)),
        Difficulty::Normal => None,
        Difficulty::Hard => Some((5, 6)),
    }
}

/// Lookahead piece generator
#[derive(Debug, Clone)]
pub struct PieceQueue {
    lookahead: VecDeque<PieceKind>,
    rng: SimpleRng,
    difficulty: Difficulty,
}

impl PieceQueue {
    /// Create a new piece queue with the given seed
    pub fn new(seed: u32, difficulty: Difficulty) -> Self {
        let mut queue = Self {
            lookahead: VecDeque::with_capacity(PieceKind::STANDARD.len() * BAGS_PER_BATCH),
            rng: SimpleRng::new(seed),
            difficulty,
        };
        queue.refill();
        queue
    }

    fn refill(&mut self) {
        match weights(self.difficulty) {
            None => {
                for _ in 0..BAGS_PER_BATCH {
                    let mut bag = PieceKind::STANDARD;
                    self.rng.shuffle(&mut bag);
                    self.lookahead.extend(bag);
                }
            }
            Some((long, other)) => {
                while self.lookahead.len() < LOOKAHEAD_LOW_WATER * 2 {
                    let kind = self.weighted(long, other);
                    self.lookahead.push_back(kind);
                }
            }
        }
    }

    fn weighted(&mut self, long: u32, other: u32) -> PieceKind {
        let total = long + other * (PieceKind::STANDARD.len() as u32 - 1);
        let mut roll = self.rng.next_range(total);
        for kind in PieceKind::STANDARD {
            let weight = if kind == PieceKind::I { long } else { other };
            if roll < weight {
                return kind;
            }
            roll -= weight;
        }
        PieceKind::L
    }

    /// Peek at the next piece without removing it
    pub fn peek(&self) -> Option<PieceKind> {
        self.lookahead.front().copied()
    }

    /// Draw the next piece from the queue
    pub fn draw(&mut self) -> PieceKind {
        if self.lookahead.is_empty() {
            self.refill();
        }
        let piece = self.lookahead.pop_front().unwrap_or(PieceKind::I);
        if self.lookahead.len() < LOOKAHEAD_LOW_WATER {
            self.refill();
        }
        piece
    }

    /// Pieces currently buffered
    pub fn len(&self) -> usize {
        self.lookahead.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookahead.is_empty()
    }

    /// Get the current RNG state (for restarting game with a fresh sequence)
    pub fn seed(&self) -> u32 {
        self.rng.state
    }

    /// Random source shared with other per-session draws (item picks)
    pub fn rng_mut(&mut self) -> &mut SimpleRng {
        &mut self.rng
    }
}

impl Default for PieceQueue {
    fn default() -> Self {
        Self::new(1, Difficulty::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = SimpleRng::new(12345);
        let mut rng2 = SimpleRng::new(12345);
        for _ in 0..100 {
            assert_eq!(rng1.next_u32(), rng2.next_u32());
        }
    }

    #[test]
    fn test_rng_zero_seed() {
        assert_eq!(SimpleRng::new(0).state(), 1);
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = SimpleRng::new(99);
        for _ in 0..1000 {
            assert!(rng.next_range(7) < 7);
        }
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_normal_batch_is_four_bags() {
        let queue = PieceQueue::new(1, Difficulty::Normal);
        assert_eq!(queue.len(), 28);
        let first: Vec<PieceKind> = queue.lookahead.iter().take(7).copied().collect();
        for kind in PieceKind::STANDARD {
            assert!(first.contains(&kind), "Missing piece: {:?}", kind);
        }
    }

    #[test]
    fn test_normal_counts_are_bounded() {
        let mut queue = PieceQueue::new(42, Difficulty::Normal);
        let mut counts = [0usize; 7];
        for _ in 0..28 {
            let kind = queue.draw();
            let idx = PieceKind::STANDARD.iter().position(|k| *k == kind).unwrap();
            counts[idx] += 1;
        }
        assert!(counts.iter().all(|&c| c == 4));
    }

    #[test]
    fn test_lookahead_never_below_low_water() {
        for difficulty in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            let mut queue = PieceQueue::new(5, difficulty);
            for _ in 0..200 {
                queue.draw();
                assert!(queue.len() >= LOOKAHEAD_LOW_WATER);
            }
        }
    }

    #[test]
    fn test_peek_matches_draw() {
        let mut queue = PieceQueue::new(1, Difficulty::Hard);
        for _ in 0..50 {
            let peeked = queue.peek();
            assert_eq!(peeked, Some(queue.draw()));
        }
    }

    #[test]
    fn test_weighted_only_standard_kinds() {
        let mut queue = PieceQueue::new(11, Difficulty::Easy);
        for _ in 0..500 {
            assert!(!queue.draw().is_item());
        }
    }

    #[test]
    fn test_easy_favours_long_piece() {
        let mut easy = PieceQueue::new(2024, Difficulty::Easy);
        let mut hard = PieceQueue::new(2024, Difficulty::Hard);
        let n = 20_000;
        let easy_i = (0..n).filter(|_| easy.draw() == PieceKind::I).count();
        let hard_i = (0..n).filter(|_| hard.draw() == PieceKind::I).count();
        assert!(easy_i > hard_i, "easy {easy_i} vs hard {hard_i}");
    }
}
