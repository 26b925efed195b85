//! Events and outcomes reported to the caller
//!
//! The core never animates or logs. Everything a renderer or match runner might want
//! to react to comes back as a [`GameEvent`] inside an [`Outcome`].

use serde::Serialize;

use crate::board::Region;
use crate::items::Columns;
use crate::types::PieceKind;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameOverReason {
    /// The freshly spawned piece overlapped the stack
    BlockOut,
    /// Something settled in the top visible row
    TopOut,
    /// Incoming garbage would have pushed the stack out of the playfield
    GarbageOverflow,
    /// Time attack limit reached
    TimeUp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    PieceSpawned {
        kind: PieceKind,
    },
    #[serde(rename_all = "camelCase")]
    BlockLocked {
        kind: PieceKind,
        x: i8,
        y: i8,
    },
    /// `rows` are the board rows that were removed, top to bottom
    #[serde(rename_all = "camelCase")]
    LinesCleared {
        rows: Vec<usize>,
        was_attack: bool,
    },
    Exploded {
        region: Region,
    },
    WeightDropped {
        columns: Vec<i8>,
    },
    AttackReceived {
        lines: u8,
    },
    GarbageInserted {
        lines: u8,
    },
    #[serde(rename_all = "camelCase")]
    GameOver {
        final_score: u32,
        lines: u32,
        elapsed_secs: u32,
        reason: GameOverReason,
    },
}

impl GameEvent {
    pub(crate) fn weight_dropped(columns: &Columns) -> Self {
        GameEvent::WeightDropped {
            columns: columns.to_vec(),
        }
    }
}

/// Result of an intent or tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    /// Whether the state changed
    pub applied: bool,
    /// Set when the gravity timer was re-armed; the next gravity tick is due this
    /// many milliseconds from now
    pub rearm_ms: Option<u32>,
    pub events: Vec<GameEvent>,
}

impl Outcome {
    pub fn noop() -> Self {
        Self::default()
    }

    pub fn is_game_over(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }))
    }

    /// Total rows cleared in this outcome
    pub fn lines_cleared(&self) -> usize {
        self.events
            .iter()
            .map(|e| match e {
                GameEvent::LinesCleared { rows, .. } => rows.len(),
                _ => 0,
            })
            .sum()
    }

    /// Fold another outcome into this one, keeping the latest re-arm
    pub fn merge(&mut self, other: Outcome) {
        self.applied |= other.applied;
        if other.rearm_ms.is_some() {
            self.rearm_ms = other.rearm_ms;
        }
        self.events.extend(other.events);
    }
}
