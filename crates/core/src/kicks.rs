//! Rotation resolution: anchor corrections and wall kick tables
//!
//! Shapes are tight bounding boxes, so rotating by transpose shifts the visual
//! centre. Before testing anything, the anchor is moved by a correction that
//! depends only on the pre-rotation state; each correction table sums to zero so
//! four rotations in open space leave the anchor where it started.
//!
//! The corrected position is tried first, then the four kick offsets of the
//! pre-rotation state, strictly in table order. y grows downward.

use crate::pieces::{spec, Piece, RotationClass};

/// (dx, dy) displacement
pub type Offset = (i8, i8);

/// Anchor correction for the standard pieces, indexed by pre-rotation state
pub const STANDARD_ANCHOR: [Offset; 4] = [(1, 0), (-1, 1), (0, -1), (0, 0)];

/// Anchor correction for the long piece
pub const LONG_ANCHOR: [Offset; 4] = [(2, -1), (-2, 2), (1, -2), (-1, 1)];

/// Kick offsets shared by J, L, S, T, Z and the single-row item
pub const STANDARD_KICKS: [[Offset; 4]; 4] = [
    // 0 -> 1
    [(-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 1 -> 2
    [(1, 0), (1, 1), (0, -2), (1, -2)],
    // 2 -> 3
    [(1, 0), (1, -1), (0, 2), (1, 2)],
    // 3 -> 0
    [(-1, 0), (-1, 1), (0, -2), (-1, -2)],
];

/// Kick offsets for the long piece
pub const LONG_KICKS: [[Offset; 4]; 4] = [
    // 0 -> 1
    [(-2, 0), (1, 0), (-2, 1), (1, -2)],
    // 1 -> 2
    [(-1, 0), (2, 0), (-1, -2), (2, 1)],
    // 2 -> 3
    [(2, 0), (-1, 0), (2, -1), (-1, 2)],
    // 3 -> 0
    [(1, 0), (-2, 0), (1, 2), (-2, -1)],
];

/// Try to rotate `piece` clockwise.
///
/// `fits` answers whether a candidate is in bounds and collision-free. Returns the
/// committed piece, or `None` when the rotation must not happen (fixed pieces, or
/// every candidate rejected).
pub fn try_rotate(piece: Piece, fits: impl Fn(&Piece) -> bool) -> Option<Piece> {
    let next = piece.rotation.rotate_cw();
    let (anchor, kicks) = match spec(piece.kind).rotation {
        RotationClass::Fixed => return None,
        RotationClass::Square => return Some(piece.with_rotation(next)),
        RotationClass::Standard => (&STANDARD_ANCHOR, &STANDARD_KICKS),
        RotationClass::Long => (&LONG_ANCHOR, &LONG_KICKS),
    };

    let from = piece.rotation.index();
    let (ax, ay) = anchor[from];
    let base = piece.with_rotation(next).at(piece.x + ax, piece.y + ay);

    std::iter::once((0, 0))
        .chain(kicks[from].iter().copied())
        .map(|(dx, dy)| base.at(base.x + dx, base.y + dy))
        .find(|candidate| fits(candidate))
}
