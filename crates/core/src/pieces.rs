//! Pieces module - static piece catalog and the `Piece` value type
//!
//! Every kind is described once, as a tight bounding-box matrix in its spawn
//! orientation. The other three orientations are derived by clockwise transpose, so
//! a shape never needs to be written out four times.
//!
//! Matrix cell codes: `0` empty, `1` plain mino, `2` explosive core, `3` line marker.

use arrayvec::ArrayVec;
use serde::Serialize;

use crate::types::{Mino, MinoTag, PieceKind, Rotation, SPAWN_X, SPAWN_Y};

/// Largest bounding box side of any catalog shape
pub const MAX_SHAPE_SIDE: usize = 4;

/// Most minos any catalog shape has (the weight piece has six)
pub const MAX_MINOS: usize = 8;

/// Occupied cells of a shape as absolute (x, y, tag) triples
pub type Minos = ArrayVec<(i8, i8, MinoTag), MAX_MINOS>;

/// 24-bit colour used by renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// What an item piece does when it locks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemEffect {
    /// Clear a square region around the core cell
    Explosive,
    /// Punch through the occupied columns down to the floor
    Weight,
    /// Let a nearly full row containing the marker clear
    LineMarker,
}

/// How a kind responds to a rotate intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationClass {
    /// Anchor correction plus the shared kick table
    Standard,
    /// Anchor correction plus the long-piece kick table
    Long,
    /// Counter advances, position never changes
    Square,
    /// Never rotates
    Fixed,
}

/// Static description of one piece kind
#[derive(Debug)]
pub struct PieceSpec {
    pub kind: PieceKind,
    pub matrix: &'static [&'static [u8]],
    pub color: Rgb,
    pub blind_color: Rgb,
    pub effect: Option<ItemEffect>,
    pub rotation: RotationClass,
}

/// The catalog, one entry per kind in `PieceKind` declaration order
pub static CATALOG: [PieceSpec; 10] = [
    PieceSpec {
        kind: PieceKind::I,
        matrix: &[&[1, 1, 1, 1]],
        color: Rgb(0, 255, 255),
        blind_color: Rgb(86, 180, 233),
        effect: None,
        rotation: RotationClass::Long,
    },
    PieceSpec {
        kind: PieceKind::O,
        matrix: &[&[1, 1], &[1, 1]],
        color: Rgb(255, 255, 0),
        blind_color: Rgb(240, 228, 66),
        effect: None,
        rotation: RotationClass::Square,
    },
    PieceSpec {
        kind: PieceKind::T,
        matrix: &[&[0, 1, 0], &[1, 1, 1]],
        color: Rgb(160, 0, 240),
        blind_color: Rgb(204, 121, 167),
        effect: None,
        rotation: RotationClass::Standard,
    },
    PieceSpec {
        kind: PieceKind::S,
        matrix: &[&[0, 1, 1], &[1, 1, 0]],
        color: Rgb(0, 240, 0),
        blind_color: Rgb(0, 158, 115),
        effect: None,
        rotation: RotationClass::Standard,
    },
    PieceSpec {
        kind: PieceKind::Z,
        matrix: &[&[1, 1, 0], &[0, 1, 1]],
        color: Rgb(240, 0, 0),
        blind_color: Rgb(213, 94, 0),
        effect: None,
        rotation: RotationClass::Standard,
    },
    PieceSpec {
        kind: PieceKind::J,
        matrix: &[&[1, 0, 0], &[1, 1, 1]],
        color: Rgb(0, 0, 240),
        blind_color: Rgb(0, 114, 178),
        effect: None,
        rotation: RotationClass::Standard,
    },
    PieceSpec {
        kind: PieceKind::L,
        matrix: &[&[0, 0, 1], &[1, 1, 1]],
        color: Rgb(255, 165, 0),
        blind_color: Rgb(230, 159, 0),
        effect: None,
        rotation: RotationClass::Standard,
    },
    PieceSpec {
        kind: PieceKind::Explosive,
        matrix: &[&[2, 1], &[1, 1]],
        color: Rgb(255, 255, 255),
        blind_color: Rgb(255, 255, 255),
        effect: Some(ItemEffect::Explosive),
        rotation: RotationClass::Square,
    },
    PieceSpec {
        kind: PieceKind::Weight,
        matrix: &[&[0, 1, 1, 0], &[1, 1, 1, 1]],
        color: Rgb(128, 128, 128),
        blind_color: Rgb(128, 128, 128),
        effect: Some(ItemEffect::Weight),
        rotation: RotationClass::Fixed,
    },
    PieceSpec {
        kind: PieceKind::SingleRow,
        matrix: &[&[0, 1, 0], &[1, 3, 1]],
        color: Rgb(255, 192, 203),
        blind_color: Rgb(255, 255, 255),
        effect: Some(ItemEffect::LineMarker),
        rotation: RotationClass::Standard,
    },
];

/// Look up the catalog entry for a kind
pub fn spec(kind: PieceKind) -> &'static PieceSpec {
    let idx = match kind {
        PieceKind::I => 0,
        PieceKind::O => 1,
        PieceKind::T => 2,
        PieceKind::S => 3,
        PieceKind::Z => 4,
        PieceKind::J => 5,
        PieceKind::L => 6,
        PieceKind::Explosive => 7,
        PieceKind::Weight => 8,
        PieceKind::SingleRow => 9,
    };
    &CATALOG[idx]
}

/// A shape matrix in one orientation
///
/// `cells[row][col]`, only the top-left `height` x `width` corner is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shape {
    pub width: u8,
    pub height: u8,
    pub cells: [[Option<MinoTag>; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE],
}

impl Shape {
    fn from_matrix(matrix: &[&[u8]]) -> Self {
        let mut cells = [[None; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        let height = matrix.len().min(MAX_SHAPE_SIDE);
        let mut width = 0;
        for (r, row) in matrix.iter().take(MAX_SHAPE_SIDE).enumerate() {
            width = width.max(row.len().min(MAX_SHAPE_SIDE));
            for (c, code) in row.iter().take(MAX_SHAPE_SIDE).enumerate() {
                cells[r][c] = match code {
                    1 => Some(MinoTag::Plain),
                    2 => Some(MinoTag::Core),
                    3 => Some(MinoTag::Marker),
                    _ => None,
                };
            }
        }
        Self {
            width: width as u8,
            height: height as u8,
            cells,
        }
    }

    /// Rotate 90° clockwise: `new[c][h - 1 - r] = old[r][c]`
    pub fn rotated_cw(&self) -> Self {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut cells = [[None; MAX_SHAPE_SIDE]; MAX_SHAPE_SIDE];
        for r in 0..h {
            for c in 0..w {
                cells[c][h - 1 - r] = self.cells[r][c];
            }
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }

    /// Occupied cells relative to the top-left of the bounding box
    pub fn offsets(&self) -> impl Iterator<Item = (i8, i8, MinoTag)> + '_ {
        (0..self.height as usize).flat_map(move |r| {
            (0..self.width as usize)
                .filter_map(move |c| self.cells[r][c].map(|tag| (c as i8, r as i8, tag)))
        })
    }

    /// Offset of the explosive core cell, if the shape has one
    pub fn core(&self) -> Option<(i8, i8)> {
        self.offsets()
            .find(|&(_, _, tag)| tag == MinoTag::Core)
            .map(|(x, y, _)| (x, y))
    }
}

/// Get the shape of a kind in a given rotation state
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> Shape {
    let mut shape = Shape::from_matrix(spec(kind).matrix);
    for _ in 0..rotation.index() {
        shape = shape.rotated_cw();
    }
    shape
}

/// A piece: kind, rotation state, and bounding-box anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    pub fn new(kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> Self {
        Self {
            kind,
            rotation,
            x,
            y,
        }
    }

    /// A fresh piece at the spawn anchor
    pub fn spawn(kind: PieceKind) -> Self {
        Self::new(kind, Rotation::North, SPAWN_X, SPAWN_Y)
    }

    pub fn shape(&self) -> Shape {
        get_shape(self.kind, self.rotation)
    }

    /// Same piece moved to another anchor
    pub fn at(self, x: i8, y: i8) -> Self {
        Self { x, y, ..self }
    }

    pub fn with_rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }

    /// Absolute board coordinates of every occupied cell
    pub fn minos(&self) -> Minos {
        self.shape()
            .offsets()
            .map(|(dx, dy, tag)| (self.x + dx, self.y + dy, tag))
            .collect()
    }

    /// Absolute coordinates of the explosive core cell
    pub fn core(&self) -> Option<(i8, i8)> {
        self.shape().core().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// The mino value written to the board for a cell of this piece
    pub fn mino(&self, tag: MinoTag) -> Mino {
        Mino::new(self.kind, tag)
    }
}
