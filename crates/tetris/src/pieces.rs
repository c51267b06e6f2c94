//! Pieces module - Tetromino shapes and SRS rotation system
//!
//! Implements the Super Rotation System (SRS) shape and wall kick tables.
//! Coordinates are y-down (row 0 at the top), so the kick offsets below are
//! the guideline tables with their vertical component negated.
//! Reference: https://tetris.wiki/SRS

use crate::types::{PieceKind, Rotation, SPAWN_POSITION};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => get_i_shape(rotation),
        PieceKind::O => get_o_shape(rotation),
        PieceKind::T => get_t_shape(rotation),
        PieceKind::S => get_s_shape(rotation),
        PieceKind::Z => get_z_shape(rotation),
        PieceKind::J => get_j_shape(rotation),
        PieceKind::L => get_l_shape(rotation),
    }
}

/// I piece shapes
fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        // N: horizontal, centered on row 1
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        // E: vertical, right-aligned
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        // S: horizontal, centered on row 2
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        // W: vertical, left-aligned
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

/// O piece shapes (same for all rotations)
fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// SRS wall kick data for one piece group
///
/// Each row is the ordered list of (dx, dy) candidates for one directed
/// rotation transition; the first candidate is always the unkicked (0, 0).
pub type KickTable = [[MinoOffset; 5]; 8];

/// Fallback for transitions with no table entry (e.g. a 180° turn)
pub const IDENTITY_KICK: [MinoOffset; 1] = [(0, 0)];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    // 0->1 (N->E)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 1->0 (E->N)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 1->2 (E->S)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 2->1 (S->E)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 2->3 (S->W)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 3->2 (W->S)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 3->0 (W->N)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 0->3 (N->W)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
];

/// I piece kick table (different from JLSTZ)
const I_KICKS: KickTable = [
    // 0->1 (N->E)
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // 1->0 (E->N)
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // 1->2 (E->S)
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
    // 2->1 (S->E)
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    // 2->3 (S->W)
    [(0, 0), (2, 0), (-1, 0), (2, -1), (-1, 2)],
    // 3->2 (W->S)
    [(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)],
    // 3->0 (W->N)
    [(0, 0), (1, 0), (-2, 0), (1, 2), (-2, -1)],
    // 0->3 (N->W)
    [(0, 0), (-1, 0), (2, 0), (-1, -2), (2, 1)],
];

/// Row of a kick table for a directed transition, if the transition is a
/// quarter turn.
fn get_kick_index(from: Rotation, to: Rotation) -> Option<usize> {
    match (from, to) {
        (Rotation::North, Rotation::East) => Some(0),
        (Rotation::East, Rotation::North) => Some(1),
        (Rotation::East, Rotation::South) => Some(2),
        (Rotation::South, Rotation::East) => Some(3),
        (Rotation::South, Rotation::West) => Some(4),
        (Rotation::West, Rotation::South) => Some(5),
        (Rotation::West, Rotation::North) => Some(6),
        (Rotation::North, Rotation::West) => Some(7),
        _ => None,
    }
}

/// Ordered kick candidates for rotating `kind` from `from` to `to`
///
/// The O piece only ever tries the identity offset. Transitions that have no
/// table row fall back to [`IDENTITY_KICK`].
pub fn get_kick_offsets(kind: PieceKind, from: Rotation, to: Rotation) -> &'static [MinoOffset] {
    let table = match kind {
        PieceKind::O => return &IDENTITY_KICK,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    };

    match get_kick_index(from, to) {
        Some(index) => &table[index],
        None => &IDENTITY_KICK,
    }
}

/// Result of a successful kicked rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationResult {
    pub shape: PieceShape,
    pub rotation: Rotation,
    pub kick: MinoOffset,
}

/// Try to rotate a piece with wall kicks
///
/// Each candidate offset is tested in table order with `is_free` for every
/// mino; the first candidate that fits wins. Returns `None` if all fail.
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    clockwise: bool,
    is_free: impl Fn(i8, i8) -> bool,
) -> Option<RotationResult> {
    let new_rotation = if clockwise {
        rotation.rotate_cw()
    } else {
        rotation.rotate_ccw()
    };

    let new_shape = get_shape(kind, new_rotation);

    for &(dx, dy) in get_kick_offsets(kind, rotation, new_rotation) {
        let new_x = x + dx;
        let new_y = y + dy;

        let valid = new_shape
            .iter()
            .all(|&(mx, my)| is_free(new_x + mx, new_y + my));

        if valid {
            return Some(RotationResult {
                shape: new_shape,
                rotation: new_rotation,
                kick: (dx, dy),
            });
        }
    }

    None
}

/// Active falling piece
///
/// Plain value type: moves and rotations produce a new `Tetromino` rather
/// than mutating the one held by the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at the spawn origin
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_POSITION.0,
            y: SPAWN_POSITION.1,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board cells covered by this piece
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Copy translated by (dx, dy)
    pub fn shifted(&self, dx: i8, dy: i8) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_four_distinct_cells() {
        for kind in PieceKind::ALL {
            for rotation in Rotation::ALL {
                let shape = get_shape(kind, rotation);
                for i in 0..4 {
                    for j in (i + 1)..4 {
                        assert_ne!(shape[i], shape[j], "{kind:?} {rotation:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn o_piece_only_tries_identity() {
        let kicks = get_kick_offsets(PieceKind::O, Rotation::North, Rotation::East);
        assert_eq!(kicks, &[(0, 0)]);
    }

    #[test]
    fn half_turn_falls_back_to_identity() {
        let kicks = get_kick_offsets(PieceKind::T, Rotation::North, Rotation::South);
        assert_eq!(kicks, &IDENTITY_KICK);
    }

    #[test]
    fn i_piece_uses_its_own_table() {
        let i = get_kick_offsets(PieceKind::I, Rotation::North, Rotation::East);
        let t = get_kick_offsets(PieceKind::T, Rotation::North, Rotation::East);
        assert_ne!(i, t);
        assert_eq!(i[1], (-2, 0));
        assert_eq!(t[1], (-1, 0));
    }

    #[test]
    fn opposite_transitions_are_inverse() {
        // Each kick for A->B has its negation at the same slot in B->A.
        for kind in [PieceKind::I, PieceKind::T] {
            for from in Rotation::ALL {
                let to = from.rotate_cw();
                let forward = get_kick_offsets(kind, from, to);
                let back = get_kick_offsets(kind, to, from);
                for (f, b) in forward.iter().zip(back) {
                    assert_eq!((f.0 + b.0, f.1 + b.1), (0, 0), "{kind:?} {from:?}");
                }
            }
        }
    }
}
