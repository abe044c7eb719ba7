//! Piece module - falling piece geometry and SRS offset tables
//!
//! A [`FallingPiece`] only knows its shape and where it is. Whether a position is
//! legal is the board's business, so every transform here is unchecked.
//!
//! Shapes are rotated by transforming each cell around the anchor rather than
//! looking up per-orientation shapes. Kicks use the SRS *offset* formulation: the
//! candidate translations for a rotation are `start_table[i] - end_table[i]`.
//! Tables are expressed with `y` growing downwards.
//! Reference: https://tetris.wiki/SRS

use crate::types::{
    CoordinatePair, OffsetTable, Orientation, RotationType, Shift, Tetromino, TetrominoMap,
    SPAWN_X, SPAWN_Y,
};

const fn cp(x: i8, y: i8) -> CoordinatePair {
    CoordinatePair::new(x, y)
}

/// Shape of a piece in its spawn orientation
pub fn initial_tetromino_map(tetromino: Tetromino) -> TetrominoMap {
    match tetromino {
        Tetromino::I => [cp(-1, 0), cp(0, 0), cp(1, 0), cp(2, 0)],
        Tetromino::O => [cp(0, -1), cp(1, -1), cp(0, 0), cp(1, 0)],
        Tetromino::T => [cp(0, -1), cp(-1, 0), cp(0, 0), cp(1, 0)],
        Tetromino::S => [cp(0, -1), cp(1, -1), cp(-1, 0), cp(0, 0)],
        Tetromino::Z => [cp(-1, -1), cp(0, -1), cp(0, 0), cp(1, 0)],
        Tetromino::J => [cp(-1, -1), cp(-1, 0), cp(0, 0), cp(1, 0)],
        Tetromino::L => [cp(1, -1), cp(-1, 0), cp(0, 0), cp(1, 0)],
    }
}

/// Rotate a single cell offset around the anchor
fn rotate_cell(cell: CoordinatePair, rotation: RotationType) -> CoordinatePair {
    match rotation {
        RotationType::Clockwise => cp(-cell.y, cell.x),
        RotationType::CounterClockwise => cp(cell.y, -cell.x),
        RotationType::OneEighty => cp(-cell.x, -cell.y),
    }
}

/// The currently controlled piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallingPiece {
    pub tetromino: Tetromino,
    pub orientation: Orientation,
    /// Anchor column
    pub x: i8,
    /// Anchor row
    pub y: i8,
    pub tetromino_map: TetrominoMap,
}

impl FallingPiece {
    /// Create a piece in spawn orientation at the given anchor
    pub fn new(tetromino: Tetromino, x: i8, y: i8) -> Self {
        Self {
            tetromino,
            orientation: Orientation::Up,
            x,
            y,
            tetromino_map: initial_tetromino_map(tetromino),
        }
    }

    /// Create a piece at the spawn anchor
    pub fn spawn(tetromino: Tetromino) -> Self {
        Self::new(tetromino, SPAWN_X, SPAWN_Y)
    }

    /// Rebuild a piece from its orientation alone (as stored in save data)
    pub fn oriented(tetromino: Tetromino, orientation: Orientation, x: i8, y: i8) -> Self {
        let mut piece = Self::new(tetromino, x, y);
        for _ in 0..orientation.index() {
            piece.rotate(RotationType::Clockwise);
        }
        piece
    }

    /// Absolute (column, row) of every occupied cell
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.tetromino_map
            .map(|cell| (self.x + cell.x, self.y + cell.y))
    }

    pub fn fallen(&self) -> Self {
        Self {
            y: self.y + 1,
            ..*self
        }
    }

    pub fn shifted(&self, shift: Shift) -> Self {
        Self {
            x: self.x + shift.dx(),
            ..*self
        }
    }

    /// Rotate the shape around the anchor without any kick
    ///
    /// The map is recomputed from the current cells, never patched.
    pub fn rotated(&self, rotation: RotationType) -> Self {
        Self {
            orientation: self.orientation.rotated(rotation),
            tetromino_map: self.tetromino_map.map(|cell| rotate_cell(cell, rotation)),
            ..*self
        }
    }

    pub fn translated(&self, offset: CoordinatePair) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..*self
        }
    }

    pub fn fall(&mut self) {
        *self = self.fallen();
    }

    pub fn shift(&mut self, shift: Shift) {
        *self = self.shifted(shift);
    }

    pub fn rotate(&mut self, rotation: RotationType) {
        *self = self.rotated(rotation);
    }

    pub fn translate(&mut self, offset: CoordinatePair) {
        *self = self.translated(offset);
    }

    /// Kick candidates, in priority order, for rotating this piece
    pub fn kick_candidates(&self, rotation: RotationType) -> [CoordinatePair; 5] {
        let start = offset_table(self.tetromino, self.orientation);
        let end = offset_table(self.tetromino, self.orientation.rotated(rotation));
        std::array::from_fn(|i| start[i] - end[i])
    }
}

/// SRS offset table for a piece class and orientation
pub fn offset_table(tetromino: Tetromino, orientation: Orientation) -> &'static OffsetTable {
    let tables = match tetromino {
        Tetromino::I => &I_OFFSETS,
        Tetromino::O => &O_OFFSETS,
        _ => &JLSTZ_OFFSETS,
    };
    &tables[orientation.index() as usize]
}

/// Shared by J, L, S, T and Z, indexed by orientation
static JLSTZ_OFFSETS: [OffsetTable; 4] = [
    // Up
    [cp(0, 0), cp(0, 0), cp(0, 0), cp(0, 0), cp(0, 0)],
    // Right
    [cp(0, 0), cp(1, 0), cp(1, 1), cp(0, -2), cp(1, -2)],
    // Down
    [cp(0, 0), cp(0, 0), cp(0, 0), cp(0, 0), cp(0, 0)],
    // Left
    [cp(0, 0), cp(-1, 0), cp(-1, 1), cp(0, -2), cp(-1, -2)],
];

static I_OFFSETS: [OffsetTable; 4] = [
    [cp(0, 0), cp(-1, 0), cp(2, 0), cp(-1, 0), cp(2, 0)],
    [cp(-1, 0), cp(0, 0), cp(0, 0), cp(0, -1), cp(0, 2)],
    [cp(-1, -1), cp(1, -1), cp(-2, -1), cp(1, 0), cp(-2, 0)],
    [cp(0, -1), cp(0, -1), cp(0, -1), cp(0, 1), cp(0, -2)],
];

/// O never kicks; its offsets only undo the drift of rotating around a corner
static O_OFFSETS: [OffsetTable; 4] = [
    [cp(0, 0); 5],
    [cp(0, 1); 5],
    [cp(-1, 1); 5],
    [cp(-1, 0); 5],
];

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut cells: [(i8, i8); 4]) -> [(i8, i8); 4] {
        cells.sort();
        cells
    }

    #[test]
    fn test_spawn_position() {
        let piece = FallingPiece::spawn(Tetromino::T);
        assert_eq!(piece.x, SPAWN_X);
        assert_eq!(piece.y, SPAWN_Y);
        assert_eq!(piece.orientation, Orientation::Up);
    }

    #[test]
    fn test_t_clockwise_points_right() {
        let piece = FallingPiece::new(Tetromino::T, 4, 10).rotated(RotationType::Clockwise);
        assert_eq!(piece.orientation, Orientation::Right);
        assert_eq!(sorted(piece.cells()), [(4, 9), (4, 10), (4, 11), (5, 10)]);
    }

    #[test]
    fn test_o_rotation_is_stationary_after_offset() {
        let piece = FallingPiece::new(Tetromino::O, 4, 10);
        for rotation in [
            RotationType::Clockwise,
            RotationType::CounterClockwise,
            RotationType::OneEighty,
        ] {
            let kick = piece.kick_candidates(rotation)[0];
            let rotated = piece.rotated(rotation).translated(kick);
            assert_eq!(sorted(rotated.cells()), sorted(piece.cells()));
        }
    }

    #[test]
    fn test_jlstz_first_kick_is_identity() {
        for kind in [Tetromino::J, Tetromino::L, Tetromino::S, Tetromino::T, Tetromino::Z] {
            let piece = FallingPiece::spawn(kind);
            assert_eq!(
                piece.kick_candidates(RotationType::Clockwise)[0],
                CoordinatePair::new(0, 0)
            );
        }
    }

    #[test]
    fn test_jlstz_up_to_right_kicks() {
        let piece = FallingPiece::spawn(Tetromino::T);
        let kicks = piece.kick_candidates(RotationType::Clockwise);
        assert_eq!(
            kicks,
            [cp(0, 0), cp(-1, 0), cp(-1, -1), cp(0, 2), cp(-1, 2)]
        );
    }

    #[test]
    fn test_i_up_to_right_kicks() {
        let piece = FallingPiece::spawn(Tetromino::I);
        let kicks = piece.kick_candidates(RotationType::Clockwise);
        assert_eq!(kicks, [cp(1, 0), cp(-1, 0), cp(2, 0), cp(-1, 1), cp(2, -2)]);
    }

    #[test]
    fn test_oriented_matches_rotation_history() {
        let spun = FallingPiece::new(Tetromino::J, 3, 12)
            .rotated(RotationType::CounterClockwise);
        assert_eq!(
            FallingPiece::oriented(Tetromino::J, Orientation::Left, 3, 12),
            spun
        );
        let flipped = FallingPiece::new(Tetromino::S, 3, 12).rotated(RotationType::OneEighty);
        assert_eq!(
            FallingPiece::oriented(Tetromino::S, Orientation::Down, 3, 12),
            flipped
        );
    }

    #[test]
    fn test_mutating_forms_match_pure_forms() {
        let piece = FallingPiece::spawn(Tetromino::L);
        let mut moved = piece;
        moved.fall();
        moved.shift(Shift::Left);
        moved.rotate(RotationType::CounterClockwise);
        moved.translate(cp(2, -1));
        assert_eq!(
            moved,
            piece
                .fallen()
                .shifted(Shift::Left)
                .rotated(RotationType::CounterClockwise)
                .translated(cp(2, -1))
        );
    }
}
