//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they can be used by
//! the engine, the input layer and any renderer alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 40 rows (indexed 0-39, row 0 at the top)
//! - **Visible height**: the bottom 20 rows (20-39); rows 0-19 are the spawn buffer
//! - **Spawn anchor**: (4, 19), just above the visible window
//!
//! # Coordinates
//!
//! `y` grows towards the floor. A piece's occupied cells are stored as
//! [`CoordinatePair`] offsets around its anchor, inside a conceptual 5x5 box.
//!
//! # Frame Timing Defaults
//!
//! Timing is counted in frames (the host calls the engine once per frame):
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_GRAVITY_FRAMES` | 20 | Frames per automatic fall |
//! | `DEFAULT_SOFT_DROP_FRAMES` | 1 | Frames per fall while soft dropping |
//! | `DEFAULT_LOCK_DELAY_FRAMES` | 30 | Grounded frames before a piece locks |
//! | `DEFAULT_LOCK_DELAY_RESETS` | 15 | Moves/rotations allowed while grounded |
//! | `DEFAULT_DAS_FRAMES` | 7 | Frames a direction is held before auto-shift |
//!
//! # Examples
//!
//! ```
//! use raytris_types::{Orientation, Tetromino, RotationType, WIDTH, HEIGHT};
//!
//! let piece = Tetromino::from_str("t").unwrap();
//! assert_eq!(piece, Tetromino::T);
//!
//! let facing = Orientation::Up.rotated(RotationType::Clockwise);
//! assert_eq!(facing, Orientation::Right);
//!
//! assert_eq!(WIDTH, 10);
//! assert_eq!(HEIGHT, 40);
//! ```

/// Board width in cells (10 columns)
pub const WIDTH: usize = 10;

/// Board height in cells, spawn buffer included (40 rows)
pub const HEIGHT: usize = 40;

/// Number of rows shown to the player (the bottom 20)
pub const VISIBLE_HEIGHT: usize = 20;

/// Anchor column of a freshly spawned piece
pub const SPAWN_X: i8 = 4;

/// Anchor row of a freshly spawned piece (last buffer row above the visible window)
pub const SPAWN_Y: i8 = VISIBLE_HEIGHT as i8 - 1;

/// Number of upcoming pieces that are always visible in the next queue
pub const LOOKAHEAD: usize = 5;

/// Pieces per bag
pub const BAG_SIZE: usize = 7;

/// Frames a line clear message stays on screen
pub const MESSAGE_DURATION: u8 = 180;

pub const DEFAULT_GRAVITY_FRAMES: u32 = 20;
pub const DEFAULT_SOFT_DROP_FRAMES: u32 = 1;
pub const DEFAULT_LOCK_DELAY_FRAMES: u32 = 30;
pub const DEFAULT_LOCK_DELAY_RESETS: u32 = 15;
pub const DEFAULT_DAS_FRAMES: u32 = 7;

/// Upper bound the settings menu allows for DAS and soft drop frames
pub const MAX_TUNABLE_FRAMES: u32 = 20;

/// The seven tetromino kinds
///
/// The "no piece" / empty-cell sentinel is expressed as `Option<Tetromino>`
/// (see [`Cell`]), never as an extra variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tetromino {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Tetromino {
    /// Every kind in canonical bag order
    pub const ALL: [Tetromino; BAG_SIZE] = [
        Tetromino::I,
        Tetromino::O,
        Tetromino::T,
        Tetromino::S,
        Tetromino::Z,
        Tetromino::J,
        Tetromino::L,
    ];

    /// Parse a kind from its letter (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use raytris_types::Tetromino;
    ///
    /// assert_eq!(Tetromino::from_str("i"), Some(Tetromino::I));
    /// assert_eq!(Tetromino::from_str("L"), Some(Tetromino::L));
    /// assert_eq!(Tetromino::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(Tetromino::I),
            "o" => Some(Tetromino::O),
            "t" => Some(Tetromino::T),
            "s" => Some(Tetromino::S),
            "z" => Some(Tetromino::Z),
            "j" => Some(Tetromino::J),
            "l" => Some(Tetromino::L),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tetromino::I => "i",
            Tetromino::O => "o",
            Tetromino::T => "t",
            Tetromino::S => "s",
            Tetromino::Z => "z",
            Tetromino::J => "j",
            Tetromino::L => "l",
        }
    }

    /// Stable numeric id used by the save format (0-6)
    pub fn index(&self) -> u8 {
        match self {
            Tetromino::I => 0,
            Tetromino::O => 1,
            Tetromino::T => 2,
            Tetromino::S => 3,
            Tetromino::Z => 4,
            Tetromino::J => 5,
            Tetromino::L => 6,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// Orientation of a falling piece, cyclic mod 4
///
/// `Up` is the spawn orientation; each clockwise quarter turn adds one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Up,
    Right,
    Down,
    Left,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Up,
        Orientation::Right,
        Orientation::Down,
        Orientation::Left,
    ];

    /// Number of clockwise quarter turns from `Up`
    pub fn index(&self) -> u8 {
        match self {
            Orientation::Up => 0,
            Orientation::Right => 1,
            Orientation::Down => 2,
            Orientation::Left => 3,
        }
    }

    pub fn from_index(index: u8) -> Self {
        Self::ALL[(index % 4) as usize]
    }

    /// Orientation after applying a rotation
    ///
    /// ```
    /// use raytris_types::{Orientation, RotationType};
    ///
    /// assert_eq!(Orientation::Up.rotated(RotationType::CounterClockwise), Orientation::Left);
    /// assert_eq!(Orientation::Right.rotated(RotationType::OneEighty), Orientation::Left);
    /// assert_eq!(Orientation::Left.rotated(RotationType::Clockwise), Orientation::Up);
    /// ```
    pub fn rotated(&self, rotation: RotationType) -> Self {
        Self::from_index(self.index() + rotation.quarter_turns())
    }
}

/// Direction of a rotation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationType {
    Clockwise,
    CounterClockwise,
    OneEighty,
}

impl RotationType {
    /// Clockwise quarter turns, expressed mod 4 (counter-clockwise is three)
    pub fn quarter_turns(&self) -> u8 {
        match self {
            RotationType::Clockwise => 1,
            RotationType::OneEighty => 2,
            RotationType::CounterClockwise => 3,
        }
    }
}

/// Direction of a one-cell horizontal move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shift {
    Left,
    Right,
}

impl Shift {
    pub fn dx(&self) -> i8 {
        match self {
            Shift::Left => -1,
            Shift::Right => 1,
        }
    }
}

/// Signed cell offset relative to a piece anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CoordinatePair {
    pub x: i8,
    pub y: i8,
}

impl CoordinatePair {
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for CoordinatePair {
    type Output = CoordinatePair;

    fn sub(self, rhs: Self) -> Self::Output {
        CoordinatePair::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// The four occupied cells of a piece
pub type TetrominoMap = [CoordinatePair; 4];

/// The five kick offsets of one (piece class, orientation) pair
pub type OffsetTable = [CoordinatePair; 5];

/// A cell on the board: `None` is empty, `Some(kind)` a solidified mino
pub type Cell = Option<Tetromino>;

/// Spin classification of a lock
///
/// - **None**: not a spin
/// - **Mini**: three corners blocked but not both front corners
/// - **Proper**: three corners blocked including both front corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpinType {
    #[default]
    None,
    Mini,
    Proper,
}

impl SpinType {
    pub fn index(&self) -> u8 {
        match self {
            SpinType::None => 0,
            SpinType::Mini => 1,
            SpinType::Proper => 2,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(SpinType::None),
            1 => Some(SpinType::Mini),
            2 => Some(SpinType::Proper),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            SpinType::None => None,
            SpinType::Mini => Some("mini"),
            SpinType::Proper => Some("proper"),
        }
    }
}

/// Kind of line clear announced to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageType {
    #[default]
    None,
    Single,
    Double,
    Triple,
    Tetris,
    AllClear,
}

impl MessageType {
    /// Message for a plain clear of `lines` rows
    pub fn for_lines(lines: usize) -> Self {
        match lines {
            1 => MessageType::Single,
            2 => MessageType::Double,
            3 => MessageType::Triple,
            4 => MessageType::Tetris,
            _ => MessageType::None,
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            MessageType::None => 0,
            MessageType::Single => 1,
            MessageType::Double => 2,
            MessageType::Triple => 3,
            MessageType::Tetris => 4,
            MessageType::AllClear => 5,
        }
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(MessageType::None),
            1 => Some(MessageType::Single),
            2 => Some(MessageType::Double),
            3 => Some(MessageType::Triple),
            4 => Some(MessageType::Tetris),
            5 => Some(MessageType::AllClear),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::None => "",
            MessageType::Single => "SINGLE",
            MessageType::Double => "DOUBLE",
            MessageType::Triple => "TRIPLE",
            MessageType::Tetris => "TETRIS",
            MessageType::AllClear => "ALL CLEAR",
        }
    }
}

/// Line clear scores indexed by lines cleared (no spin)
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Mini spin scores indexed by lines cleared (0-2)
pub const MINI_SPIN_SCORES: [u32; 3] = [100, 200, 400];

/// Proper spin scores indexed by lines cleared (0-3)
pub const PROPER_SPIN_SCORES: [u32; 4] = [400, 800, 1200, 1600];

/// Flat bonus for emptying the whole board
pub const ALL_CLEAR_SCORE: u32 = 3500;

/// Combo bonus per consecutive clear
pub const COMBO_BASE: u32 = 50;

/// Points per cell travelled by a hard drop
pub const HARD_DROP_SCORE_PER_CELL: u32 = 2;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u32 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u32 = 2;

/// Streak length at which the back-to-back multiplier starts applying
pub const B2B_THRESHOLD: u32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_geometry_defaults() {
        assert_eq!(WIDTH, 10);
        assert_eq!(HEIGHT, 40);
        assert_eq!(VISIBLE_HEIGHT, 20);
        assert_eq!(SPAWN_Y, 19);
        assert!(HEIGHT >= 2 * VISIBLE_HEIGHT);
    }

    #[test]
    fn tetromino_index_roundtrip() {
        for kind in Tetromino::ALL {
            assert_eq!(Tetromino::from_index(kind.index()), Some(kind));
        }
        assert_eq!(Tetromino::from_index(7), None);
    }

    #[test]
    fn orientation_cycles() {
        let mut o = Orientation::Up;
        for _ in 0..4 {
            o = o.rotated(RotationType::Clockwise);
        }
        assert_eq!(o, Orientation::Up);
        assert_eq!(
            Orientation::Down.rotated(RotationType::OneEighty),
            Orientation::Up
        );
    }

    #[test]
    fn message_for_lines() {
        assert_eq!(MessageType::for_lines(0), MessageType::None);
        assert_eq!(MessageType::for_lines(4), MessageType::Tetris);
        assert_eq!(MessageType::for_lines(5), MessageType::None);
    }
}
