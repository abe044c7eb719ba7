//! Snapshot module - a detached copy of a playfield, and its save format
//!
//! Save data is plain whitespace-separated integers behind a short header:
//!
//! ```text
//! raytris 1
//! <HEIGHT rows of WIDTH cells, 0..=6 a piece, 7 empty>
//! <falling: piece orientation x y>
//! <holding (7 = none)> <can_swap>
//! <upcoming count> <pieces, dealt-next first>
//! <frames_since_drop> <lock_delay_frames> <lock_delay_resets> <frames_pressed>
//! <combo> <b2b> <has_lost> <score> <last_move_rotation>
//! <message kind> <message timer> <message spin>
//! ```
//!
//! The random generator is not saved; a restored playfield keeps dealing from its
//! own generator once the saved pieces run out.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::str::SplitAsciiWhitespace;

use tracing::debug;

use crate::board::Board;
use crate::error::SnapshotError;
use crate::next_queue::MAX_QUEUE_SIZE;
use crate::piece::FallingPiece;
use crate::playfield::{LineClearMessage, Playfield};
use crate::types::{
    Cell, MessageType, Orientation, SpinType, Tetromino, BAG_SIZE, HEIGHT, WIDTH,
};

const HEADER: &str = "raytris";
pub const SAVE_FORMAT_VERSION: i64 = 1;

/// Integer written for an empty cell or an empty hold slot
const EMPTY_CELL: u8 = BAG_SIZE as u8;

/// How far a falling piece's anchor may sit outside the grid (half its 5x5 box)
const ANCHOR_MARGIN: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub tetromino: Tetromino,
    pub orientation: Orientation,
    pub x: i8,
    pub y: i8,
}

impl From<FallingPiece> for ActiveSnapshot {
    fn from(value: FallingPiece) -> Self {
        Self {
            tetromino: value.tetromino,
            orientation: value.orientation,
            x: value.x,
            y: value.y,
        }
    }
}

impl From<ActiveSnapshot> for FallingPiece {
    fn from(value: ActiveSnapshot) -> Self {
        FallingPiece::oriented(value.tetromino, value.orientation, value.x, value.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TimersSnapshot {
    pub frames_since_drop: u32,
    pub lock_delay_frames: u32,
    pub lock_delay_resets: u32,
    pub frames_pressed: i32,
}

/// Everything needed to put a playfield back exactly as it was
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub grid: Board,
    pub active: ActiveSnapshot,
    pub holding: Option<Tetromino>,
    pub can_swap: bool,
    /// Buffered pieces, dealt-next first
    pub upcoming: Vec<Tetromino>,
    pub timers: TimersSnapshot,
    pub combo: u32,
    pub b2b: u32,
    pub has_lost: bool,
    pub score: u64,
    pub last_move_rotation: bool,
    pub message: LineClearMessage,
}

impl Snapshot {
    /// Serialize into the save format
    pub fn write_to<W: Write>(&self, mut out: W) -> Result<(), SnapshotError> {
        writeln!(out, "{HEADER} {SAVE_FORMAT_VERSION}")?;

        for row in self.grid.rows() {
            let line: Vec<String> = row.iter().map(|&c| cell_code(c).to_string()).collect();
            writeln!(out, "{}", line.join(" "))?;
        }

        let a = &self.active;
        writeln!(
            out,
            "{} {} {} {}",
            a.tetromino.index(),
            a.orientation.index(),
            a.x,
            a.y
        )?;
        writeln!(out, "{} {}", cell_code(self.holding), u8::from(self.can_swap))?;

        write!(out, "{}", self.upcoming.len())?;
        for piece in &self.upcoming {
            write!(out, " {}", piece.index())?;
        }
        writeln!(out)?;

        let t = &self.timers;
        writeln!(
            out,
            "{} {} {} {}",
            t.frames_since_drop, t.lock_delay_frames, t.lock_delay_resets, t.frames_pressed
        )?;
        writeln!(
            out,
            "{} {} {} {} {}",
            self.combo,
            self.b2b,
            u8::from(self.has_lost),
            self.score,
            u8::from(self.last_move_rotation)
        )?;
        writeln!(
            out,
            "{} {} {}",
            self.message.kind.index(),
            self.message.timer,
            self.message.spin.index()
        )?;
        out.flush()?;
        Ok(())
    }

    pub fn to_save_string(&self) -> Result<String, SnapshotError> {
        let mut buf = Vec::new();
        self.write_to(&mut buf)?;
        // Only ASCII digits, spaces and newlines are ever written.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Parse the save format
    pub fn read_from(input: &str) -> Result<Self, SnapshotError> {
        let mut tokens = Tokens::new(input);

        let header = tokens.word("header")?;
        if header != HEADER {
            return Err(SnapshotError::BadHeader(header.to_owned()));
        }
        let version = tokens.int("version")?;
        if version != SAVE_FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(version));
        }

        let mut grid = Board::new();
        for y in 0..HEIGHT as i8 {
            for x in 0..WIDTH as i8 {
                grid.set(x, y, tokens.cell("grid")?);
            }
        }

        let active = ActiveSnapshot {
            tetromino: tokens.tetromino("falling piece")?,
            orientation: Orientation::from_index(tokens.ranged::<u8>("orientation", 0, 3)?),
            x: tokens.ranged("falling x", -ANCHOR_MARGIN, WIDTH as i64 + ANCHOR_MARGIN)?,
            y: tokens.ranged("falling y", -ANCHOR_MARGIN, HEIGHT as i64 + ANCHOR_MARGIN)?,
        };
        let holding = tokens.cell("holding piece")?;
        let can_swap = tokens.flag("can_swap")?;

        let count: usize = tokens.ranged("upcoming count", 0, MAX_QUEUE_SIZE as i64)?;
        let upcoming = (0..count)
            .map(|_| tokens.tetromino("upcoming"))
            .collect::<Result<Vec<_>, _>>()?;

        let timers = TimersSnapshot {
            frames_since_drop: tokens.ranged("frames_since_drop", 0, i64::from(u32::MAX))?,
            lock_delay_frames: tokens.ranged("lock_delay_frames", 0, i64::from(u32::MAX))?,
            lock_delay_resets: tokens.ranged("lock_delay_resets", 0, i64::from(u32::MAX))?,
            frames_pressed: tokens.ranged(
                "frames_pressed",
                i64::from(i32::MIN),
                i64::from(i32::MAX),
            )?,
        };

        let combo = tokens.ranged("combo", 0, i64::from(u32::MAX))?;
        let b2b = tokens.ranged("b2b", 0, i64::from(u32::MAX))?;
        let has_lost = tokens.flag("has_lost")?;
        let score = tokens.ranged("score", 0, i64::MAX)?;
        let last_move_rotation = tokens.flag("last_move_rotation")?;

        let kind_index: u8 = tokens.ranged("message kind", 0, 5)?;
        let timer = tokens.ranged("message timer", 0, i64::from(u8::MAX))?;
        let spin_index: u8 = tokens.ranged("message spin", 0, 2)?;
        let message = LineClearMessage {
            kind: MessageType::from_index(kind_index).unwrap_or_default(),
            timer,
            spin: SpinType::from_index(spin_index).unwrap_or_default(),
        };

        Ok(Self {
            grid,
            active,
            holding,
            can_swap,
            upcoming,
            timers,
            combo,
            b2b,
            has_lost,
            score,
            last_move_rotation,
            message,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let file = fs::File::create(path.as_ref())?;
        self.write_to(std::io::BufWriter::new(file))?;
        debug!(path = %path.as_ref().display(), "snapshot saved");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let input = fs::read_to_string(path.as_ref())?;
        let snapshot = Self::read_from(&input)?;
        debug!(path = %path.as_ref().display(), "snapshot loaded");
        Ok(snapshot)
    }
}

/// The saved falling piece, provided every cell lies on the grid
fn checked_piece(active: ActiveSnapshot) -> Result<FallingPiece, SnapshotError> {
    let (x, y) = (i64::from(active.x), i64::from(active.y));
    if !(-ANCHOR_MARGIN..=WIDTH as i64 + ANCHOR_MARGIN).contains(&x) {
        return Err(SnapshotError::OutOfRange { field: "falling x", value: x });
    }
    if !(-ANCHOR_MARGIN..=HEIGHT as i64 + ANCHOR_MARGIN).contains(&y) {
        return Err(SnapshotError::OutOfRange { field: "falling y", value: y });
    }

    let piece = FallingPiece::from(active);
    for (cx, cy) in piece.cells() {
        if !(0..WIDTH as i8).contains(&cx) {
            return Err(SnapshotError::OutOfRange { field: "falling x", value: x });
        }
        if !(0..HEIGHT as i8).contains(&cy) {
            return Err(SnapshotError::OutOfRange { field: "falling y", value: y });
        }
    }
    Ok(piece)
}

fn cell_code(cell: Cell) -> u8 {
    cell.map_or(EMPTY_CELL, |t| t.index())
}

/// Cursor over the integers of a save file
struct Tokens<'a> {
    inner: SplitAsciiWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            inner: input.split_ascii_whitespace(),
        }
    }

    fn word(&mut self, field: &'static str) -> Result<&'a str, SnapshotError> {
        self.inner
            .next()
            .ok_or(SnapshotError::UnexpectedEof { field })
    }

    fn int(&mut self, field: &'static str) -> Result<i64, SnapshotError> {
        let word = self.word(field)?;
        word.parse().map_err(|_| SnapshotError::InvalidInteger {
            field,
            value: word.to_owned(),
        })
    }

    /// An integer in `min..=max`, converted to the target type
    fn ranged<T: TryFrom<i64>>(
        &mut self,
        field: &'static str,
        min: i64,
        max: i64,
    ) -> Result<T, SnapshotError> {
        let value = self.int(field)?;
        if !(min..=max).contains(&value) {
            return Err(SnapshotError::OutOfRange { field, value });
        }
        T::try_from(value).map_err(|_| SnapshotError::OutOfRange { field, value })
    }

    fn flag(&mut self, field: &'static str) -> Result<bool, SnapshotError> {
        Ok(self.ranged::<u8>(field, 0, 1)? == 1)
    }

    fn cell(&mut self, field: &'static str) -> Result<Cell, SnapshotError> {
        let code: u8 = self.ranged(field, 0, i64::from(EMPTY_CELL))?;
        Ok(Tetromino::from_index(code))
    }

    fn tetromino(&mut self, field: &'static str) -> Result<Tetromino, SnapshotError> {
        let code: u8 = self.ranged(field, 0, i64::from(EMPTY_CELL) - 1)?;
        Tetromino::from_index(code).ok_or(SnapshotError::OutOfRange {
            field,
            value: i64::from(code),
        })
    }
}

impl Playfield {
    /// Detached copy of the complete state
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            active: self.falling_piece.into(),
            holding: self.holding_piece,
            can_swap: self.can_swap,
            upcoming: self.next_queue.upcoming().collect(),
            timers: TimersSnapshot {
                frames_since_drop: self.frames_since_drop,
                lock_delay_frames: self.lock_delay_frames,
                lock_delay_resets: self.lock_delay_resets,
                frames_pressed: self.frames_pressed,
            },
            combo: self.combo,
            b2b: self.b2b,
            has_lost: self.has_lost,
            score: self.score,
            last_move_rotation: self.last_move_rotation,
            message: self.message,
        }
    }

    /// Put every piece of state back from `snapshot`
    ///
    /// The queue keeps this playfield's generator. Fails without touching
    /// anything if the snapshot holds more upcoming pieces than a queue can, or
    /// if the falling piece does not lie on the grid.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let falling_piece = checked_piece(snapshot.active)?;
        let mut queue = self.next_queue.clone();
        if !queue.set_upcoming(&snapshot.upcoming) {
            return Err(SnapshotError::OutOfRange {
                field: "upcoming count",
                value: snapshot.upcoming.len() as i64,
            });
        }

        self.grid = snapshot.grid.clone();
        self.next_queue = queue;
        self.falling_piece = falling_piece;
        self.holding_piece = snapshot.holding;
        self.can_swap = snapshot.can_swap;
        self.frames_since_drop = snapshot.timers.frames_since_drop;
        self.lock_delay_frames = snapshot.timers.lock_delay_frames;
        self.lock_delay_resets = snapshot.timers.lock_delay_resets;
        self.frames_pressed = snapshot.timers.frames_pressed;
        self.combo = snapshot.combo;
        self.b2b = snapshot.b2b;
        self.has_lost = snapshot.has_lost;
        self.score = snapshot.score;
        self.last_move_rotation = snapshot.last_move_rotation;
        self.message = snapshot.message;
        self.last_lock = None;
        Ok(())
    }
}

impl From<&Playfield> for Snapshot {
    fn from(value: &Playfield) -> Self {
        value.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::InputFrame;
    use crate::settings::HandlingSettings;

    fn played(seed: u64, drops: usize) -> Playfield {
        let mut field = Playfield::with_seed(seed);
        let settings = HandlingSettings::default();
        let mut step = InputFrame::idle();
        for i in 0..drops {
            step.left = i % 3 == 0;
            step.clockwise = i % 2 == 0;
            field.update(&step, &settings);
            field.update(
                &InputFrame {
                    hard_drop: true,
                    ..InputFrame::idle()
                },
                &settings,
            );
        }
        field.holding_piece = Some(Tetromino::Z);
        field
    }

    #[test]
    fn test_save_text_restores_same_state() {
        let field = played(7, 6);
        let snapshot = field.snapshot();
        let text = snapshot.to_save_string().unwrap();
        assert!(text.starts_with("raytris 1\n"));

        let parsed = Snapshot::read_from(&text).unwrap();
        assert_eq!(parsed, snapshot);

        let mut other = Playfield::with_seed(99);
        other.restore(&parsed).unwrap();
        assert_eq!(other.snapshot(), snapshot);
        assert_eq!(other.next_pieces(), field.next_pieces());
    }

    #[test]
    fn test_restored_field_plays_identically() {
        let mut field = played(3, 4);
        let mut copy = Playfield::with_seed(3);
        copy.restore(&field.snapshot()).unwrap();

        let settings = HandlingSettings::default();
        let drop = InputFrame {
            hard_drop: true,
            ..InputFrame::idle()
        };
        // The saved buffer covers at least the next five pieces.
        for _ in 0..5 {
            field.update(&drop, &settings);
            copy.update(&drop, &settings);
        }
        assert_eq!(field.grid(), copy.grid());
        assert_eq!(field.score(), copy.score());
    }

    #[test]
    fn test_rejects_bad_header_and_version() {
        assert!(matches!(
            Snapshot::read_from("tetris 1"),
            Err(SnapshotError::BadHeader(h)) if h == "tetris"
        ));
        assert!(matches!(
            Snapshot::read_from("raytris 9"),
            Err(SnapshotError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn test_reports_truncation_and_garbage() {
        let text = Playfield::with_seed(1).snapshot().to_save_string().unwrap();

        let truncated = &text[..text.len() / 2];
        assert!(matches!(
            Snapshot::read_from(truncated),
            Err(SnapshotError::UnexpectedEof { .. })
        ));

        let garbage = text.replacen("raytris 1\n7", "raytris 1\nx", 1);
        assert!(matches!(
            Snapshot::read_from(&garbage),
            Err(SnapshotError::InvalidInteger { field: "grid", .. })
        ));

        let out_of_range = text.replacen("raytris 1\n7", "raytris 1\n8", 1);
        assert!(matches!(
            Snapshot::read_from(&out_of_range),
            Err(SnapshotError::OutOfRange { field: "grid", value: 8 })
        ));
    }

    #[test]
    fn test_rejects_falling_piece_off_the_grid() {
        let mut field = Playfield::with_seed(1);
        let mut snapshot = field.snapshot();

        snapshot.active.x = 127;
        let text = snapshot.to_save_string().unwrap();
        assert!(matches!(
            Snapshot::read_from(&text),
            Err(SnapshotError::OutOfRange { field: "falling x", value: 127 })
        ));
        assert!(matches!(
            field.restore(&snapshot),
            Err(SnapshotError::OutOfRange { field: "falling x", value: 127 })
        ));

        // Inside the anchor band but with cells past the floor.
        snapshot.active.x = 4;
        snapshot.active.y = HEIGHT as i8 + 1;
        let text = snapshot.to_save_string().unwrap();
        let parsed = Snapshot::read_from(&text).unwrap();
        assert!(field.restore(&parsed).is_err());

        // Nothing was installed, so the field still ticks normally.
        let settings = HandlingSettings::default();
        for _ in 0..3 {
            field.update(&InputFrame::idle(), &settings);
        }
        assert_eq!(field.falling_piece().x, 4);
        assert!(field.grid().fits(field.falling_piece()));
    }

    #[test]
    fn test_restore_rejects_oversized_queue() {
        let mut field = Playfield::with_seed(1);
        let mut snapshot = field.snapshot();
        snapshot.upcoming = vec![Tetromino::I; MAX_QUEUE_SIZE + 1];
        snapshot.score = 1234;
        assert!(field.restore(&snapshot).is_err());
        assert_eq!(field.score(), 0);
    }
}
