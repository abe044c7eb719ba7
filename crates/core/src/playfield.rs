//! Playfield module - the per-frame game state machine
//!
//! A [`Playfield`] owns the grid, the falling piece, the hold slot, the next queue
//! and every timer and counter. The host calls [`Playfield::update`] once per frame
//! with the current [`Controller`] and [`HandlingSettings`]; the return value says
//! whether a piece locked during that frame (hosts use it to push undo snapshots).
//!
//! Illegal moves are never errors: a shift or rotation that does not fit is simply
//! declined and the piece stays exactly as it was. Losing is a terminal state that
//! only an explicit restart leaves.

use tracing::{debug, info, trace};

use crate::board::Board;
use crate::controller::Controller;
use crate::next_queue::NextQueue;
use crate::piece::FallingPiece;
use crate::scoring;
use crate::settings::HandlingSettings;
use crate::types::*;

/// Announcement of the most recent clear, counted down once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineClearMessage {
    pub kind: MessageType,
    /// Frames left on screen
    pub timer: u8,
    pub spin: SpinType,
}

impl LineClearMessage {
    pub fn new(kind: MessageType, spin: SpinType) -> Self {
        Self {
            kind,
            timer: MESSAGE_DURATION,
            spin,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.timer > 0
    }
}

/// What happened when the last piece locked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockEvent {
    pub tetromino: Tetromino,
    pub lines_cleared: usize,
    pub spin: SpinType,
    /// Points from the clear itself (spin, combo, b2b and all clear), drop points excluded
    pub clear_score: u32,
    pub combo: u32,
    pub b2b: u32,
    pub all_clear: bool,
    pub topped_out: bool,
}

/// Diagonal neighbours of the T centre; the first two face the nub in `Up`
const T_CORNERS: [CoordinatePair; 4] = [
    CoordinatePair::new(-1, -1),
    CoordinatePair::new(1, -1),
    CoordinatePair::new(1, 1),
    CoordinatePair::new(-1, 1),
];

/// Complete single-player board state
#[derive(Debug, Clone)]
pub struct Playfield {
    pub(crate) grid: Board,
    pub(crate) next_queue: NextQueue,
    pub(crate) falling_piece: FallingPiece,
    pub(crate) holding_piece: Option<Tetromino>,
    pub(crate) can_swap: bool,
    pub(crate) frames_since_drop: u32,
    pub(crate) lock_delay_frames: u32,
    pub(crate) lock_delay_resets: u32,
    /// Positive while left is held, negative while right is held
    pub(crate) frames_pressed: i32,
    pub(crate) combo: u32,
    pub(crate) b2b: u32,
    pub(crate) has_lost: bool,
    pub(crate) score: u64,
    pub(crate) last_move_rotation: bool,
    pub(crate) message: LineClearMessage,
    pub(crate) last_lock: Option<LockEvent>,
}

impl Playfield {
    /// Fresh board with a queue seeded from system entropy
    pub fn new() -> Self {
        Self::from_queue(NextQueue::new())
    }

    /// Fresh board with a reproducible piece sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::from_queue(NextQueue::with_seed(seed))
    }

    /// Fresh board dealing from `queue`; the first piece is drawn immediately
    pub fn from_queue(mut queue: NextQueue) -> Self {
        let first = queue.next_tetromino();
        Self {
            grid: Board::new(),
            next_queue: queue,
            falling_piece: FallingPiece::spawn(first),
            holding_piece: None,
            can_swap: true,
            frames_since_drop: 0,
            lock_delay_frames: 0,
            lock_delay_resets: 0,
            frames_pressed: 0,
            combo: 0,
            b2b: 0,
            has_lost: false,
            score: 0,
            last_move_rotation: false,
            message: LineClearMessage::default(),
            last_lock: None,
        }
    }

    pub fn lost(&self) -> bool {
        self.has_lost
    }

    /// Start over on an empty board
    ///
    /// Score, combo and back-to-back are reset along with everything else. The
    /// queue keeps its generator but discards its buffered pieces.
    pub fn restart(&mut self) {
        info!(score = self.score, "restarting playfield");
        let mut queue = self.next_queue.clone();
        queue.reset();
        *self = Self::from_queue(queue);
    }

    pub fn grid(&self) -> &Board {
        &self.grid
    }

    pub fn cell(&self, x: i8, y: i8) -> Option<Cell> {
        self.grid.get(x, y)
    }

    pub fn falling_piece(&self) -> &FallingPiece {
        &self.falling_piece
    }

    /// Where the falling piece would come to rest if hard dropped
    pub fn ghost_piece(&self) -> FallingPiece {
        self.landing_position().0
    }

    pub fn next_queue(&self) -> &NextQueue {
        &self.next_queue
    }

    pub fn next_pieces(&self) -> [Tetromino; LOOKAHEAD] {
        self.next_queue.preview()
    }

    pub fn holding_piece(&self) -> Option<Tetromino> {
        self.holding_piece
    }

    pub fn can_swap(&self) -> bool {
        self.can_swap
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn b2b(&self) -> u32 {
        self.b2b
    }

    pub fn message(&self) -> &LineClearMessage {
        &self.message
    }

    pub fn last_lock(&self) -> Option<&LockEvent> {
        self.last_lock.as_ref()
    }

    /// Take and clear the last lock event
    pub fn take_last_lock(&mut self) -> Option<LockEvent> {
        self.last_lock.take()
    }

    /// Advance one frame; returns true iff a piece locked
    pub fn update<C: Controller + ?Sized>(
        &mut self,
        controller: &C,
        settings: &HandlingSettings,
    ) -> bool {
        if controller.restart() {
            self.restart();
            return false;
        }
        if self.has_lost {
            return false;
        }

        if controller.swap() && self.can_swap {
            self.swap();
            if self.has_lost {
                return false;
            }
        }

        self.advance_timers();
        self.next_queue.push_new_bag_if_needed();

        self.handle_shifts(controller, settings);
        self.handle_rotations(controller);
        self.handle_drops(controller, settings)
    }

    fn advance_timers(&mut self) {
        self.frames_since_drop = self.frames_since_drop.saturating_add(1);
        self.lock_delay_frames = self.lock_delay_frames.saturating_add(1);
        if self.message.timer > 0 {
            self.message.timer -= 1;
        }
    }

    fn reset_piece_timers(&mut self) {
        self.frames_since_drop = 0;
        self.lock_delay_frames = 0;
        self.lock_delay_resets = 0;
    }

    /// Put a new piece at the spawn anchor; returns whether it fits
    fn spawn(&mut self, tetromino: Tetromino) -> bool {
        self.falling_piece = FallingPiece::spawn(tetromino);
        self.reset_piece_timers();
        self.last_move_rotation = false;
        self.grid.fits(&self.falling_piece)
    }

    /// Exchange the falling piece with the hold slot
    fn swap(&mut self) {
        let current = self.falling_piece.tetromino;
        let incoming = match self.holding_piece.replace(current) {
            Some(held) => held,
            None => self.next_queue.next_tetromino(),
        };
        self.can_swap = false;

        if !self.spawn(incoming) {
            info!(score = self.score, piece = incoming.as_str(), "swapped piece cannot spawn");
            self.has_lost = true;
        }
    }

    fn handle_shifts<C: Controller + ?Sized>(&mut self, controller: &C, settings: &HandlingSettings) {
        if controller.left() {
            self.try_shift(Shift::Left);
        } else if controller.right() {
            self.try_shift(Shift::Right);
        }

        if controller.left_das() {
            if self.frames_pressed < 0 {
                self.frames_pressed = 0;
            }
            self.frames_pressed = self.frames_pressed.saturating_add(1);
            self.auto_shift(Shift::Left, settings.das);
        } else if controller.right_das() {
            if self.frames_pressed > 0 {
                self.frames_pressed = 0;
            }
            self.frames_pressed = self.frames_pressed.saturating_sub(1);
            self.auto_shift(Shift::Right, settings.das);
        } else {
            self.frames_pressed = 0;
        }
    }

    /// Slide as far as possible once the direction has been held past `das`
    fn auto_shift(&mut self, shift: Shift, das: u32) {
        if self.frames_pressed.unsigned_abs() > das {
            while self.try_shift(shift) {}
        }
    }

    /// Move one column if the destination fits
    fn try_shift(&mut self, shift: Shift) -> bool {
        let candidate = self.falling_piece.shifted(shift);
        if !self.grid.fits(&candidate) {
            return false;
        }

        self.falling_piece = candidate;
        self.lock_delay_frames = 0;
        self.lock_delay_resets = self.lock_delay_resets.saturating_add(1);
        self.last_move_rotation = false;
        true
    }

    fn handle_rotations<C: Controller + ?Sized>(&mut self, controller: &C) {
        if controller.clockwise() {
            self.try_rotate(RotationType::Clockwise);
        } else if controller.counter_clockwise() {
            self.try_rotate(RotationType::CounterClockwise);
        } else if controller.one_eighty() {
            self.try_rotate(RotationType::OneEighty);
        }
    }

    /// Rotate with SRS kicks; the first fitting candidate wins
    fn try_rotate(&mut self, rotation: RotationType) -> bool {
        let rotated = self.falling_piece.rotated(rotation);
        let kicked = self
            .falling_piece
            .kick_candidates(rotation)
            .into_iter()
            .map(|kick| rotated.translated(kick))
            .find(|candidate| self.grid.fits(candidate));

        match kicked {
            Some(piece) => {
                self.falling_piece = piece;
                self.lock_delay_frames = 0;
                self.lock_delay_resets = self.lock_delay_resets.saturating_add(1);
                self.last_move_rotation = true;
                true
            }
            None => {
                trace!(?rotation, piece = rotated.tetromino.as_str(), "rotation rejected");
                false
            }
        }
    }

    /// The falling piece dropped as far as it goes, and how many rows it fell
    fn landing_position(&self) -> (FallingPiece, u32) {
        let mut piece = self.falling_piece;
        let mut rows = 0;
        loop {
            let fallen = piece.fallen();
            if !self.grid.fits(&fallen) {
                return (piece, rows);
            }
            piece = fallen;
            rows += 1;
        }
    }

    fn handle_drops<C: Controller + ?Sized>(
        &mut self,
        controller: &C,
        settings: &HandlingSettings,
    ) -> bool {
        if controller.hard_drop() {
            self.hard_drop();
            return true;
        }

        let mut is_fall_step = false;
        if (controller.soft_drop() && self.frames_since_drop >= settings.soft_drop_frames)
            || self.frames_since_drop >= settings.gravity_frames
        {
            self.frames_since_drop = 0;
            is_fall_step = true;
        }

        let fallen = self.falling_piece.fallen();
        if self.grid.fits(&fallen) {
            if is_fall_step {
                self.falling_piece = fallen;
                self.lock_delay_frames = 0;
                self.lock_delay_resets = 0;
                self.last_move_rotation = false;
            }
            return false;
        }

        if self.lock_delay_frames > settings.max_lock_delay_frames
            || self.lock_delay_resets > settings.max_lock_delay_resets
        {
            self.solidify();
            return true;
        }
        false
    }

    fn hard_drop(&mut self) {
        let (landed, rows) = self.landing_position();
        if rows > 0 {
            self.falling_piece = landed;
            self.last_move_rotation = false;
        }
        self.score += u64::from(scoring::hard_drop_score(rows));
        self.solidify();
    }

    /// 3-corner T-spin classification of the falling piece where it stands
    fn spin_kind(&self, piece: &FallingPiece) -> SpinType {
        if piece.tetromino != Tetromino::T || !self.last_move_rotation {
            return SpinType::None;
        }

        let turns = piece.orientation.index();
        let blocked = |corner: CoordinatePair| {
            let mut c = corner;
            for _ in 0..turns {
                c = CoordinatePair::new(-c.y, c.x);
            }
            self.grid.is_blocked(piece.x + c.x, piece.y + c.y)
        };

        let front = T_CORNERS[..2].iter().filter(|&&c| blocked(c)).count();
        let back = T_CORNERS[2..].iter().filter(|&&c| blocked(c)).count();

        if front + back < 3 {
            SpinType::None
        } else if front == 2 {
            SpinType::Proper
        } else {
            SpinType::Mini
        }
    }

    /// Lock the falling piece, clear lines, score, and deal the next piece
    fn solidify(&mut self) {
        let piece = self.falling_piece;
        let spin = self.spin_kind(&piece);
        let landed_visible = self.grid.place(&piece);

        let lines = self.grid.clear_full_rows().len();
        let mut all_clear = false;
        let mut clear_score = 0;

        if lines > 0 {
            self.combo += 1;
            if scoring::is_difficult(spin, lines) {
                self.b2b += 1;
            } else {
                self.b2b = 0;
            }
            all_clear = self.grid.is_empty();

            let result = scoring::clear_score(spin, lines, self.combo, self.b2b, all_clear);
            clear_score = result.total;

            let kind = if all_clear {
                MessageType::AllClear
            } else {
                MessageType::for_lines(lines)
            };
            self.message = LineClearMessage::new(kind, spin);
        } else {
            self.combo = 0;
            if spin != SpinType::None {
                clear_score = scoring::base_score(spin, 0);
                self.message = LineClearMessage::new(MessageType::None, spin);
            }
        }
        self.score += u64::from(clear_score);

        let next = self.next_queue.next_tetromino();
        let spawned = self.spawn(next);
        self.can_swap = true;
        self.has_lost = !landed_visible || !spawned;

        debug!(
            piece = piece.tetromino.as_str(),
            lines,
            spin = ?spin,
            combo = self.combo,
            b2b = self.b2b,
            score = self.score,
            "piece locked"
        );
        if self.has_lost {
            info!(
                score = self.score,
                landed_visible, spawned, "topped out"
            );
        }

        self.last_lock = Some(LockEvent {
            tetromino: piece.tetromino,
            lines_cleared: lines,
            spin,
            clear_score,
            combo: self.combo,
            b2b: self.b2b,
            all_clear,
            topped_out: self.has_lost,
        });
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new()
    }
}
