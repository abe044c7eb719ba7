//! Controller module - the engine's view of player input
//!
//! The engine never reads devices. Each frame it asks a [`Controller`] fourteen
//! yes/no questions. Most are edge-triggered ("was this pressed this frame");
//! `left_das`, `right_das` and `soft_drop` are level-triggered ("is it held").

/// Per-frame input capability set
pub trait Controller {
    fn restart(&self) -> bool;
    fn swap(&self) -> bool;
    fn left(&self) -> bool;
    fn right(&self) -> bool;
    /// Left is being held (drives auto-shift)
    fn left_das(&self) -> bool;
    /// Right is being held (drives auto-shift)
    fn right_das(&self) -> bool;
    fn clockwise(&self) -> bool;
    fn counter_clockwise(&self) -> bool;
    fn one_eighty(&self) -> bool;
    fn hard_drop(&self) -> bool;
    /// Soft drop is being held
    fn soft_drop(&self) -> bool;
    fn undo(&self) -> bool;
    fn pause(&self) -> bool;
    fn quit(&self) -> bool;
}

/// A plain snapshot of one frame's input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputFrame {
    pub restart: bool,
    pub swap: bool,
    pub left: bool,
    pub right: bool,
    pub left_das: bool,
    pub right_das: bool,
    pub clockwise: bool,
    pub counter_clockwise: bool,
    pub one_eighty: bool,
    pub hard_drop: bool,
    pub soft_drop: bool,
    pub undo: bool,
    pub pause: bool,
    pub quit: bool,
}

impl InputFrame {
    /// A frame with nothing pressed
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

impl Controller for InputFrame {
    fn restart(&self) -> bool {
        self.restart
    }

    fn swap(&self) -> bool {
        self.swap
    }

    fn left(&self) -> bool {
        self.left
    }

    fn right(&self) -> bool {
        self.right
    }

    fn left_das(&self) -> bool {
        self.left_das
    }

    fn right_das(&self) -> bool {
        self.right_das
    }

    fn clockwise(&self) -> bool {
        self.clockwise
    }

    fn counter_clockwise(&self) -> bool {
        self.counter_clockwise
    }

    fn one_eighty(&self) -> bool {
        self.one_eighty
    }

    fn hard_drop(&self) -> bool {
        self.hard_drop
    }

    fn soft_drop(&self) -> bool {
        self.soft_drop
    }

    fn undo(&self) -> bool {
        self.undo
    }

    fn pause(&self) -> bool {
        self.pause
    }

    fn quit(&self) -> bool {
        self.quit
    }
}
