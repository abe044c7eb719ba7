//! Session module - a single-player game around one playfield
//!
//! Adds what a player needs on top of the rules: pausing, quitting, and undoing
//! back to the moment a previous piece locked.

use std::collections::VecDeque;

use tracing::debug;

use crate::controller::Controller;
use crate::playfield::Playfield;
use crate::settings::HandlingSettings;
use crate::snapshot::Snapshot;

/// Most lock snapshots kept for undo; the oldest are discarded first
pub const UNDO_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Quit,
}

#[derive(Debug, Clone)]
pub struct Session {
    playfield: Playfield,
    paused: bool,
    /// Playfield states right after each lock; never empty
    undo_stack: VecDeque<Snapshot>,
}

impl Session {
    pub fn new(playfield: Playfield) -> Self {
        let mut undo_stack = VecDeque::with_capacity(UNDO_CAPACITY);
        undo_stack.push_back(playfield.snapshot());
        Self {
            playfield,
            paused: false,
            undo_stack,
        }
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn playfield_mut(&mut self) -> &mut Playfield {
        &mut self.playfield
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Handle one frame of input
    pub fn update<C: Controller + ?Sized>(
        &mut self,
        controller: &C,
        settings: &HandlingSettings,
    ) -> SessionStatus {
        if controller.quit() && (self.paused || self.playfield.lost()) {
            return SessionStatus::Quit;
        }

        if controller.pause() && !self.playfield.lost() {
            self.paused = !self.paused;
            debug!(paused = self.paused, "pause toggled");
        }

        if controller.undo() {
            self.undo();
            return SessionStatus::Running;
        }

        if self.paused {
            return SessionStatus::Running;
        }

        if self.playfield.update(controller, settings) {
            self.push_undo();
        }
        SessionStatus::Running
    }

    /// Go back to the most recent lock
    ///
    /// The bottom entry is restored but kept, so repeated undo stops there.
    pub fn undo(&mut self) {
        let Some(snapshot) = self.undo_stack.pop_back() else {
            return;
        };
        if self.undo_stack.is_empty() {
            self.undo_stack.push_back(snapshot.clone());
        }

        match self.playfield.restore(&snapshot) {
            Ok(()) => debug!(depth = self.undo_stack.len(), "undo"),
            Err(e) => debug!(error = %e, "undo snapshot rejected"),
        }
    }

    fn push_undo(&mut self) {
        if self.undo_stack.len() == UNDO_CAPACITY {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(self.playfield.snapshot());
    }

    pub fn into_playfield(self) -> Playfield {
        self.playfield
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::InputFrame;

    fn input(f: impl FnOnce(&mut InputFrame)) -> InputFrame {
        let mut frame = InputFrame::idle();
        f(&mut frame);
        frame
    }

    #[test]
    fn test_quit_only_when_paused_or_lost() {
        let settings = HandlingSettings::default();
        let mut session = Session::new(Playfield::with_seed(1));
        let quit = input(|f| f.quit = true);

        assert_eq!(session.update(&quit, &settings), SessionStatus::Running);

        session.update(&input(|f| f.pause = true), &settings);
        assert!(session.is_paused());
        assert_eq!(session.update(&quit, &settings), SessionStatus::Quit);
    }

    #[test]
    fn test_paused_session_freezes_playfield() {
        let settings = HandlingSettings::default();
        let mut session = Session::new(Playfield::with_seed(1));
        session.update(&input(|f| f.pause = true), &settings);

        let before = *session.playfield().falling_piece();
        for _ in 0..100 {
            session.update(&InputFrame::idle(), &settings);
        }
        assert_eq!(*session.playfield().falling_piece(), before);

        session.update(&input(|f| f.pause = true), &settings);
        assert!(!session.is_paused());
    }

    #[test]
    fn test_undo_returns_to_previous_lock() {
        let settings = HandlingSettings::default();
        let mut session = Session::new(Playfield::with_seed(2));
        let drop = input(|f| f.hard_drop = true);

        session.update(&drop, &settings);
        let after_first = session.playfield().snapshot();
        session.update(&drop, &settings);
        assert_eq!(session.undo_depth(), 3);

        // First undo lands on the state right after the second lock.
        session.update(&input(|f| f.undo = true), &settings);
        session.update(&input(|f| f.undo = true), &settings);
        assert_eq!(session.playfield().snapshot(), after_first);
    }

    #[test]
    fn test_undo_stack_never_empties() {
        let settings = HandlingSettings::default();
        let initial = Playfield::with_seed(4);
        let expected = initial.snapshot();
        let mut session = Session::new(initial);

        for _ in 0..5 {
            session.update(&input(|f| f.undo = true), &settings);
            assert_eq!(session.undo_depth(), 1);
        }
        assert_eq!(session.playfield().snapshot(), expected);
    }

    #[test]
    fn test_undo_stack_is_bounded() {
        let settings = HandlingSettings::default();
        let mut session = Session::new(Playfield::with_seed(4));
        let drop = input(|f| f.hard_drop = true);
        let restart = input(|f| f.restart = true);

        for _ in 0..UNDO_CAPACITY + 20 {
            if session.playfield().lost() {
                session.update(&restart, &settings);
            }
            session.update(&drop, &settings);
        }
        assert_eq!(session.undo_depth(), UNDO_CAPACITY);
    }
}
