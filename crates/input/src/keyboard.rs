//! Keyboard controller for terminal environments.
//!
//! Collects key events between frames and turns them into one [`InputFrame`] per
//! frame. Presses become edge-triggered flags; left, right and soft drop also
//! stay held until released.
//!
//! Supports terminals that do not emit key release events by using a timeout.

use std::time::{Duration, Instant};

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::core::InputFrame;
use crate::map::{binding_for, Binding};

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers auto-shift.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 150;

/// When a held key was last reported
#[derive(Debug, Clone, Copy, Default)]
struct HeldKey {
    last_seen: Option<Instant>,
}

impl HeldKey {
    /// Returns true on the transition from released to held
    fn press(&mut self, now: Instant) -> bool {
        let fresh = self.last_seen.is_none();
        self.last_seen = Some(now);
        fresh
    }

    fn refresh(&mut self, now: Instant) {
        if self.last_seen.is_some() {
            self.last_seen = Some(now);
        }
    }

    fn release(&mut self) {
        self.last_seen = None;
    }

    fn expire(&mut self, now: Instant, timeout: Duration) {
        if let Some(seen) = self.last_seen {
            if now.saturating_duration_since(seen) > timeout {
                self.last_seen = None;
            }
        }
    }

    fn is_held(&self) -> bool {
        self.last_seen.is_some()
    }
}

/// Tracks terminal key state and produces per-frame input.
#[derive(Debug, Clone)]
pub struct KeyboardController {
    pending: InputFrame,
    left: HeldKey,
    right: HeldKey,
    down: HeldKey,
    key_release_timeout: Duration,
}

impl KeyboardController {
    pub fn new() -> Self {
        Self {
            pending: InputFrame::idle(),
            left: HeldKey::default(),
            right: HeldKey::default(),
            down: HeldKey::default(),
            key_release_timeout: Duration::from_millis(DEFAULT_KEY_RELEASE_TIMEOUT_MS),
        }
    }

    pub fn with_key_release_timeout(mut self, timeout: Duration) -> Self {
        self.key_release_timeout = timeout;
        self
    }

    pub fn key_release_timeout(&self) -> Duration {
        self.key_release_timeout
    }

    /// Feed one terminal key event
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(binding) = binding_for(key) else {
            return;
        };

        match key.kind {
            KeyEventKind::Press => self.press(binding, now),
            KeyEventKind::Repeat => {
                if let Some(held) = self.held_key(binding) {
                    held.refresh(now);
                }
            }
            KeyEventKind::Release => {
                if let Some(held) = self.held_key(binding) {
                    held.release();
                }
            }
        }
    }

    fn held_key(&mut self, binding: Binding) -> Option<&mut HeldKey> {
        match binding {
            Binding::Left => Some(&mut self.left),
            Binding::Right => Some(&mut self.right),
            Binding::SoftDrop => Some(&mut self.down),
            _ => None,
        }
    }

    fn press(&mut self, binding: Binding, now: Instant) {
        let p = &mut self.pending;
        match binding {
            Binding::Left => {
                self.right.release();
                if self.left.press(now) {
                    p.left = true;
                }
            }
            Binding::Right => {
                self.left.release();
                if self.right.press(now) {
                    p.right = true;
                }
            }
            Binding::SoftDrop => {
                self.down.press(now);
                p.soft_drop = true;
            }
            Binding::HardDrop => p.hard_drop = true,
            Binding::Clockwise => p.clockwise = true,
            Binding::CounterClockwise => p.counter_clockwise = true,
            Binding::OneEighty => p.one_eighty = true,
            Binding::Swap => p.swap = true,
            Binding::Restart => p.restart = true,
            Binding::Undo => p.undo = true,
            Binding::Pause => p.pause = true,
            Binding::Quit => p.quit = true,
        }
    }

    /// Input for the frame starting at `now`; clears the collected presses
    pub fn frame(&mut self, now: Instant) -> InputFrame {
        let timeout = self.key_release_timeout;
        self.left.expire(now, timeout);
        self.right.expire(now, timeout);
        self.down.expire(now, timeout);

        let mut frame = std::mem::take(&mut self.pending);
        frame.left_das = self.left.is_held();
        frame.right_das = self.right.is_held();
        frame.soft_drop |= self.down.is_held();
        frame
    }
}

impl Default for KeyboardController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)
    }

    #[test]
    fn test_press_is_edge_triggered() {
        let mut kb = KeyboardController::new();
        let t0 = Instant::now();
        kb.handle_key(key(KeyCode::Char(' '), KeyEventKind::Press), t0);

        assert!(kb.frame(t0).hard_drop);
        assert!(!kb.frame(t0).hard_drop);
    }

    #[test]
    fn test_held_left_reports_das_until_release() {
        let mut kb = KeyboardController::new();
        let t0 = Instant::now();
        kb.handle_key(key(KeyCode::Left, KeyEventKind::Press), t0);

        let first = kb.frame(t0);
        assert!(first.left && first.left_das);

        // A second press while held is not a new tap.
        kb.handle_key(key(KeyCode::Left, KeyEventKind::Press), t0);
        let second = kb.frame(t0);
        assert!(!second.left && second.left_das);

        kb.handle_key(key(KeyCode::Left, KeyEventKind::Release), t0);
        assert!(!kb.frame(t0).left_das);
    }

    #[test]
    fn test_opposite_direction_replaces_held() {
        let mut kb = KeyboardController::new();
        let t0 = Instant::now();
        kb.handle_key(key(KeyCode::Left, KeyEventKind::Press), t0);
        kb.handle_key(key(KeyCode::Right, KeyEventKind::Press), t0);

        let frame = kb.frame(t0);
        assert!(frame.right && frame.right_das);
        assert!(!frame.left_das);
    }

    #[test]
    fn test_release_timeout_expires_held_keys() {
        let mut kb =
            KeyboardController::new().with_key_release_timeout(Duration::from_millis(100));
        let t0 = Instant::now();
        kb.handle_key(key(KeyCode::Down, KeyEventKind::Press), t0);
        assert!(kb.frame(t0 + Duration::from_millis(50)).soft_drop);

        // Repeats keep it alive.
        kb.handle_key(
            key(KeyCode::Down, KeyEventKind::Repeat),
            t0 + Duration::from_millis(90),
        );
        assert!(kb.frame(t0 + Duration::from_millis(150)).soft_drop);
        assert!(!kb.frame(t0 + Duration::from_millis(300)).soft_drop);
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        let mut kb = KeyboardController::new();
        let t0 = Instant::now();
        kb.handle_key(key(KeyCode::Char('x'), KeyEventKind::Press), t0);
        assert!(kb.frame(t0).is_idle());
    }
}
