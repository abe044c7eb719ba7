//! Key mapping from terminal events to playfield bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Everything a key can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Binding {
    Left,
    Right,
    SoftDrop,
    HardDrop,
    Clockwise,
    CounterClockwise,
    OneEighty,
    Swap,
    Restart,
    Undo,
    Pause,
    Quit,
}

impl Binding {
    /// Bindings whose held state matters, not just the press
    pub fn is_held(&self) -> bool {
        matches!(self, Binding::Left | Binding::Right | Binding::SoftDrop)
    }
}

/// Map a key event to its binding.
pub fn binding_for(key: KeyEvent) -> Option<Binding> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Binding::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Left => Some(Binding::Left),
        KeyCode::Right => Some(Binding::Right),
        KeyCode::Down => Some(Binding::SoftDrop),
        KeyCode::Char(' ') => Some(Binding::HardDrop),

        // Rotation
        KeyCode::Up => Some(Binding::Clockwise),
        KeyCode::Char('z') | KeyCode::Char('Z') => Some(Binding::CounterClockwise),
        KeyCode::Char('a') | KeyCode::Char('A') => Some(Binding::OneEighty),

        KeyCode::Char('c') | KeyCode::Char('C') => Some(Binding::Swap),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Binding::Restart),
        KeyCode::Char('u') | KeyCode::Char('U') => Some(Binding::Undo),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Binding::Pause),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Binding::Quit),

        _ => None,
    }
}
