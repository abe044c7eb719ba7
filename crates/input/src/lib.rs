//! Terminal input module (engine-facing).
//!
//! This module is independent of any renderer. It maps `crossterm` key events
//! into [`Binding`]s and folds them into one [`core::InputFrame`] per frame,
//! suitable for terminal environments (including terminals without key-release
//! events).

pub mod keyboard;
pub mod map;

pub use raytris_core as core;

pub use keyboard::KeyboardController;
pub use map::{binding_for, Binding};
