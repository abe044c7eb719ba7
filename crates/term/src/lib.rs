//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal play. It renders into a
//! plain framebuffer that is then flushed to the terminal.
//!
//! - [`game_view`] is pure and maps a session into glyphs (2 columns per cell)
//! - [`renderer`] owns the terminal and writes only what changed

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use raytris_core as core;
pub use raytris_core::types;

pub use fb::{FrameBuffer, Glyph, Rgb, Style, Weight};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, visit_changed_runs, TerminalRenderer};
