//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the game rules, the playfield state machine and the
//! single-player session around it. It never touches a terminal or any other
//! device: input arrives through the [`Controller`] trait and everything else is
//! read from the returned state.
//!
//! # Module Structure
//!
//! - [`piece`]: falling piece geometry and SRS offset tables
//! - [`board`]: 10x40 grid with collision queries and line clearing
//! - [`next_queue`]: 7-bag generator with a five piece lookahead
//! - [`scoring`]: line clear, spin, combo, back-to-back and all clear points
//! - [`playfield`]: the per-frame state machine (shifts, DAS, kicks, gravity, lock delay, hold)
//! - [`snapshot`]: detached playfield copies and the save file format
//! - [`session`]: pause, quit and undo for a single player
//! - [`controller`] / [`settings`]: what the host feeds into every frame
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every run of seven pieces holds one of each kind
//! - **SRS Rotation**: offset-table kicks, five candidates per rotation, 180 included
//! - **Lock Delay**: frame counted, with a cap on grounded moves and rotations
//! - **Hold**: once per piece
//! - **T-Spin Detection**: three-corner rule, mini vs proper by the front corners
//! - **Loss**: a piece locks entirely above the visible window, or the next one cannot spawn
//!
//! # Example
//!
//! ```
//! use raytris_core::{HandlingSettings, InputFrame, Playfield};
//!
//! let mut field = Playfield::with_seed(12345);
//! let settings = HandlingSettings::default();
//!
//! let drop = InputFrame { hard_drop: true, ..InputFrame::idle() };
//! assert!(field.update(&drop, &settings));
//! assert!(field.score() > 0); // Hard drop awards points
//! ```
//!
//! # Timing
//!
//! Everything is counted in frames. The host calls
//! [`Playfield::update`](playfield::Playfield::update) at a fixed rate (60 Hz in the
//! terminal runner); gravity, soft drop, lock delay and DAS are all frame counts in
//! [`HandlingSettings`].

pub mod board;
pub mod controller;
pub mod error;
pub mod next_queue;
pub mod piece;
pub mod playfield;
pub mod scoring;
pub mod session;
pub mod settings;
pub mod snapshot;

pub use raytris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use controller::{Controller, InputFrame};
pub use error::{SettingsError, SnapshotError};
pub use next_queue::NextQueue;
pub use piece::FallingPiece;
pub use playfield::{LineClearMessage, LockEvent, Playfield};
pub use scoring::{clear_score, hard_drop_score, ScoreResult};
pub use session::{Session, SessionStatus};
pub use settings::HandlingSettings;
pub use snapshot::Snapshot;
