//! Raytris (workspace facade crate).
//!
//! Exposes `raytris::{core,input,term,types}` while the implementation lives in
//! dedicated crates under `crates/`.

pub use raytris_core as core;
pub use raytris_input as input;
pub use raytris_term as term;
pub use raytris_types as types;
