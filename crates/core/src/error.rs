//! Error types for the fallible edges of the engine (save data and settings)

use thiserror::Error;

/// Failure while reading or writing a playfield snapshot
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a save file (header {0:?})")]
    BadHeader(String),

    #[error("save data ended early while reading {field}")]
    UnexpectedEof { field: &'static str },

    #[error("malformed integer {value:?} for {field}")]
    InvalidInteger { field: &'static str, value: String },

    #[error("value {value} out of range for {field}")]
    OutOfRange { field: &'static str, value: i64 },

    #[error("unsupported save format version {0}")]
    UnsupportedVersion(i64),
}

/// Failure while loading or saving handling settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}
