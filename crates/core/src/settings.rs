//! Handling settings - the per-player timing configuration passed into every tick
//!
//! Settings are plain data. They can be read from a JSON file, overridden from the
//! environment and clamped to the ranges the settings menu allows.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::types::{
    DEFAULT_DAS_FRAMES, DEFAULT_GRAVITY_FRAMES, DEFAULT_LOCK_DELAY_FRAMES,
    DEFAULT_LOCK_DELAY_RESETS, DEFAULT_SOFT_DROP_FRAMES, MAX_TUNABLE_FRAMES,
};

/// Frame-based handling configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlingSettings {
    /// Frames between automatic falls
    pub gravity_frames: u32,
    /// Frames between falls while soft drop is held
    pub soft_drop_frames: u32,
    /// Grounded frames before the piece locks
    pub max_lock_delay_frames: u32,
    /// Moves or rotations allowed while grounded before the piece locks
    pub max_lock_delay_resets: u32,
    /// Frames a direction must be held before auto-shift starts
    pub das: u32,
}

impl Default for HandlingSettings {
    fn default() -> Self {
        Self {
            gravity_frames: DEFAULT_GRAVITY_FRAMES,
            soft_drop_frames: DEFAULT_SOFT_DROP_FRAMES,
            max_lock_delay_frames: DEFAULT_LOCK_DELAY_FRAMES,
            max_lock_delay_resets: DEFAULT_LOCK_DELAY_RESETS,
            das: DEFAULT_DAS_FRAMES,
        }
    }
}

impl HandlingSettings {
    /// Defaults with environment overrides applied
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Override fields from `RAYTRIS_*` variables; unparsable values are ignored
    pub fn with_env_overrides(self) -> Self {
        fn var(name: &str) -> Option<u32> {
            std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
        }

        Self {
            gravity_frames: var("RAYTRIS_GRAVITY_FRAMES").unwrap_or(self.gravity_frames),
            soft_drop_frames: var("RAYTRIS_SOFT_DROP_FRAMES").unwrap_or(self.soft_drop_frames),
            max_lock_delay_frames: var("RAYTRIS_LOCK_DELAY_FRAMES")
                .unwrap_or(self.max_lock_delay_frames),
            max_lock_delay_resets: var("RAYTRIS_LOCK_DELAY_RESETS")
                .unwrap_or(self.max_lock_delay_resets),
            das: var("RAYTRIS_DAS").unwrap_or(self.das),
        }
    }

    /// Keep values inside the ranges the settings menu exposes
    pub fn clamped(self) -> Self {
        Self {
            gravity_frames: self.gravity_frames.max(1),
            soft_drop_frames: self.soft_drop_frames.min(MAX_TUNABLE_FRAMES),
            das: self.das.min(MAX_TUNABLE_FRAMES),
            ..self
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
