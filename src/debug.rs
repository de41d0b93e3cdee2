//! Hidden debug mode.
//!
//! Enabled by the `FLAGGED_IT_DEBUG=true` environment variable, a `.debug_mode`
//! marker file in the working directory, a `-v` argument, or seven quick clicks
//! on the dashboard title.

use std::time::Duration;

use bevy::log::{info, warn};
use bevy::prelude::*;

use crate::persistence::StorageError;

pub struct DebugPlugin;
impl Plugin for DebugPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(DebugMode::detect());
    }
}

pub const DEBUG_ENV: &str = "FLAGGED_IT_DEBUG";
pub const DEBUG_FILE: &str = ".debug_mode";
pub const DEBUG_ARG: &str = "-v";
const SECRET_CLICKS: u32 = 7;
const SECRET_CLICK_GAP: Duration = Duration::from_secs(2);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugSource {
    Environment,
    MarkerFile,
    Argument,
    SecretClicks,
}
impl DebugSource {
    pub fn describe(self) -> &'static str {
        match self {
            DebugSource::Environment => "FLAGGED_IT_DEBUG environment variable",
            DebugSource::MarkerFile => ".debug_mode marker",
            DebugSource::Argument => "-v command line argument",
            DebugSource::SecretClicks => "secret title clicks",
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct DebugMode {
    source: Option<DebugSource>,
    clicks: u32,
    last_click: Option<Duration>,
}

impl DebugMode {
    fn detect() -> Self {
        let env = std::env::var(DEBUG_ENV).ok();
        let args: Vec<String> = std::env::args().collect();
        let mode = Self::from_sources(env.as_deref(), marker::exists(), &args);
        if let Some(source) = mode.source {
            info!("Debug mode enabled by {}", source.describe());
        }
        mode
    }

    pub fn from_sources(env: Option<&str>, marker_exists: bool, args: &[String]) -> Self {
        let source = if env == Some("true") {
            Some(DebugSource::Environment)
        } else if marker_exists {
            Some(DebugSource::MarkerFile)
        } else if args.iter().any(|a| a == DEBUG_ARG) {
            Some(DebugSource::Argument)
        } else {
            None
        };
        Self { source, ..default() }
    }

    pub fn is_enabled(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<DebugSource> {
        self.source
    }

    pub fn click_count(&self) -> u32 {
        self.clicks
    }

    /// Counts a title click at time `now`. Returns true when this click
    /// unlocks debug mode.
    pub fn register_click(&mut self, now: Duration) -> bool {
        if self.last_click.is_some_and(|last| now.saturating_sub(last) > SECRET_CLICK_GAP) {
            self.clicks = 0;
        }
        self.clicks += 1;
        self.last_click = Some(now);

        if self.clicks < SECRET_CLICKS {
            return false;
        }
        self.clicks = 0;
        if self.source.is_none() {
            self.source = Some(DebugSource::SecretClicks);
            info!("Debug mode unlocked");
        }
        true
    }

    /// Writes the marker so debug mode survives a restart.
    pub fn persist(&self) -> Result<(), StorageError> {
        marker::create()
    }

    /// Turns debug mode off for this run and removes the marker.
    pub fn disable(&mut self) {
        self.source = None;
        self.clicks = 0;
        if let Err(e) = marker::remove() {
            warn!("Failed to remove debug marker: {}", e);
        }
    }

    pub fn marker_exists(&self) -> bool {
        marker::exists()
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod marker {
    use std::path::Path;

    use super::DEBUG_FILE;
    use crate::persistence::{self, Slot, StorageError};

    /// The marker lives in the working directory, not the config directory.
    const SLOT: Slot = Slot { file: DEBUG_FILE, key: "debug_mode" };
    const WORKING_DIR: &str = ".";

    pub fn exists() -> bool {
        Path::new(WORKING_DIR).join(SLOT.file).exists()
    }

    pub fn create() -> Result<(), StorageError> {
        persistence::write_in(Path::new(WORKING_DIR), SLOT, "debug_enabled")
    }

    pub fn remove() -> Result<(), StorageError> {
        persistence::remove_in(Path::new(WORKING_DIR), SLOT)
    }
}

#[cfg(target_arch = "wasm32")]
mod marker {
    use crate::persistence::{self, Slot, StorageError};

    const SLOT: Slot = Slot { file: super::DEBUG_FILE, key: "debug_mode" };

    pub fn exists() -> bool {
        matches!(persistence::read(SLOT), Ok(Some(_)))
    }

    pub fn create() -> Result<(), StorageError> {
        persistence::write(SLOT, "debug_enabled")
    }

    pub fn remove() -> Result<(), StorageError> {
        persistence::remove(SLOT)
    }
}
