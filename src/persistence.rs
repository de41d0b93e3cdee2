//! Local key/value storage and user preferences.
//!
//! Native builds keep one file per slot in the user's config directory;
//! WASM builds keep one `localStorage` entry per slot. Preferences are stored as
//! RON and re-applied to the egui context whenever they change.

use bevy::log::{debug, info, warn};
use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use serde::{Deserialize, Serialize};

pub struct PreferencesPlugin;
impl Plugin for PreferencesPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Preferences::load())
            .add_systems(EguiPrimaryContextPass, Preferences::apply_theme)
            .add_systems(Update, Preferences::save_on_change
                .run_if(resource_changed::<Preferences>.and(not(resource_added::<Preferences>))))
            ;
    }
}

const APP_DIR: &str = "flagged-it";

/// A named storage location: a file name on native, a key in the browser.
#[derive(Clone, Copy, Debug)]
pub struct Slot {
    pub file: &'static str,
    pub key: &'static str,
}

pub const PREFERENCES_SLOT: Slot = Slot { file: "preferences.ron", key: "preferences" };

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("browser storage error: {0}")]
    Browser(String),
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use std::path::{Path, PathBuf};

    use super::{APP_DIR, Slot, StorageError};

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StorageError + '_ {
        move |source| StorageError::Io { path: path.display().to_string(), source }
    }

    pub fn config_dir() -> Result<PathBuf, StorageError> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR))
            .ok_or(StorageError::NoConfigDir)
    }

    pub fn read_in(dir: &Path, slot: Slot) -> Result<Option<String>, StorageError> {
        let path = dir.join(slot.file);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path).map(Some).map_err(io_error(&path))
    }

    pub fn write_in(dir: &Path, slot: Slot, content: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(dir).map_err(io_error(dir))?;
        let path = dir.join(slot.file);
        std::fs::write(&path, content).map_err(io_error(&path))
    }

    pub fn remove_in(dir: &Path, slot: Slot) -> Result<(), StorageError> {
        let path = dir.join(slot.file);
        match std::fs::remove_file(&path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(io_error(&path)(e)),
            _ => Ok(()),
        }
    }

    pub fn read(slot: Slot) -> Result<Option<String>, StorageError> {
        read_in(&config_dir()?, slot)
    }

    pub fn write(slot: Slot, content: &str) -> Result<(), StorageError> {
        write_in(&config_dir()?, slot, content)
    }
}

#[cfg(target_arch = "wasm32")]
mod backend {
    use gloo_storage::{LocalStorage, Storage};

    use super::{Slot, StorageError};

    pub fn read(slot: Slot) -> Result<Option<String>, StorageError> {
        // A missing key is reported as an error by gloo; treat it as empty.
        Ok(LocalStorage::get::<String>(slot.key).ok())
    }

    pub fn write(slot: Slot, content: &str) -> Result<(), StorageError> {
        LocalStorage::set(slot.key, content).map_err(|e| StorageError::Browser(e.to_string()))
    }

    pub fn remove(slot: Slot) -> Result<(), StorageError> {
        LocalStorage::delete(slot.key);
        Ok(())
    }
}

pub use backend::{read, write};
#[cfg(not(target_arch = "wasm32"))]
pub use backend::{remove_in, write_in};
#[cfg(target_arch = "wasm32")]
pub use backend::remove;

// ============================================================================
// Preferences
// ============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThemeChoice {
    #[default]
    System,
    Light,
    Dark,
}
impl ThemeChoice {
    pub const ALL: [ThemeChoice; 3] = [ThemeChoice::System, ThemeChoice::Light, ThemeChoice::Dark];

    pub fn label(self) -> &'static str {
        match self {
            ThemeChoice::System => "System",
            ThemeChoice::Light => "Light",
            ThemeChoice::Dark => "Dark",
        }
    }
}
impl From<ThemeChoice> for egui::ThemePreference {
    fn from(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::System => egui::ThemePreference::System,
            ThemeChoice::Light => egui::ThemePreference::Light,
            ThemeChoice::Dark => egui::ThemePreference::Dark,
        }
    }
}

#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub theme: ThemeChoice,
}
impl Preferences {
    pub fn from_ron(content: &str) -> Self {
        ron::from_str(content).unwrap_or_else(|e| {
            warn!("Failed to parse preferences: {}", e);
            Self::default()
        })
    }

    fn load() -> Self {
        match read(PREFERENCES_SLOT) {
            Ok(Some(content)) => Self::from_ron(&content),
            Ok(None) => {
                debug!("No saved preferences found");
                Self::default()
            }
            Err(e) => {
                warn!("Failed to read preferences: {}", e);
                Self::default()
            }
        }
    }

    fn save(&self) {
        let content = match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to serialize preferences: {}", e);
                return;
            }
        };
        match write(PREFERENCES_SLOT, &content) {
            Ok(()) => info!("Saved preferences (theme: {})", self.theme.label()),
            Err(e) => warn!("Failed to save preferences: {}", e),
        }
    }

    fn save_on_change(preferences: Res<Preferences>) {
        preferences.save();
    }

    /// Pushes the theme into egui whenever it differs from what was last applied.
    fn apply_theme(
        mut contexts: EguiContexts,
        preferences: Res<Preferences>,
        mut applied: Local<Option<ThemeChoice>>,
    ) {
        if *applied == Some(preferences.theme) { return; }
        let Ok(ctx) = contexts.ctx_mut() else { return };
        ctx.set_theme(preferences.theme);
        *applied = Some(preferences.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferences_round_trip_through_ron() {
        let prefs = Preferences { theme: ThemeChoice::Dark };
        let content = ron::ser::to_string_pretty(&prefs, ron::ser::PrettyConfig::default()).unwrap();

        assert_eq!(Preferences::from_ron(&content), prefs);
    }

    #[test]
    fn corrupt_or_partial_preferences_use_defaults() {
        assert_eq!(Preferences::from_ron("not ron at all"), Preferences::default());
        assert_eq!(Preferences::from_ron("()").theme, ThemeChoice::System);
    }

    #[test]
    fn theme_maps_to_egui_preference() {
        assert_eq!(egui::ThemePreference::from(ThemeChoice::Light), egui::ThemePreference::Light);
        assert_eq!(egui::ThemePreference::from(ThemeChoice::System), egui::ThemePreference::System);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn file_slots_read_write_and_remove() {
        let dir = std::env::temp_dir().join(format!("flagged-it-test-{}", std::process::id()));
        let slot = Slot { file: "slot.txt", key: "slot" };

        assert!(backend::read_in(&dir, slot).unwrap().is_none());
        backend::write_in(&dir, slot, "hello").unwrap();
        assert_eq!(backend::read_in(&dir, slot).unwrap().as_deref(), Some("hello"));
        backend::remove_in(&dir, slot).unwrap();
        backend::remove_in(&dir, slot).unwrap();
        assert!(backend::read_in(&dir, slot).unwrap().is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
