//! Settings infrastructure for notelsp.
//!
//! Settings live in a `settings.toml` next to (or above) the notes workspace
//! and configure which line toggles the server offers as code actions.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::error::SettingsError;
use crate::markup::{builtin_toggles, Toggle};

/// Root settings structure loaded from settings.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Editor configuration.
    pub editor: Option<EditorSettings>,
}

/// Editor settings.
#[derive(Debug, Default, Deserialize)]
pub struct EditorSettings {
    /// Keep the built-in toggles (default: true).
    pub builtin_toggles: Option<bool>,

    /// Additional toggles, offered after the built-in ones.
    pub toggles: Option<Vec<Toggle>>,
}

/// Parse settings from TOML text.
pub fn parse_settings(content: &str) -> Result<Settings, SettingsError> {
    Ok(toml::from_str(content)?)
}

/// Load settings from a settings.toml file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => match parse_settings(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(path = %path.display(), "{}", e);
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

/// Discover settings.toml by searching up the directory tree, then direct children.
///
/// Search order:
/// 1. Walk up from `start_dir` to filesystem root
/// 2. If not found, check immediate child directories of `start_dir`
///
/// Returns `(settings, settings_dir)`; if nothing is found, returns
/// `(Settings::default(), start_dir)`.
pub fn discover_settings(start_dir: &Path) -> (Settings, PathBuf) {
    // Phase 1: Walk up from start_dir
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join("settings.toml");
        if candidate.is_file() {
            return (load_settings(&candidate), dir.to_path_buf());
        }
        current = dir.parent();
    }

    // Phase 2: Check immediate child directories
    if let Ok(entries) = std::fs::read_dir(start_dir) {
        for entry in entries.flatten() {
            if entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false) {
                let candidate = entry.path().join("settings.toml");
                if candidate.is_file() {
                    return (load_settings(&candidate), entry.path());
                }
            }
        }
    }

    (Settings::default(), start_dir.to_path_buf())
}

/// Check that a toggle can actually be applied and recognized.
pub fn validate_toggle(toggle: &Toggle) -> Result<(), SettingsError> {
    if toggle.markers.is_empty() {
        return Err(SettingsError::NoMarkers(toggle.name.clone()));
    }
    if toggle.markers.iter().any(String::is_empty) {
        return Err(SettingsError::EmptyMarker(toggle.name.clone()));
    }
    Ok(())
}

/// Resolve the toggles to offer: built-ins (unless disabled) followed by
/// valid user toggles. Invalid user toggles are skipped with a warning.
pub fn toggles_from_settings(settings: &Settings) -> Vec<Toggle> {
    let editor = settings.editor.as_ref();

    let mut toggles = if editor.and_then(|e| e.builtin_toggles).unwrap_or(true) {
        builtin_toggles()
    } else {
        Vec::new()
    };

    let custom = editor.and_then(|e| e.toggles.as_ref());
    for toggle in custom.into_iter().flatten() {
        match validate_toggle(toggle) {
            Ok(()) => toggles.push(toggle.clone()),
            Err(e) => warn!("skipping toggle: {}", e),
        }
    }

    toggles
}
