//! Error types for cursor location and settings loading.

use thiserror::Error;

/// Failure to locate a cursor inside a text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    /// The cursor lies past the end of the text.
    #[error("cursor offset {offset} is out of range for text of length {len}")]
    OutOfRange { offset: usize, len: usize },
}

/// Problems found while reading `settings.toml`.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("toggle '{0}' has no markers")]
    NoMarkers(String),

    #[error("toggle '{0}' has an empty marker")]
    EmptyMarker(String),
}
