//! Line toggle definitions.

use serde::Deserialize;

/// A Markdown line decoration that can be switched on or off for a selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Toggle {
    /// Human readable name, used in code action titles.
    pub name: String,
    /// Accepted markers; the first one is inserted when applying.
    pub markers: Vec<String>,
    /// The marker must also close the line (wrapping toggles like inline code).
    #[serde(default)]
    pub check_line_end: bool,
    /// Markers are preceded by a running number (`1. `, `2. `, ...).
    #[serde(default)]
    pub increment: bool,
}

impl Toggle {
    /// A prefix-only toggle.
    pub fn prefix(name: &str, markers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            markers: markers.iter().map(|m| m.to_string()).collect(),
            check_line_end: false,
            increment: false,
        }
    }

    pub fn with_line_end(mut self) -> Self {
        self.check_line_end = true;
        self
    }

    pub fn with_increment(mut self) -> Self {
        self.increment = true;
        self
    }

    /// The marker written when applying.
    ///
    /// Toggles are validated on load, so `markers` is never empty there; an
    /// empty list falls back to an empty marker.
    pub fn primary_marker(&self) -> &str {
        self.markers.first().map(String::as_str).unwrap_or_default()
    }
}

/// Toggles offered when no settings override them.
pub fn builtin_toggles() -> Vec<Toggle> {
    vec![
        Toggle::prefix("Heading", &["# "]),
        Toggle::prefix("Quote", &["> "]),
        Toggle::prefix("Bulleted list", &["- ", "* ", "+ "]),
        Toggle::prefix("Numbered list", &[". "]).with_increment(),
        Toggle::prefix("Task list", &["- [ ] ", "- [x] "]),
        Toggle::prefix("Inline code", &["`"]).with_line_end(),
    ]
}
