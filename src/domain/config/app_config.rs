//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::error::DurationParseError;
use crate::domain::recording::Duration;

/// Default oscilloscope canvas size in pixels
pub const DEFAULT_SCOPE_WIDTH: u32 = 640;
pub const DEFAULT_SCOPE_HEIGHT: u32 = 160;

/// Oscilloscope settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScopeConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Write the last scope frame next to each saved recording
    pub snapshot: Option<bool>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub output_dir: Option<String>,
    pub label: Option<String>,
    pub duration: Option<String>,
    pub save_prompt: Option<bool>,
    pub scope: Option<ScopeConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            output_dir: None,
            label: None,
            duration: None,
            save_prompt: Some(true),
            scope: Some(ScopeConfig {
                width: Some(DEFAULT_SCOPE_WIDTH),
                height: Some(DEFAULT_SCOPE_HEIGHT),
                snapshot: Some(false),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            output_dir: other.output_dir.or(self.output_dir),
            label: other.label.or(self.label),
            duration: other.duration.or(self.duration),
            save_prompt: other.save_prompt.or(self.save_prompt),
            scope: Self::merge_scope_config(self.scope, other.scope),
        }
    }

    fn merge_scope_config(base: Option<ScopeConfig>, other: Option<ScopeConfig>) -> Option<ScopeConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(ScopeConfig {
                width: o.width.or(b.width),
                height: o.height.or(b.height),
                snapshot: o.snapshot.or(b.snapshot),
            }),
        }
    }

    /// Output directory, or the platform audio/download/current directory
    pub fn output_dir_or_default(&self) -> std::path::PathBuf {
        self.output_dir
            .as_ref()
            .map(std::path::PathBuf::from)
            .or_else(dirs::audio_dir)
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| std::path::PathBuf::from("."))
    }

    /// Auto-stop limit; a value that does not parse is an error, not "no limit"
    pub fn duration_limit(&self) -> Result<Option<Duration>, DurationParseError> {
        self.duration.as_deref().map(str::parse).transpose()
    }

    /// Get save_prompt setting, or true if not set
    pub fn save_prompt_or_default(&self) -> bool {
        self.save_prompt.unwrap_or(true)
    }

    /// Scope canvas size, falling back to 640x160
    pub fn scope_size_or_default(&self) -> (u32, u32) {
        let scope = self.scope.as_ref();
        (
            scope
                .and_then(|s| s.width)
                .filter(|w| *w > 0)
                .unwrap_or(DEFAULT_SCOPE_WIDTH),
            scope
                .and_then(|s| s.height)
                .filter(|h| *h > 0)
                .unwrap_or(DEFAULT_SCOPE_HEIGHT),
        )
    }

    /// Get scope snapshot setting, or false if not set
    pub fn scope_snapshot_or_default(&self) -> bool {
        self.scope.as_ref().and_then(|s| s.snapshot).unwrap_or(false)
    }
}
