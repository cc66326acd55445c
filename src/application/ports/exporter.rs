//! Export port interfaces

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::audio::WavFile;
use crate::domain::export::FileFilter;

/// Export errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    /// The user dismissed the save-as prompt
    #[error("Save canceled")]
    SaveCanceled,

    #[error("Failed to write {path}: {message}")]
    WriteFailed { path: String, message: String },
}

/// Port for the interactive "save as" flow
#[async_trait]
pub trait DestinationPicker: Send + Sync {
    /// Ask where to save.
    ///
    /// # Returns
    /// The chosen path, or `None` when the user cancels
    async fn choose(&self, suggested: &Path, filter: &FileFilter) -> Option<PathBuf>;
}

/// Port for persisting an encoded recording
#[async_trait]
pub trait WavExporter: Send + Sync {
    /// Save `wav` under (a path derived from) `suggested_name`.
    ///
    /// # Returns
    /// Where the file ended up
    async fn export(&self, wav: &WavFile, suggested_name: &str) -> Result<PathBuf, ExportError>;
}
