//! Suggested output filenames

use std::fmt;

use chrono::{Local, NaiveDateTime};

/// Longest label kept in a filename
pub const MAX_LABEL_LEN: usize = 40;

/// Prefix of every exported file
pub const FILE_PREFIX: &str = "acid";

/// Type filter offered by the save-as flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub description: &'static str,
    pub mime_type: &'static str,
    pub extension: &'static str,
}

pub const WAV_FILTER: FileFilter = FileFilter {
    description: "WAV audio",
    mime_type: "audio/wav",
    extension: ".wav",
};

impl FileFilter {
    /// Whether `name` already carries this filter's extension
    pub fn matches(&self, name: &str) -> bool {
        name.to_ascii_lowercase().ends_with(self.extension)
    }
}

impl fmt::Display for FileFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (*{})", self.description, self.extension)
    }
}

/// A filename-safe session label; may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLabel(String);

impl SessionLabel {
    /// Sanitize free text: lower-case, whitespace runs to `_`,
    /// only `[a-z0-9_-]`, at most 40 characters.
    pub fn new(raw: &str) -> Self {
        let mut out = String::new();
        let mut in_space = false;

        for ch in raw.trim().chars().flat_map(char::to_lowercase) {
            if ch.is_whitespace() {
                if !in_space {
                    out.push('_');
                }
                in_space = true;
                continue;
            }
            in_space = false;
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' || ch == '-' {
                out.push(ch);
            }
        }

        out.truncate(MAX_LABEL_LEN);
        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SessionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Label plus the moment the name is suggested
#[derive(Debug, Clone)]
pub struct SessionMetadata {
    pub label: SessionLabel,
    pub timestamp: NaiveDateTime,
}

impl SessionMetadata {
    pub fn new(label: SessionLabel, timestamp: NaiveDateTime) -> Self {
        Self { label, timestamp }
    }

    /// Metadata stamped with the local wall clock
    pub fn now(label: SessionLabel) -> Self {
        Self::new(label, Local::now().naive_local())
    }

    /// `YYYY-MM-DD_HHMMSS`
    pub fn stamp(&self) -> String {
        self.timestamp.format("%Y-%m-%d_%H%M%S").to_string()
    }

    /// `acid_<label>_<stamp>.wav`, or `acid_<stamp>.wav` without a label
    pub fn suggested_filename(&self) -> String {
        if self.label.is_empty() {
            format!("{}_{}{}", FILE_PREFIX, self.stamp(), WAV_FILTER.extension)
        } else {
            format!(
                "{}_{}_{}{}",
                FILE_PREFIX,
                self.label,
                self.stamp(),
                WAV_FILTER.extension
            )
        }
    }
}
