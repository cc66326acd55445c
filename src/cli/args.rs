//! CLI argument definitions using Clap

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::domain::recording::Duration;

/// Acid Recorder - voice recorder with presence processing and WAV export
#[derive(Parser, Debug)]
#[command(name = "acid-recorder")]
#[command(version)]
#[command(about = "Record the microphone through a voice/presence chain and save it as WAV")]
#[command(long_about = None)]
pub struct Cli {
    /// Session label used in the suggested filename
    #[arg(short = 'l', long, value_name = "LABEL")]
    pub label: Option<String>,

    /// Stop automatically after this long (e.g., 30s, 1m, 2m30s)
    #[arg(short = 'd', long, value_name = "TIME", conflicts_with = "session")]
    pub duration: Option<String>,

    /// Directory recordings are saved into
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Save straight to the suggested filename instead of asking
    #[arg(long)]
    pub no_prompt: bool,

    /// Write the last oscilloscope frame to this PNG after stopping
    #[arg(long, value_name = "PNG")]
    pub scope: Option<PathBuf>,

    /// Interactive session (start, stop, save, hold, release, ...)
    #[arg(long)]
    pub session: bool,

    /// Show debug diagnostics on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Where the last oscilloscope frame goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeSnapshot {
    Off,
    /// Fixed path, written after every stop
    At(PathBuf),
    /// `<recording>.png`, written after every save
    BesideRecording,
}

impl ScopeSnapshot {
    /// Target for this moment: after a stop (`saved` is `None`) or a save
    pub fn target(&self, saved: Option<&Path>) -> Option<PathBuf> {
        match (self, saved) {
            (Self::At(path), None) => Some(path.clone()),
            (Self::BesideRecording, Some(wav)) => Some(wav.with_extension("png")),
            _ => None,
        }
    }
}

/// Resolved options for a recording run (one-shot or session)
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub label: String,
    pub duration: Option<Duration>,
    pub output_dir: PathBuf,
    pub save_prompt: bool,
    pub scope_size: (u32, u32),
    pub scope_snapshot: ScopeSnapshot,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "output_dir",
    "label",
    "duration",
    "save_prompt",
    "scope.width",
    "scope.height",
    "scope.snapshot",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
