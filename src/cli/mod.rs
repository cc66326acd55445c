//! CLI layer - Command-line interface
//!
//! Contains argument parsing, terminal input and output, signal handling,
//! and the one-shot and session runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod input;
pub mod picker;
pub mod presenter;
pub mod session;
pub mod signals;

// Re-export commonly used types
pub use app::{run_record, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, RecordOptions, ScopeSnapshot};
pub use presenter::Presenter;
pub use session::{run_session, SessionCommand};
