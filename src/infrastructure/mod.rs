//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with cpal, the filesystem and tiny-skia.

pub mod capture;
pub mod config;
pub mod export;
pub mod scope;

// Re-export adapters
pub use capture::{create_capture, CpalCapture};
pub use config::XdgConfigStore;
pub use export::FileExporter;
pub use scope::{PixmapScope, ScopeError};
