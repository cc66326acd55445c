//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod display;
pub mod exporter;

// Re-export common types
pub use capture::{
    BlockSink, CaptureError, CaptureRequest, CaptureSource, CaptureStream, PREFERRED_SAMPLE_RATE,
};
pub use config::ConfigStore;
pub use display::{MeterDisplay, ScopeSurface};
pub use exporter::{DestinationPicker, ExportError, WavExporter};
