//! Application layer - Use cases and port interfaces
//!
//! Contains the recorder use case, the background tasks it drives,
//! and trait definitions for external system interactions.

pub mod analyzer;
pub mod collector;
pub mod pipeline;
pub mod ports;
pub mod recorder;

// Re-export use cases
pub use collector::{BlockSender, FrameCollector};
pub use pipeline::CaptureSink;
pub use recorder::{
    Recorder, RecorderError, RecorderOptions, SaveOutcome, Transition, ELAPSED_TICK,
};
