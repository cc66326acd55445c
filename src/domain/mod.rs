//! Domain layer - Core recording logic
//!
//! Contains the signal-processing chain, the WAV codec, the recorder
//! state machine, value objects, and domain errors.
//! This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod error;
pub mod export;
pub mod recording;

// Re-export common types
pub use audio::{ProcessingGraph, WavFile};
pub use config::AppConfig;
pub use error::*;
pub use export::{SessionLabel, SessionMetadata};
pub use recording::{Duration, HoldGesture, RecorderSession, RecorderState, RecordingBuffer, SampleBlock};
