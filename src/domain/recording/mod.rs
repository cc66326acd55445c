//! Recording session model: buffer, state machine, hold gesture, durations

pub mod buffer;
pub mod duration;
pub mod hold;
pub mod state;

pub use buffer::{RecordingBuffer, SampleBlock};
pub use duration::Duration;
pub use hold::{HoldAction, HoldGesture};
pub use state::{InvalidStateTransition, RecorderSession, RecorderState};
