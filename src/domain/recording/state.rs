//! Recorder session state machine

use std::fmt;
use thiserror::Error;

/// Recorder states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Recording,
    Stopped,
}

impl RecorderState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for RecorderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: RecorderState,
    pub action: String,
}

/// Recorder session entity.
/// Manages state transitions for one recorder.
///
/// State machine:
///   IDLE -> RECORDING (start_recording)
///   STOPPED -> RECORDING (start_recording, previous take is discarded)
///   RECORDING -> STOPPED (stop_recording)
///   any -> IDLE (reset, after a failed start or a teardown)
#[derive(Debug, Default)]
pub struct RecorderSession {
    state: RecorderState,
}

impl RecorderSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: RecorderState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    /// Whether a start request would be honoured
    pub fn can_start(&self) -> bool {
        self.state != RecorderState::Recording
    }

    /// Whether a save request would be honoured
    pub fn can_save(&self) -> bool {
        self.state == RecorderState::Stopped
    }

    /// Transition from IDLE or STOPPED to RECORDING
    pub fn start_recording(&mut self) -> Result<(), InvalidStateTransition> {
        if !self.can_start() {
            return Err(self.invalid("start recording"));
        }
        self.state = RecorderState::Recording;
        Ok(())
    }

    /// Transition from RECORDING to STOPPED
    pub fn stop_recording(&mut self) -> Result<(), InvalidStateTransition> {
        if self.state != RecorderState::Recording {
            return Err(self.invalid("stop recording"));
        }
        self.state = RecorderState::Stopped;
        Ok(())
    }

    /// Return to IDLE from any state
    pub fn reset(&mut self) {
        self.state = RecorderState::Idle;
    }

    fn invalid(&self, action: &str) -> InvalidStateTransition {
        InvalidStateTransition {
            current_state: self.state,
            action: action.to_string(),
        }
    }
}
