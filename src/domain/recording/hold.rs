//! Hold-to-record (walkie-talkie) gesture

use super::state::RecorderState;

/// What the recorder should do in response to a hold event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldAction {
    Start,
    Stop,
    Nothing,
}

/// Tracks whether a hold is in progress.
///
/// A release is honoured once per press no matter where it comes from:
/// the control itself, the pointer leaving the control, or the global
/// fallback listener. Later releases are ignored.
#[derive(Debug, Default)]
pub struct HoldGesture {
    active: bool,
}

impl HoldGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Press: start recording unless already recording
    pub fn press(&mut self, state: RecorderState) -> HoldAction {
        if self.active {
            return HoldAction::Nothing;
        }
        self.active = true;

        if state == RecorderState::Recording {
            HoldAction::Nothing
        } else {
            HoldAction::Start
        }
    }

    /// Release: stop recording if the hold is active and we are recording
    pub fn release(&mut self, state: RecorderState) -> HoldAction {
        if !self.active {
            return HoldAction::Nothing;
        }
        self.active = false;

        if state == RecorderState::Recording {
            HoldAction::Stop
        } else {
            HoldAction::Nothing
        }
    }

    /// Drop any hold in progress without acting on it
    pub fn cancel(&mut self) {
        self.active = false;
    }
}
