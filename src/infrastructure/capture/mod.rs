//! Audio capture infrastructure
//!
//! Cross-platform microphone input via cpal.

mod cpal_capture;

pub use cpal_capture::CpalCapture;

/// Create the capture source for the current platform
pub fn create_capture() -> CpalCapture {
    CpalCapture::new()
}
