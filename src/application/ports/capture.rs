//! Audio capture port interfaces

use async_trait::async_trait;
use thiserror::Error;

/// Capture errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// No input device, or access to it was refused
    #[error("Microphone unavailable: {0}")]
    DeviceUnavailable(String),

    /// The audio host cannot capture at all, or cannot honour the request
    #[error("Audio capture not supported here: {0}")]
    UnsupportedEnvironment(String),
}

/// Preferred sample rate for recordings
pub const PREFERRED_SAMPLE_RATE: u32 = 48_000;

/// What the recorder asks of the input device.
///
/// The recorder applies its own processing, so every adaptive stage
/// the host might offer stays off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    pub channel_count: u16,
    pub sample_rate: u32,
    pub sample_size: u16,
    pub echo_cancellation: bool,
    pub noise_suppression: bool,
    pub auto_gain_control: bool,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            channel_count: 1,
            sample_rate: PREFERRED_SAMPLE_RATE,
            sample_size: 16,
            echo_cancellation: false,
            noise_suppression: false,
            auto_gain_control: false,
        }
    }
}

impl CaptureRequest {
    /// Whether any host-side adaptive processing is requested
    pub fn wants_adaptive_processing(&self) -> bool {
        self.echo_cancellation || self.noise_suppression || self.auto_gain_control
    }
}

/// Receives mono float blocks on the audio thread.
///
/// Implementations must not block: no locks, no I/O.
pub trait BlockSink: Send + 'static {
    /// Called once with the negotiated rate, before any block
    fn prepare(&mut self, sample_rate: u32);

    /// Called for every block the host delivers
    fn accept(&mut self, samples: &[f32]);
}

/// A live input stream. Dropping it also stops capture.
pub trait CaptureStream: Send + Sync {
    /// Sample rate the device actually runs at
    fn sample_rate(&self) -> u32;

    /// Stop the device and free the stream
    fn release(self: Box<Self>) -> Result<(), CaptureError>;
}

/// Port for acquiring microphone input
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Open the input device and start feeding `sink`.
    ///
    /// # Returns
    /// A handle that keeps the stream alive until released
    async fn open(
        &self,
        request: &CaptureRequest,
        sink: Box<dyn BlockSink>,
    ) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_is_raw_mono_48k() {
        let request = CaptureRequest::default();
        assert_eq!(request.channel_count, 1);
        assert_eq!(request.sample_rate, 48_000);
        assert_eq!(request.sample_size, 16);
        assert!(!request.wants_adaptive_processing());
    }

    #[test]
    fn adaptive_flags_are_detected() {
        let request = CaptureRequest {
            noise_suppression: true,
            ..Default::default()
        };
        assert!(request.wants_adaptive_processing());
    }
}
