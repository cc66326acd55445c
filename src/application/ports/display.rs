//! Live feedback port interfaces

use crate::domain::audio::WaveformTrace;

/// Port for status, elapsed time and the level meter
pub trait MeterDisplay: Send + Sync + 'static {
    /// A recording began at the given negotiated rate
    fn recording_started(&self, sample_rate: u32);

    /// The recording ended; the meter should read zero
    fn recording_stopped(&self);

    fn set_elapsed(&self, elapsed_ms: u64);

    /// Level in percent, 0..=100
    fn set_level(&self, percent: f32);

    fn set_status(&self, message: &str);
}

/// Port for the oscilloscope canvas
pub trait ScopeSurface: Send + 'static {
    /// Canvas size in pixels (width, height)
    fn size(&self) -> (u32, u32);

    /// Dim the previous frame and draw `trace` over it
    fn draw(&mut self, trace: &WaveformTrace);

    /// Reset to the idle background
    fn clear(&mut self);
}
