//! Recorder use case: one capture session from start to saved file

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration as StdDuration;

use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval, Instant, MissedTickBehavior};

use crate::domain::audio::encode_wav_mono16;
use crate::domain::error::WavError;
use crate::domain::export::{SessionLabel, SessionMetadata};
use crate::domain::recording::{
    HoldAction, HoldGesture, InvalidStateTransition, RecorderSession, RecorderState,
    RecordingBuffer,
};

use super::analyzer::{analyzer_tap, spawn_analyzer, FRAME_INTERVAL};
use super::collector::FrameCollector;
use super::pipeline::CaptureSink;
use super::ports::{
    CaptureError, CaptureRequest, CaptureSource, CaptureStream, ExportError, MeterDisplay,
    ScopeSurface, WavExporter,
};

/// Period of the elapsed-time display
pub const ELAPSED_TICK: StdDuration = StdDuration::from_millis(250);

/// Errors from the recorder use case
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Microphone unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Audio capture not supported here: {0}")]
    UnsupportedEnvironment(String),

    #[error("Nothing recorded yet")]
    EmptyRecording,

    #[error("Save canceled")]
    SaveCanceled,

    #[error("Export failed: {0}")]
    ExportFailed(String),

    #[error("Encoding failed: {0}")]
    EncodeFailed(String),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Background task failed: {0}")]
    Task(String),
}

impl RecorderError {
    /// Errors the user can recover from by simply trying again
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::EmptyRecording | Self::SaveCanceled)
    }
}

impl From<CaptureError> for RecorderError {
    fn from(e: CaptureError) -> Self {
        match e {
            CaptureError::DeviceUnavailable(msg) => Self::DeviceUnavailable(msg),
            CaptureError::UnsupportedEnvironment(msg) => Self::UnsupportedEnvironment(msg),
        }
    }
}

impl From<ExportError> for RecorderError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::SaveCanceled => Self::SaveCanceled,
            other => Self::ExportFailed(other.to_string()),
        }
    }
}

impl From<WavError> for RecorderError {
    fn from(e: WavError) -> Self {
        match e {
            WavError::EmptyRecording => Self::EmptyRecording,
            other => Self::EncodeFailed(other.to_string()),
        }
    }
}

/// Whether a control actually changed anything
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Applied,
    /// Not allowed in the current state; nothing happened
    Ignored,
}

/// Result of a save request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved(PathBuf),
    /// Nothing to save in the current state
    Ignored,
}

/// Tunables for a recorder instance
#[derive(Debug, Clone)]
pub struct RecorderOptions {
    pub request: CaptureRequest,
    pub frame_interval: StdDuration,
    pub tick_interval: StdDuration,
}

impl Default for RecorderOptions {
    fn default() -> Self {
        Self {
            request: CaptureRequest::default(),
            frame_interval: FRAME_INTERVAL,
            tick_interval: ELAPSED_TICK,
        }
    }
}

/// Everything that only exists while recording
struct LiveSession {
    stream: Box<dyn CaptureStream>,
    collector: FrameCollector,
    analyzer: JoinHandle<()>,
    ticker: JoinHandle<()>,
    started_at: Instant,
}

/// A single recorder: owns its session state, buffer and live resources.
///
/// Controls take `&mut self`, so they never interleave.
pub struct Recorder<C, E, D, S>
where
    C: CaptureSource,
    E: WavExporter,
    D: MeterDisplay,
    S: ScopeSurface,
{
    capture: C,
    exporter: E,
    display: Arc<D>,
    scope: Arc<Mutex<S>>,
    options: RecorderOptions,
    session: RecorderSession,
    hold: HoldGesture,
    buffer: RecordingBuffer,
    sample_rate: Option<u32>,
    label: SessionLabel,
    live: Option<LiveSession>,
    last_elapsed_ms: u64,
}

impl<C, E, D, S> Recorder<C, E, D, S>
where
    C: CaptureSource,
    E: WavExporter,
    D: MeterDisplay,
    S: ScopeSurface,
{
    /// Create an idle recorder
    pub fn new(capture: C, exporter: E, display: Arc<D>, scope: S) -> Self {
        Self::with_options(capture, exporter, display, scope, RecorderOptions::default())
    }

    pub fn with_options(
        capture: C,
        exporter: E,
        display: Arc<D>,
        scope: S,
        options: RecorderOptions,
    ) -> Self {
        Self {
            capture,
            exporter,
            display,
            scope: Arc::new(Mutex::new(scope)),
            options,
            session: RecorderSession::new(),
            hold: HoldGesture::new(),
            buffer: RecordingBuffer::new(),
            sample_rate: None,
            label: SessionLabel::default(),
            live: None,
            last_elapsed_ms: 0,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.session.state()
    }

    /// Rate negotiated by the last successful start
    pub fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }

    /// Samples in the finished buffer (zero while recording)
    pub fn collected_samples(&self) -> usize {
        self.buffer.sample_count()
    }

    pub fn label(&self) -> &SessionLabel {
        &self.label
    }

    pub fn set_label(&mut self, raw: &str) {
        self.label = SessionLabel::new(raw);
    }

    /// Filename a save would suggest right now
    pub fn suggested_filename(&self) -> String {
        SessionMetadata::now(self.label.clone()).suggested_filename()
    }

    /// Time recorded so far, or the length of the last take
    pub fn elapsed_ms(&self) -> u64 {
        match &self.live {
            Some(live) => live.started_at.elapsed().as_millis() as u64,
            None => self.last_elapsed_ms,
        }
    }

    /// Shared handle to the scope canvas
    pub fn scope(&self) -> Arc<Mutex<S>> {
        Arc::clone(&self.scope)
    }

    /// Open the microphone and begin a new take.
    ///
    /// The previous buffer is discarded. On failure the recorder is idle
    /// and holds no resources.
    pub async fn start(&mut self) -> Result<Transition, RecorderError> {
        if !self.session.can_start() {
            tracing::debug!(state = %self.state(), "start ignored");
            return Ok(Transition::Ignored);
        }

        self.buffer = RecordingBuffer::new();
        self.sample_rate = None;
        self.last_elapsed_ms = 0;

        let (collector, blocks) = FrameCollector::spawn();
        let (tap, tap_reader) = analyzer_tap();
        let sink = CaptureSink::new(tap, blocks);

        let stream = match self.capture.open(&self.options.request, Box::new(sink)).await {
            Ok(stream) => stream,
            Err(e) => {
                collector.abort();
                self.session.reset();
                tracing::warn!(error = %e, "capture failed to start");
                return Err(e.into());
            }
        };

        self.session.start_recording()?;
        let sample_rate = stream.sample_rate();
        self.sample_rate = Some(sample_rate);

        lock_scope(&self.scope).clear();
        self.display.recording_started(sample_rate);

        let started_at = Instant::now();
        let analyzer = spawn_analyzer(
            tap_reader,
            Arc::clone(&self.display),
            Arc::clone(&self.scope),
            self.options.frame_interval,
        );
        let ticker = spawn_elapsed_ticker(
            Arc::clone(&self.display),
            started_at,
            self.options.tick_interval,
        );

        self.live = Some(LiveSession {
            stream,
            collector,
            analyzer,
            ticker,
            started_at,
        });

        tracing::info!(sample_rate, "recording started");
        Ok(Transition::Applied)
    }

    /// Stop the take, release the device and keep the buffer
    pub async fn stop(&mut self) -> Result<Transition, RecorderError> {
        if !self.session.is_recording() {
            tracing::debug!(state = %self.state(), "stop ignored");
            return Ok(Transition::Ignored);
        }

        let Some(live) = self.live.take() else {
            self.session.reset();
            return Ok(Transition::Ignored);
        };

        // No frame may be drawn once stop returns
        live.analyzer.abort();
        live.ticker.abort();
        let _ = live.analyzer.await;
        let _ = live.ticker.await;
        self.last_elapsed_ms = live.started_at.elapsed().as_millis() as u64;

        let stream = live.stream;
        match tokio::task::spawn_blocking(move || stream.release()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!(error = %e, "stream release failed"),
            Err(e) => tracing::warn!(error = %e, "stream release task failed"),
        }

        self.buffer = live.collector.finish().await;
        self.session.stop_recording()?;
        self.hold.cancel();

        self.display.set_elapsed(self.last_elapsed_ms);
        self.display.set_level(0.0);
        self.display.recording_stopped();

        tracing::info!(
            samples = self.buffer.sample_count(),
            elapsed_ms = self.last_elapsed_ms,
            "recording stopped"
        );
        Ok(Transition::Applied)
    }

    /// Encode the stopped take and hand it to the exporter.
    ///
    /// Neither the state nor the buffer changes, so saving can be repeated.
    pub async fn save(&mut self) -> Result<SaveOutcome, RecorderError> {
        if !self.session.can_save() {
            tracing::debug!(state = %self.state(), "save ignored");
            return Ok(SaveOutcome::Ignored);
        }

        let path = self.encode_and_export().await?;
        tracing::info!(path = %path.display(), "recording saved");
        self.display
            .set_status(&format!("Saved {}", path.display()));
        Ok(SaveOutcome::Saved(path))
    }

    async fn encode_and_export(&self) -> Result<PathBuf, RecorderError> {
        if self.buffer.is_empty() {
            return Err(RecorderError::EmptyRecording);
        }

        let samples = self.buffer.flatten();
        let sample_rate = self
            .sample_rate
            .unwrap_or(self.options.request.sample_rate);

        let wav = tokio::task::spawn_blocking(move || encode_wav_mono16(&samples, sample_rate))
            .await
            .map_err(|e| RecorderError::Task(e.to_string()))??;
        tracing::debug!(size = %wav.human_readable_size(), ms = wav.duration_ms(), "take encoded");

        let name = self.suggested_filename();
        Ok(self.exporter.export(&wav, &name).await?)
    }

    /// Hold pressed: start unless already recording
    pub async fn hold_press(&mut self) -> Result<Transition, RecorderError> {
        match self.hold.press(self.state()) {
            HoldAction::Start => {
                let started = self.start().await;
                // Nothing to release if the take never began
                if started.is_err() {
                    self.hold.cancel();
                }
                started
            }
            _ => Ok(Transition::Ignored),
        }
    }

    /// Hold released, from any source. Only the first release after a
    /// press can stop the recording.
    pub async fn hold_release(&mut self) -> Result<Transition, RecorderError> {
        match self.hold.release(self.state()) {
            HoldAction::Stop => self.stop().await,
            _ => Ok(Transition::Ignored),
        }
    }

    /// Release every live resource, whatever the state.
    ///
    /// Each step is attempted even if an earlier one fails. An interrupted
    /// take is discarded and the recorder returns to idle.
    pub fn teardown(&mut self) {
        self.hold.cancel();

        let Some(live) = self.live.take() else {
            return;
        };

        live.analyzer.abort();
        live.ticker.abort();
        live.collector.abort();
        if let Err(e) = live.stream.release() {
            tracing::warn!(error = %e, "stream release failed during teardown");
        }

        self.buffer = RecordingBuffer::new();
        self.session.reset();
        self.display.set_level(0.0);
        self.display.recording_stopped();
        tracing::info!("recorder torn down");
    }
}

impl<C, E, D, S> Drop for Recorder<C, E, D, S>
where
    C: CaptureSource,
    E: WavExporter,
    D: MeterDisplay,
    S: ScopeSurface,
{
    fn drop(&mut self) {
        self.teardown();
    }
}

fn lock_scope<S>(scope: &Mutex<S>) -> std::sync::MutexGuard<'_, S> {
    scope.lock().unwrap_or_else(PoisonError::into_inner)
}

fn spawn_elapsed_ticker<D: MeterDisplay>(
    display: Arc<D>,
    started_at: Instant,
    period: StdDuration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            display.set_elapsed(started_at.elapsed().as_millis() as u64);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_errors_map_to_recorder_errors() {
        let e: RecorderError = CaptureError::DeviceUnavailable("no mic".into()).into();
        assert!(matches!(e, RecorderError::DeviceUnavailable(ref m) if m == "no mic"));

        let e: RecorderError = CaptureError::UnsupportedEnvironment("no host".into()).into();
        assert!(matches!(e, RecorderError::UnsupportedEnvironment(_)));
    }

    #[test]
    fn canceled_export_is_recoverable() {
        let e: RecorderError = ExportError::SaveCanceled.into();
        assert!(matches!(e, RecorderError::SaveCanceled));
        assert!(e.is_recoverable());

        let e: RecorderError = ExportError::WriteFailed {
            path: "/x.wav".into(),
            message: "denied".into(),
        }
        .into();
        assert!(!e.is_recoverable());
        assert!(e.to_string().contains("denied"));
    }

    #[test]
    fn empty_wav_maps_to_empty_recording() {
        let e: RecorderError = WavError::EmptyRecording.into();
        assert!(matches!(e, RecorderError::EmptyRecording));
        assert_eq!(e.to_string(), "Nothing recorded yet");
    }

    #[test]
    fn default_options_tick_every_quarter_second() {
        let options = RecorderOptions::default();
        assert_eq!(options.tick_interval, StdDuration::from_millis(250));
        assert_eq!(options.request, CaptureRequest::default());
    }
}
