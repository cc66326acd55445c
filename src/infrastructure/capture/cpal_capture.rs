//! Microphone capture using cpal
//!
//! Prefers a mono 48 kHz input; anything else the device offers is
//! downmixed to mono floats before it reaches the sink.

use std::sync::mpsc as std_mpsc;
use std::thread;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BuildStreamError, SampleFormat, SampleRate, StreamConfig};
use tokio::sync::oneshot;

use crate::application::ports::{
    BlockSink, CaptureError, CaptureRequest, CaptureSource, CaptureStream,
};

/// One input configuration a device reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ConfigCandidate {
    channels: u16,
    min_rate: u32,
    max_rate: u32,
    format: SampleFormat,
}

impl ConfigCandidate {
    /// `rate` if the range covers it, otherwise the closer end
    fn nearest_rate(&self, rate: u32) -> u32 {
        rate.clamp(self.min_rate, self.max_rate)
    }
}

/// Pick channels, rate and format for `request` from what the device offers.
///
/// Only f32 and i16 formats are usable. The rate closest to the requested
/// one wins (zero distance when a range covers it), then the channel count,
/// then the sample format.
fn choose_config(
    candidates: &[ConfigCandidate],
    request: &CaptureRequest,
) -> Option<(u16, u32, SampleFormat)> {
    let target = request.sample_rate;

    candidates
        .iter()
        .filter(|c| matches!(c.format, SampleFormat::F32 | SampleFormat::I16))
        .min_by_key(|c| {
            (
                target.abs_diff(c.nearest_rate(target)),
                c.channels.abs_diff(request.channel_count),
                c.format != SampleFormat::F32,
            )
        })
        .map(|c| (c.channels, c.nearest_rate(target), c.format))
}

/// Average interleaved frames into mono floats
fn downmix<T: Copy>(data: &[T], channels: u16, to_f32: impl Fn(T) -> f32, out: &mut Vec<f32>) {
    out.clear();
    let channels = channels.max(1) as usize;
    if channels == 1 {
        out.extend(data.iter().map(|&s| to_f32(s)));
        return;
    }
    let scale = 1.0 / channels as f32;
    out.extend(
        data.chunks(channels)
            .map(|frame| frame.iter().map(|&s| to_f32(s)).sum::<f32>() * scale),
    );
}

fn i16_to_f32(sample: i16) -> f32 {
    sample as f32 / 32768.0
}

fn map_build_error(e: BuildStreamError) -> CaptureError {
    match e {
        BuildStreamError::DeviceNotAvailable => {
            CaptureError::DeviceUnavailable("input device is no longer available".into())
        }
        BuildStreamError::StreamConfigNotSupported | BuildStreamError::InvalidArgument => {
            CaptureError::UnsupportedEnvironment(e.to_string())
        }
        other => CaptureError::DeviceUnavailable(other.to_string()),
    }
}

/// Capture source backed by the default cpal host
#[derive(Debug, Default)]
pub struct CpalCapture;

impl CpalCapture {
    pub fn new() -> Self {
        Self
    }

    fn input_device() -> Result<cpal::Device, CaptureError> {
        if cpal::available_hosts().is_empty() {
            return Err(CaptureError::UnsupportedEnvironment(
                "no audio host on this platform".into(),
            ));
        }

        cpal::default_host()
            .default_input_device()
            .ok_or_else(|| CaptureError::DeviceUnavailable("no input device found".into()))
    }

    fn input_config(
        device: &cpal::Device,
        request: &CaptureRequest,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let candidates: Vec<ConfigCandidate> = device
            .supported_input_configs()
            .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?
            .map(|range| ConfigCandidate {
                channels: range.channels(),
                min_rate: range.min_sample_rate().0,
                max_rate: range.max_sample_rate().0,
                format: range.sample_format(),
            })
            .collect();

        let (channels, rate, format) = choose_config(&candidates, request).ok_or_else(|| {
            CaptureError::UnsupportedEnvironment("device offers no f32 or i16 input".into())
        })?;

        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(rate),
            buffer_size: cpal::BufferSize::Default,
        };
        Ok((config, format))
    }

    /// Build and start the stream. Runs on the capture thread because
    /// `cpal::Stream` is not `Send`.
    fn build_stream(
        request: &CaptureRequest,
        mut sink: Box<dyn BlockSink>,
    ) -> Result<(cpal::Stream, u32), CaptureError> {
        let device = Self::input_device()?;
        let (config, format) = Self::input_config(&device, request)?;
        let sample_rate = config.sample_rate.0;
        let channels = config.channels;

        tracing::debug!(
            device = %device.name().unwrap_or_default(),
            channels,
            sample_rate,
            ?format,
            "opening input stream"
        );

        sink.prepare(sample_rate);
        let mut mono = Vec::new();
        let on_error = |err: cpal::StreamError| tracing::error!(error = %err, "audio stream error");

        let stream = match format {
            SampleFormat::I16 => device.build_input_stream(
                &config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    downmix(data, channels, i16_to_f32, &mut mono);
                    sink.accept(&mono);
                },
                on_error,
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    downmix(data, channels, |s| s, &mut mono);
                    sink.accept(&mono);
                },
                on_error,
                None,
            ),
            other => {
                return Err(CaptureError::UnsupportedEnvironment(format!(
                    "unsupported sample format {other:?}"
                )))
            }
        }
        .map_err(map_build_error)?;

        stream
            .play()
            .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

        Ok((stream, sample_rate))
    }

    fn run_capture_thread(
        request: CaptureRequest,
        sink: Box<dyn BlockSink>,
        ready: oneshot::Sender<Result<u32, CaptureError>>,
        stop: std_mpsc::Receiver<()>,
    ) {
        let stream = match Self::build_stream(&request, sink) {
            Ok((stream, sample_rate)) => {
                let _ = ready.send(Ok(sample_rate));
                stream
            }
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };

        // Park until released (or the handle is dropped)
        let _ = stop.recv();
        if let Err(e) = stream.pause() {
            tracing::debug!(error = %e, "pause before close failed");
        }
        drop(stream);
        tracing::debug!("input stream closed");
    }
}

#[async_trait]
impl CaptureSource for CpalCapture {
    async fn open(
        &self,
        request: &CaptureRequest,
        sink: Box<dyn BlockSink>,
    ) -> Result<Box<dyn CaptureStream>, CaptureError> {
        if request.wants_adaptive_processing() {
            return Err(CaptureError::UnsupportedEnvironment(
                "echo cancellation, noise suppression and gain control are not available".into(),
            ));
        }

        let (ready_tx, ready_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = std_mpsc::channel();
        let request = request.clone();

        let thread = thread::Builder::new()
            .name("acid-capture".into())
            .spawn(move || Self::run_capture_thread(request, sink, ready_tx, stop_rx))
            .map_err(|e| CaptureError::UnsupportedEnvironment(e.to_string()))?;

        match ready_rx.await {
            Ok(Ok(sample_rate)) => Ok(Box::new(CpalStream {
                sample_rate,
                stop: stop_tx,
                thread: Some(thread),
            })),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(CaptureError::DeviceUnavailable(
                "capture thread exited before the stream started".into(),
            )),
        }
    }
}

/// Handle to the capture thread that owns the live stream
struct CpalStream {
    sample_rate: u32,
    stop: std_mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl CpalStream {
    fn shutdown(&mut self) -> Result<(), CaptureError> {
        let _ = self.stop.send(());
        match self.thread.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| CaptureError::DeviceUnavailable("capture thread panicked".into())),
            None => Ok(()),
        }
    }
}

impl CaptureStream for CpalStream {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn release(mut self: Box<Self>) -> Result<(), CaptureError> {
        self.shutdown()
    }
}

impl Drop for CpalStream {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
