//! Level metering and oscilloscope trace math

/// Samples the analyzer looks at each frame
pub const ANALYZER_WINDOW: usize = 2048;

/// RMS-to-percent scale of the level meter
pub const METER_GAIN: f32 = 220.0;

/// Vertical excursion of the trace as a fraction of canvas height
pub const TRACE_AMPLITUDE: f32 = 0.35;

/// Root mean square of a window (0 for an empty window)
pub fn rms(window: &[f32]) -> f32 {
    if window.is_empty() {
        return 0.0;
    }
    let sum: f32 = window.iter().map(|v| v * v).sum();
    (sum / window.len() as f32).sqrt()
}

/// Meter position in percent, clamped to 0..=100
pub fn meter_percent(rms: f32) -> f32 {
    (rms * METER_GAIN).clamp(0.0, 100.0)
}

/// Sliding window over the most recent processed samples
#[derive(Debug, Clone)]
pub struct AnalyzerWindow {
    samples: Vec<f32>,
}

impl AnalyzerWindow {
    pub fn new(size: usize) -> Self {
        Self {
            samples: vec![0.0; size],
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Shift fresh samples in from the right, dropping the oldest
    pub fn push(&mut self, fresh: &[f32]) {
        let size = self.samples.len();
        if fresh.len() >= size {
            self.samples
                .copy_from_slice(&fresh[fresh.len() - size..]);
        } else {
            self.samples.copy_within(fresh.len().., 0);
            self.samples[size - fresh.len()..].copy_from_slice(fresh);
        }
    }

    pub fn clear(&mut self) {
        self.samples.fill(0.0);
    }

    /// Level meter value for the current window
    pub fn meter(&self) -> f32 {
        meter_percent(rms(&self.samples))
    }
}

/// Waveform mapped to canvas pixels, one point per column
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformTrace {
    pub width: u32,
    pub height: u32,
    pub points: Vec<(f32, f32)>,
}

impl WaveformTrace {
    /// Map `window` onto a `width` x `height` canvas, centered vertically
    pub fn from_window(window: &[f32], width: u32, height: u32) -> Self {
        let mid = height as f32 / 2.0;
        let scale = height as f32 * TRACE_AMPLITUDE;

        let points = if window.is_empty() {
            Vec::new()
        } else {
            let step = window.len() as f32 / width as f32;
            (0..width)
                .map(|x| {
                    let i = ((x as f32 * step) as usize).min(window.len() - 1);
                    (x as f32, mid + window[i] * scale)
                })
                .collect()
        };

        Self {
            width,
            height,
            points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_of_constant_is_its_magnitude() {
        assert!((rms(&[0.5; 64]) - 0.5).abs() < 1e-6);
        assert!((rms(&[-0.25; 64]) - 0.25).abs() < 1e-6);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn meter_scales_and_clamps() {
        assert_eq!(meter_percent(0.0), 0.0);
        assert!((meter_percent(0.1) - 22.0).abs() < 1e-4);
        assert_eq!(meter_percent(1.0), 100.0);
    }

    #[test]
    fn window_keeps_most_recent_samples() {
        let mut window = AnalyzerWindow::new(4);
        window.push(&[1.0, 2.0]);
        assert_eq!(window.samples(), &[0.0, 0.0, 1.0, 2.0]);

        window.push(&[3.0, 4.0, 5.0]);
        assert_eq!(window.samples(), &[2.0, 3.0, 4.0, 5.0]);

        window.push(&[6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(window.samples(), &[7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn window_meter_reflects_content() {
        let mut window = AnalyzerWindow::new(ANALYZER_WINDOW);
        assert_eq!(window.meter(), 0.0);
        window.push(&vec![0.2; ANALYZER_WINDOW]);
        assert!((window.meter() - 44.0).abs() < 1e-3);
        window.clear();
        assert_eq!(window.meter(), 0.0);
    }

    #[test]
    fn trace_has_one_point_per_column() {
        let window = vec![0.0; ANALYZER_WINDOW];
        let trace = WaveformTrace::from_window(&window, 640, 160);
        assert_eq!(trace.points.len(), 640);
        assert!(trace.points.iter().all(|&(_, y)| y == 80.0));
        assert_eq!(trace.points[639].0, 639.0);
    }

    #[test]
    fn trace_maps_amplitude_to_height() {
        // Sample index = floor(x * N / width)
        let window = [1.0, -1.0, 0.5, 0.0];
        let trace = WaveformTrace::from_window(&window, 4, 100);
        let ys: Vec<f32> = trace.points.iter().map(|p| p.1).collect();
        assert_eq!(ys, vec![85.0, 15.0, 67.5, 50.0]);
    }

    #[test]
    fn trace_of_empty_window_is_empty() {
        let trace = WaveformTrace::from_window(&[], 10, 10);
        assert!(trace.points.is_empty());
    }
}
