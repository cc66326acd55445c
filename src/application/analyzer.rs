//! Live analyzer: level meter and oscilloscope, fed by a lossy tap

use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use ringbuf::traits::{Consumer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::domain::audio::{AnalyzerWindow, WaveformTrace, ANALYZER_WINDOW};

use super::ports::{MeterDisplay, ScopeSurface};

/// Roughly one display refresh
pub const FRAME_INTERVAL: StdDuration = StdDuration::from_millis(16);

/// Room for a few frames of audio before the tap starts dropping
const TAP_CAPACITY: usize = ANALYZER_WINDOW * 8;

/// Producer half lives on the audio thread, consumer half in the analyzer task.
/// A full tap drops samples instead of waiting.
pub fn analyzer_tap() -> (HeapProd<f32>, HeapCons<f32>) {
    HeapRb::<f32>::new(TAP_CAPACITY).split()
}

/// Move everything queued in the tap into the window
pub fn drain_tap(tap: &mut HeapCons<f32>, window: &mut AnalyzerWindow, scratch: &mut [f32]) {
    loop {
        let n = tap.pop_slice(scratch);
        if n == 0 {
            break;
        }
        window.push(&scratch[..n]);
    }
}

/// Start the per-frame meter/scope loop. Abort the handle to stop it.
pub fn spawn_analyzer<D, S>(
    mut tap: HeapCons<f32>,
    display: Arc<D>,
    scope: Arc<Mutex<S>>,
    frame_interval: StdDuration,
) -> JoinHandle<()>
where
    D: MeterDisplay,
    S: ScopeSurface,
{
    tokio::spawn(async move {
        let mut window = AnalyzerWindow::new(ANALYZER_WINDOW);
        let mut scratch = vec![0.0f32; ANALYZER_WINDOW];
        let mut ticker = interval(frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            drain_tap(&mut tap, &mut window, &mut scratch);

            display.set_level(window.meter());

            {
                let mut canvas = scope.lock().unwrap_or_else(|e| e.into_inner());
                let (width, height) = canvas.size();
                canvas.draw(&WaveformTrace::from_window(window.samples(), width, height));
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringbuf::traits::Producer;

    #[test]
    fn tap_drops_instead_of_blocking() {
        let (mut prod, _cons) = analyzer_tap();
        let pushed = prod.push_slice(&vec![0.1; TAP_CAPACITY + 100]);
        assert_eq!(pushed, TAP_CAPACITY);
        assert_eq!(prod.push_slice(&[0.2]), 0);
    }

    #[test]
    fn drain_keeps_latest_window() {
        let (mut prod, mut cons) = analyzer_tap();
        let mut window = AnalyzerWindow::new(4);
        let mut scratch = vec![0.0; 3];

        prod.push_slice(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        drain_tap(&mut cons, &mut window, &mut scratch);

        assert_eq!(window.samples(), &[4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn drain_of_empty_tap_leaves_window() {
        let (_prod, mut cons) = analyzer_tap();
        let mut window = AnalyzerWindow::new(2);
        window.push(&[0.5, 0.5]);
        let mut scratch = vec![0.0; 8];
        drain_tap(&mut cons, &mut window, &mut scratch);
        assert_eq!(window.samples(), &[0.5, 0.5]);
    }
}
