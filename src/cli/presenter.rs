//! CLI presenter for output formatting

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::ports::MeterDisplay;
use crate::domain::recording::Duration;

/// Live meter line shown while recording
struct LiveMeter {
    bar: ProgressBar,
    rate_tag: String,
    elapsed_ms: u64,
}

/// Presenter for CLI output formatting
pub struct Presenter {
    meter: Mutex<Option<LiveMeter>>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self {
            meter: Mutex::new(None),
        }
    }

    fn with_meter<R>(&self, f: impl FnOnce(&mut Option<LiveMeter>) -> R) -> R {
        let mut meter = self.meter.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut meter)
    }

    /// Print above the meter line if one is showing
    fn print_line(&self, line: String) {
        self.with_meter(|meter| match meter {
            Some(live) => live.bar.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        });
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.print_line(format!("{} {}", "ℹ".cyan(), message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        self.print_line(format!("{} {}", "✓".green(), message));
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        self.print_line(format!("{} {}", "⚠".yellow(), message));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.print_line(format!("{} {}", "✗".red(), message));
    }

    /// Output text to stdout (saved file paths)
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Prompt on stderr without a newline
    pub fn prompt(&self, text: &str) {
        eprint!("{} {}", "?".cyan(), text);
        let _ = io::stderr().flush();
    }

    /// Print a key-value pair (for config list and status)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// `48 kHz`, `44.1 kHz`
    pub fn format_sample_rate(sample_rate: u32) -> String {
        if sample_rate % 1000 == 0 {
            format!("{} kHz", sample_rate / 1000)
        } else {
            format!("{:.1} kHz", sample_rate as f64 / 1000.0)
        }
    }

    /// Meter line message: `00:12 · 48 kHz`
    pub fn format_meter_message(elapsed_ms: u64, rate_tag: &str) -> String {
        format!("{} · {}", Duration::from_millis(elapsed_ms).clock(), rate_tag)
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

impl MeterDisplay for Presenter {
    fn recording_started(&self, sample_rate: u32) {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{prefix} {msg} [{bar:24.green/black}] {pos:>3}%")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        let rate_tag = Self::format_sample_rate(sample_rate);
        bar.set_prefix(format!("{}", "● REC".red().bold()));
        bar.set_message(Self::format_meter_message(0, &rate_tag));

        self.with_meter(|meter| {
            if let Some(old) = meter.take() {
                old.bar.finish_and_clear();
            }
            *meter = Some(LiveMeter {
                bar,
                rate_tag,
                elapsed_ms: 0,
            });
        });
    }

    fn recording_stopped(&self) {
        let finished = self.with_meter(|meter| {
            meter.take().map(|live| {
                live.bar.set_position(0);
                live.bar.finish_and_clear();
                (live.elapsed_ms, live.rate_tag)
            })
        });

        if let Some((elapsed_ms, rate_tag)) = finished {
            eprintln!(
                "{} Stopped at {}",
                "■".cyan(),
                Self::format_meter_message(elapsed_ms, &rate_tag)
            );
        }
    }

    fn set_elapsed(&self, elapsed_ms: u64) {
        self.with_meter(|meter| {
            if let Some(live) = meter.as_mut() {
                live.elapsed_ms = elapsed_ms;
                live.bar
                    .set_message(Self::format_meter_message(elapsed_ms, &live.rate_tag));
            }
        });
    }

    fn set_level(&self, percent: f32) {
        let position = percent.clamp(0.0, 100.0).round() as u64;
        self.with_meter(|meter| {
            if let Some(live) = meter.as_ref() {
                live.bar.set_position(position);
            }
        });
    }

    fn set_status(&self, message: &str) {
        self.info(message);
    }
}
