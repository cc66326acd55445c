//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Value object representing a time duration.
/// Used for the optional auto-stop limit and for the elapsed-time display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    /// Create a Duration from milliseconds
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    /// Create a Duration from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    /// Get duration in seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get duration in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }

    /// Elapsed-time readout, `MM:SS` (minutes keep growing past 99)
    pub fn clock(&self) -> String {
        let secs = self.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

impl From<StdDuration> for Duration {
    fn from(d: StdDuration) -> Self {
        Self::from_millis(d.as_millis() as u64)
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Parse a duration string into a Duration value object.
    /// Supported formats: "30s", "1m", "2m30s", "90s"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();

        let mut minutes: u64 = 0;
        let mut seconds: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
            } else if ch == 'm' && !current_num.is_empty() {
                minutes = current_num
                    .parse()
                    .map_err(|_| DurationParseError { input: s.to_string() })?;
                current_num.clear();
                found_any = true;
            } else if ch == 's' && !current_num.is_empty() {
                seconds = current_num
                    .parse()
                    .map_err(|_| DurationParseError { input: s.to_string() })?;
                current_num.clear();
                found_any = true;
            } else {
                return Err(DurationParseError { input: s.to_string() });
            }
        }

        // Leftover digits without a unit
        if !current_num.is_empty() || !found_any {
            return Err(DurationParseError { input: s.to_string() });
        }

        let total_ms = (minutes * 60 + seconds) * 1000;

        if total_ms == 0 {
            return Err(DurationParseError { input: s.to_string() });
        }

        Ok(Self { milliseconds: total_ms })
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seconds_only() {
        let d: Duration = "30s".parse().unwrap();
        assert_eq!(d.as_secs(), 30);
        assert_eq!(d.as_millis(), 30000);
    }

    #[test]
    fn parse_minutes_and_seconds() {
        let d: Duration = "2m30s".parse().unwrap();
        assert_eq!(d.as_secs(), 150);
    }

    #[test]
    fn parse_case_insensitive_with_whitespace() {
        let d: Duration = "  1M30S ".parse().unwrap();
        assert_eq!(d.as_secs(), 90);
    }

    #[test]
    fn parse_rejects_zero_and_garbage() {
        assert!("".parse::<Duration>().is_err());
        assert!("0s".parse::<Duration>().is_err());
        assert!("30".parse::<Duration>().is_err());
        assert!("30x".parse::<Duration>().is_err());
    }

    #[test]
    fn display_round_trips_units() {
        assert_eq!(Duration::from_secs(30).to_string(), "30s");
        assert_eq!(Duration::from_secs(120).to_string(), "2m");
        assert_eq!(Duration::from_secs(150).to_string(), "2m30s");
    }

    #[test]
    fn clock_pads_minutes_and_seconds() {
        assert_eq!(Duration::from_millis(0).clock(), "00:00");
        assert_eq!(Duration::from_millis(999).clock(), "00:00");
        assert_eq!(Duration::from_millis(61_500).clock(), "01:01");
        assert_eq!(Duration::from_secs(100 * 60 + 5).clock(), "100:05");
    }

    #[test]
    fn from_std_duration() {
        let d = Duration::from(StdDuration::from_millis(1250));
        assert_eq!(d.as_millis(), 1250);
        assert_eq!(d.as_std(), StdDuration::from_millis(1250));
    }
}
