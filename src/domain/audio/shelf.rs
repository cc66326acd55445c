//! High-shelf biquad (RBJ cookbook, shelf slope 1)

use std::f32::consts::PI;

/// Presence boost: +4 dB above 2.5 kHz
pub const PRESENCE_SHELF_HZ: f32 = 2500.0;
pub const PRESENCE_SHELF_GAIN_DB: f32 = 4.0;

/// Normalized biquad coefficients (a0 == 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoefficients {
    pub fn high_shelf(frequency: f32, gain_db: f32, sample_rate: f32) -> Self {
        let a = 10f32.powf(gain_db / 40.0);
        // Keep the corner below Nyquist for low device rates
        let frequency = frequency.min(sample_rate * 0.49);
        let w0 = 2.0 * PI * frequency / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / 2.0 * std::f32::consts::SQRT_2;
        let two_sqrt_a_alpha = 2.0 * a.sqrt() * alpha;

        let b0 = a * ((a + 1.0) + (a - 1.0) * cos_w0 + two_sqrt_a_alpha);
        let b1 = -2.0 * a * ((a - 1.0) + (a + 1.0) * cos_w0);
        let b2 = a * ((a + 1.0) + (a - 1.0) * cos_w0 - two_sqrt_a_alpha);
        let a0 = (a + 1.0) - (a - 1.0) * cos_w0 + two_sqrt_a_alpha;
        let a1 = 2.0 * ((a - 1.0) - (a + 1.0) * cos_w0);
        let a2 = (a + 1.0) - (a - 1.0) * cos_w0 - two_sqrt_a_alpha;

        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

/// Transposed direct form II biquad
#[derive(Debug, Clone)]
pub struct HighShelf {
    coeffs: BiquadCoefficients,
    z1: f32,
    z2: f32,
}

impl HighShelf {
    pub fn new(frequency: f32, gain_db: f32, sample_rate: f32) -> Self {
        Self {
            coeffs: BiquadCoefficients::high_shelf(frequency, gain_db, sample_rate),
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// The voice presence shelf for a given sample rate
    pub fn presence(sample_rate: f32) -> Self {
        Self::new(PRESENCE_SHELF_HZ, PRESENCE_SHELF_GAIN_DB, sample_rate)
    }

    pub fn process_sample(&mut self, x: f32) -> f32 {
        let c = &self.coeffs;
        let y = c.b0 * x + self.z1;
        self.z1 = c.b1 * x - c.a1 * y + self.z2;
        self.z2 = c.b2 * x - c.a2 * y;
        y
    }

    pub fn process(&mut self, block: &mut [f32]) {
        for sample in block.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled_peak(shelf: &mut HighShelf, signal: impl Fn(usize) -> f32) -> f32 {
        let mut peak = 0.0f32;
        for n in 0..4800 {
            let y = shelf.process_sample(signal(n));
            if n > 4000 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn unity_gain_at_dc() {
        let mut shelf = HighShelf::presence(48000.0);
        let out = settled_peak(&mut shelf, |_| 0.5);
        assert!((out - 0.5).abs() < 1e-3, "got {out}");
    }

    #[test]
    fn full_boost_at_nyquist() {
        let mut shelf = HighShelf::presence(48000.0);
        let out = settled_peak(&mut shelf, |n| if n % 2 == 0 { 0.1 } else { -0.1 });
        let expected = 0.1 * 10f32.powf(PRESENCE_SHELF_GAIN_DB / 20.0);
        assert!((out - expected).abs() < 1e-3, "got {out}, want {expected}");
    }

    #[test]
    fn low_frequency_is_nearly_untouched() {
        let mut shelf = HighShelf::presence(48000.0);
        let w = 2.0 * PI * 100.0 / 48000.0;
        let out = settled_peak(&mut shelf, |n| (w * n as f32).sin() * 0.5);
        assert!((out - 0.5).abs() < 0.02, "got {out}");
    }

    #[test]
    fn reset_clears_state() {
        let mut shelf = HighShelf::presence(48000.0);
        shelf.process(&mut [1.0, -1.0, 1.0]);
        shelf.reset();
        let first = shelf.process_sample(0.0);
        assert_eq!(first, 0.0);
    }
}
