//! Feed-forward soft-knee compressor

/// Compressor settings, all in dB / seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorParams {
    pub threshold_db: f32,
    pub knee_db: f32,
    pub ratio: f32,
    pub attack_secs: f32,
    pub release_secs: f32,
}

/// Voice settings: gentle levelling that keeps transients
pub const VOICE_COMPRESSOR: CompressorParams = CompressorParams {
    threshold_db: -28.0,
    knee_db: 24.0,
    ratio: 3.2,
    attack_secs: 0.005,
    release_secs: 0.200,
};

const SILENCE_DB: f32 = -120.0;

impl CompressorParams {
    /// Static gain curve: reduction in dB (<= 0) for an input level in dB
    pub fn gain_reduction_db(&self, level_db: f32) -> f32 {
        let slope = 1.0 / self.ratio - 1.0;
        let over = level_db - self.threshold_db;

        if 2.0 * over <= -self.knee_db {
            0.0
        } else if self.knee_db > 0.0 && 2.0 * over.abs() < self.knee_db {
            let x = over + self.knee_db / 2.0;
            slope * x * x / (2.0 * self.knee_db)
        } else {
            slope * over
        }
    }
}

/// Per-sample compressor with attack/release smoothing of the gain
#[derive(Debug, Clone)]
pub struct Compressor {
    params: CompressorParams,
    attack_coeff: f32,
    release_coeff: f32,
    reduction_db: f32,
}

impl Compressor {
    pub fn new(params: CompressorParams, sample_rate: f32) -> Self {
        Self {
            params,
            attack_coeff: time_coefficient(params.attack_secs, sample_rate),
            release_coeff: time_coefficient(params.release_secs, sample_rate),
            reduction_db: 0.0,
        }
    }

    /// Current smoothed gain reduction in dB
    pub fn reduction_db(&self) -> f32 {
        self.reduction_db
    }

    pub fn process_sample(&mut self, sample: f32) -> f32 {
        let level = sample.abs();
        let level_db = if level > 1e-6 {
            20.0 * level.log10()
        } else {
            SILENCE_DB
        };

        let target = self.params.gain_reduction_db(level_db);
        // More reduction follows the attack time, recovery the release time
        let coeff = if target < self.reduction_db {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.reduction_db = target + coeff * (self.reduction_db - target);

        sample * db_to_gain(self.reduction_db)
    }

    pub fn process(&mut self, block: &mut [f32]) {
        for sample in block.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.reduction_db = 0.0;
    }
}

fn time_coefficient(secs: f32, sample_rate: f32) -> f32 {
    if secs <= 0.0 || sample_rate <= 0.0 {
        return 0.0;
    }
    (-1.0 / (secs * sample_rate)).exp()
}

pub(crate) fn db_to_gain(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_is_flat_below_knee() {
        // Knee starts at threshold - knee/2 = -40 dB
        assert_eq!(VOICE_COMPRESSOR.gain_reduction_db(-60.0), 0.0);
        assert_eq!(VOICE_COMPRESSOR.gain_reduction_db(-40.0), 0.0);
    }

    #[test]
    fn curve_follows_ratio_above_knee() {
        // 28 dB over threshold, well past the knee
        let expected = (1.0 / 3.2 - 1.0) * 28.0;
        assert!((VOICE_COMPRESSOR.gain_reduction_db(0.0) - expected).abs() < 1e-4);
    }

    #[test]
    fn curve_is_continuous_at_knee_edges() {
        let p = VOICE_COMPRESSOR;
        let upper = p.threshold_db + p.knee_db / 2.0;
        let inside = p.gain_reduction_db(upper - 1e-3);
        let outside = p.gain_reduction_db(upper + 1e-3);
        assert!((inside - outside).abs() < 1e-2);
    }

    #[test]
    fn quiet_signal_passes_untouched() {
        let mut comp = Compressor::new(VOICE_COMPRESSOR, 48000.0);
        let mut block = vec![0.001f32; 4800];
        comp.process(&mut block);
        assert!(block.iter().all(|&s| (s - 0.001).abs() < 1e-7));
    }

    #[test]
    fn loud_signal_settles_to_static_curve() {
        let mut comp = Compressor::new(VOICE_COMPRESSOR, 48000.0);
        let mut block = vec![1.0f32; 48000];
        comp.process(&mut block);

        let expected = db_to_gain(VOICE_COMPRESSOR.gain_reduction_db(0.0));
        let last = *block.last().unwrap();
        assert!((last - expected).abs() < 1e-3, "got {last}, want {expected}");
    }

    #[test]
    fn attack_is_faster_than_release() {
        let mut comp = Compressor::new(VOICE_COMPRESSOR, 48000.0);

        // 5 ms of full scale gets most of the way to the target
        for _ in 0..240 {
            comp.process_sample(1.0);
        }
        let target = VOICE_COMPRESSOR.gain_reduction_db(0.0);
        assert!(comp.reduction_db() < target * 0.6);

        // 5 ms of silence recovers only a little
        let before = comp.reduction_db();
        for _ in 0..240 {
            comp.process_sample(0.0);
        }
        assert!(comp.reduction_db() < before * 0.9);
    }

    #[test]
    fn reset_clears_gain_state() {
        let mut comp = Compressor::new(VOICE_COMPRESSOR, 48000.0);
        comp.process(&mut vec![1.0; 1000]);
        comp.reset();
        assert_eq!(comp.reduction_db(), 0.0);
    }
}
