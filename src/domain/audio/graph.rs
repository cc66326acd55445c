//! Fixed voice processing graph: compressor then presence shelf

use super::dynamics::{Compressor, VOICE_COMPRESSOR};
use super::shelf::HighShelf;

/// One named step of the processing pipeline
pub trait Stage: Send {
    fn name(&self) -> &'static str;

    /// Process a block in place
    fn process(&mut self, block: &mut [f32]);

    /// Forget filter/envelope state
    fn reset(&mut self);
}

impl Stage for Compressor {
    fn name(&self) -> &'static str {
        "compressor"
    }

    fn process(&mut self, block: &mut [f32]) {
        Compressor::process(self, block)
    }

    fn reset(&mut self) {
        Compressor::reset(self)
    }
}

impl Stage for HighShelf {
    fn name(&self) -> &'static str {
        "presence-shelf"
    }

    fn process(&mut self, block: &mut [f32]) {
        HighShelf::process(self, block)
    }

    fn reset(&mut self) {
        HighShelf::reset(self)
    }
}

/// Ordered chain of stages, built once per session and dropped as a unit
pub struct ProcessingGraph {
    sample_rate: u32,
    stages: Vec<Box<dyn Stage>>,
}

impl ProcessingGraph {
    /// The fixed voice/presence chain for `sample_rate`
    pub fn voice_presence(sample_rate: u32) -> Self {
        let rate = sample_rate as f32;
        Self {
            sample_rate,
            stages: vec![
                Box::new(Compressor::new(VOICE_COMPRESSOR, rate)),
                Box::new(HighShelf::presence(rate)),
            ],
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage over the block, in order
    pub fn process(&mut self, block: &mut [f32]) {
        for stage in self.stages.iter_mut() {
            stage.process(block);
        }
    }

    pub fn reset(&mut self) {
        for stage in self.stages.iter_mut() {
            stage.reset();
        }
    }
}

impl std::fmt::Debug for ProcessingGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessingGraph")
            .field("sample_rate", &self.sample_rate)
            .field("stages", &self.stage_names())
            .finish()
    }
}
