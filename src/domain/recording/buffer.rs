//! Sample blocks and the recording buffer they accumulate into

/// One callback's worth of processed mono samples.
///
/// Immutable once created; ownership moves from the audio thread
/// to the frame collector.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBlock {
    samples: Box<[f32]>,
}

impl SampleBlock {
    /// Number of samples in the block
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the block carries no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Borrow the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

impl From<Vec<f32>> for SampleBlock {
    fn from(samples: Vec<f32>) -> Self {
        Self {
            samples: samples.into_boxed_slice(),
        }
    }
}

impl From<&[f32]> for SampleBlock {
    fn from(samples: &[f32]) -> Self {
        Self {
            samples: samples.into(),
        }
    }
}

/// Ordered blocks collected during one recording session.
///
/// Grows by [`push`](Self::push) while capturing; the recorder stops
/// mutating it once capture stops.
#[derive(Debug, Clone, Default)]
pub struct RecordingBuffer {
    blocks: Vec<SampleBlock>,
    sample_count: usize,
}

impl RecordingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block in arrival order
    pub fn push(&mut self, block: SampleBlock) {
        self.sample_count += block.len();
        self.blocks.push(block);
    }

    /// Total samples across all blocks
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    /// Concatenate every block into one contiguous sequence
    pub fn flatten(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.sample_count);
        for block in &self.blocks {
            out.extend_from_slice(block.samples());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty() {
        let buffer = RecordingBuffer::new();
        assert!(buffer.is_empty());
        assert_eq!(buffer.sample_count(), 0);
        assert!(buffer.flatten().is_empty());
    }

    #[test]
    fn push_tracks_running_count() {
        let mut buffer = RecordingBuffer::new();
        buffer.push(SampleBlock::from(vec![0.1, 0.2, 0.3]));
        buffer.push(SampleBlock::from(vec![0.4]));
        assert_eq!(buffer.sample_count(), 4);
        assert_eq!(buffer.block_count(), 2);
    }

    #[test]
    fn flatten_preserves_arrival_order() {
        let mut buffer = RecordingBuffer::new();
        buffer.push(SampleBlock::from(&[1.0, 2.0][..]));
        buffer.push(SampleBlock::from(vec![]));
        buffer.push(SampleBlock::from(vec![3.0, 4.0, 5.0]));
        assert_eq!(buffer.flatten(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }
}
