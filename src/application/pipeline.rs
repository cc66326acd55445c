//! Audio-thread side of a recording: graph, analyzer tap, collector feed

use ringbuf::traits::Producer;
use ringbuf::HeapProd;

use crate::domain::audio::ProcessingGraph;
use crate::domain::recording::SampleBlock;

use super::collector::BlockSender;
use super::ports::BlockSink;

/// Runs the processing graph on each block, then fans the result out to
/// the analyzer tap (lossy) and the frame collector (lossless).
///
/// Processing happens in a reused scratch buffer; the only per-block
/// allocation is the copy the collector keeps, and it is skipped once the
/// collector has closed.
pub struct CaptureSink {
    graph: Option<ProcessingGraph>,
    tap: HeapProd<f32>,
    blocks: BlockSender,
    scratch: Vec<f32>,
}

impl CaptureSink {
    pub fn new(tap: HeapProd<f32>, blocks: BlockSender) -> Self {
        Self {
            graph: None,
            tap,
            blocks,
            scratch: Vec::new(),
        }
    }
}

impl BlockSink for CaptureSink {
    fn prepare(&mut self, sample_rate: u32) {
        match self.graph.as_mut() {
            // Same rate again (device restart): keep the chain, drop its state
            Some(graph) if graph.sample_rate() == sample_rate => graph.reset(),
            _ => self.graph = Some(ProcessingGraph::voice_presence(sample_rate)),
        }
    }

    fn accept(&mut self, samples: &[f32]) {
        self.scratch.clear();
        self.scratch.extend_from_slice(samples);
        if let Some(graph) = self.graph.as_mut() {
            graph.process(&mut self.scratch);
        }

        self.tap.push_slice(&self.scratch);
        // Receiver gone means the session is over; nothing to keep
        if !self.blocks.is_closed() {
            let _ = self.blocks.send(SampleBlock::from(self.scratch.as_slice()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::analyzer::analyzer_tap;
    use ringbuf::traits::Observer;
    use tokio::sync::mpsc;

    #[test]
    fn processed_block_reaches_collector_and_tap() {
        let (prod, cons) = analyzer_tap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = CaptureSink::new(prod, tx);

        sink.prepare(48000);
        sink.accept(&[0.9; 256]);

        let block = rx.try_recv().unwrap();
        assert_eq!(block.len(), 256);
        // Compressor is already pulling the level down
        assert!(block.samples()[255] < 0.9);
        assert_eq!(cons.occupied_len(), 256);
    }

    #[test]
    fn silence_passes_through_unchanged() {
        let (prod, _cons) = analyzer_tap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = CaptureSink::new(prod, tx);

        sink.prepare(44100);
        sink.accept(&[0.0; 64]);
        assert!(rx.try_recv().unwrap().samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn prepare_again_starts_from_clean_state() {
        let (prod, _cons) = analyzer_tap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = CaptureSink::new(prod, tx);

        sink.prepare(48000);
        sink.accept(&[0.9; 64]);
        let first = rx.try_recv().unwrap();

        sink.prepare(48000);
        sink.accept(&[0.9; 64]);
        let again = rx.try_recv().unwrap();
        assert_eq!(first.samples(), again.samples());
    }

    #[test]
    fn closed_collector_still_feeds_the_tap() {
        let (prod, cons) = analyzer_tap();
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut sink = CaptureSink::new(prod, tx);
        sink.prepare(48000);
        sink.accept(&[0.1; 8]);
        assert_eq!(cons.occupied_len(), 8);
    }

    #[test]
    fn varying_block_sizes_keep_their_length() {
        let (prod, _cons) = analyzer_tap();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sink = CaptureSink::new(prod, tx);
        sink.prepare(48000);

        for len in [512, 16, 0, 300] {
            sink.accept(&vec![0.0; len]);
            let block = rx.try_recv().unwrap();
            assert_eq!(block.len(), len);
        }
    }
}
