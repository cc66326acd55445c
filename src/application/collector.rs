//! Frame collector: drains processed blocks into the recording buffer

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::domain::recording::{RecordingBuffer, SampleBlock};

/// Sending half handed to the audio thread.
///
/// `send` on an unbounded channel never blocks and never drops.
pub type BlockSender = mpsc::UnboundedSender<SampleBlock>;

/// Background task that owns the buffer while a recording is live
pub struct FrameCollector {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<RecordingBuffer>,
}

impl FrameCollector {
    /// Create the channel and start collecting from it
    pub fn spawn() -> (Self, BlockSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::spawn_with(rx), tx)
    }

    /// Start collecting from an existing receiver
    pub fn spawn_with(mut blocks: mpsc::UnboundedReceiver<SampleBlock>) -> Self {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut buffer = RecordingBuffer::new();

            loop {
                tokio::select! {
                    biased;
                    block = blocks.recv() => match block {
                        Some(block) => buffer.push(block),
                        None => break,
                    },
                    _ = &mut stop_rx => {
                        // Refuse new blocks, keep everything already queued
                        blocks.close();
                        while let Some(block) = blocks.recv().await {
                            buffer.push(block);
                        }
                        break;
                    }
                }
            }

            tracing::debug!(
                samples = buffer.sample_count(),
                blocks = buffer.block_count(),
                "frame collector finished"
            );
            buffer
        });

        Self {
            stop: Some(stop_tx),
            task,
        }
    }

    /// Stop collecting and hand back everything received, in order
    pub async fn finish(mut self) -> RecordingBuffer {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        match (&mut self.task).await {
            Ok(buffer) => buffer,
            Err(e) => {
                tracing::error!(error = %e, "frame collector task failed");
                RecordingBuffer::new()
            }
        }
    }

    /// Abandon the task and whatever it collected
    pub fn abort(self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn collects_blocks_in_order() {
        let (collector, tx) = FrameCollector::spawn();
        for i in 0..10 {
            tx.send(SampleBlock::from(vec![i as f32; 3])).unwrap();
        }

        let buffer = collector.finish().await;
        assert_eq!(buffer.sample_count(), 30);
        let flat = buffer.flatten();
        for i in 0..10 {
            assert_eq!(&flat[i * 3..i * 3 + 3], &[i as f32; 3]);
        }
    }

    #[tokio::test]
    async fn finish_drains_blocks_sent_before_stop() {
        let (collector, tx) = FrameCollector::spawn();
        for _ in 0..1000 {
            tx.send(SampleBlock::from(vec![0.5; 128])).unwrap();
        }

        // Sender still alive: finish must not wait for it
        let buffer = collector.finish().await;
        assert_eq!(buffer.sample_count(), 128_000);
        assert!(tx.send(SampleBlock::from(vec![0.0])).is_err());
    }

    #[tokio::test]
    async fn ends_when_sender_dropped() {
        let (collector, tx) = FrameCollector::spawn();
        tx.send(SampleBlock::from(vec![1.0, 2.0])).unwrap();
        drop(tx);

        let buffer = collector.finish().await;
        assert_eq!(buffer.flatten(), vec![1.0, 2.0]);
    }

    #[tokio::test]
    async fn empty_session_yields_empty_buffer() {
        let (collector, _tx) = FrameCollector::spawn();
        let buffer = collector.finish().await;
        assert!(buffer.is_empty());
    }
}
