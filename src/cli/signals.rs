//! Shutdown signal handling (Ctrl+C, and SIGTERM on Unix)

use std::sync::Arc;

use tokio::sync::watch;

/// Shutdown signal shared by the one-shot and session runners
#[derive(Clone)]
pub struct ShutdownSignal {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Create a new shutdown signal handler
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    /// Request shutdown
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Resolve once shutdown has been requested
    pub async fn wait(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|stop| *stop).await;
    }

    /// Setup signal handler
    pub fn setup(&self) -> Result<(), std::io::Error> {
        let this = self.clone();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = signal(SignalKind::terminate())?;
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => tracing::debug!("received SIGINT"),
                    _ = sigterm.recv() => tracing::debug!("received SIGTERM"),
                }
                this.trigger();
            });
        }

        #[cfg(not(unix))]
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::debug!("received Ctrl+C");
                this.trigger();
            }
        });

        Ok(())
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn wait_blocks_until_triggered() {
        let signal = ShutdownSignal::new();
        let early = tokio::time::timeout(Duration::from_millis(20), signal.wait()).await;
        assert!(early.is_err());
    }

    #[tokio::test]
    async fn trigger_is_seen_by_clones() {
        let signal = ShutdownSignal::new();
        let other = signal.clone();
        other.trigger();
        tokio::time::timeout(Duration::from_secs(1), signal.wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wait_resolves_after_trigger() {
        let signal = ShutdownSignal::new();
        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.wait().await })
        };
        signal.trigger();
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn wait_returns_immediately_when_already_triggered() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        signal.wait().await;
    }
}
