//! Line input from the terminal, shared by the session loop and the save prompt

use std::io::BufRead;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};

/// Source of typed lines. Clones share one underlying reader, so the
/// session loop and the save prompt never compete for stdin.
#[derive(Clone)]
pub struct TerminalInput {
    lines: Arc<Mutex<mpsc::UnboundedReceiver<String>>>,
}

impl TerminalInput {
    /// Read stdin on a dedicated thread.
    ///
    /// A blocking read cannot be cancelled, so the thread is detached and
    /// simply ends with the process.
    pub fn stdin() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let spawned = std::thread::Builder::new()
            .name("acid-stdin".into())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    let Ok(line) = line else { break };
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            });
        if let Err(e) = spawned {
            tracing::error!(error = %e, "failed to start stdin reader");
        }
        Self::from_receiver(rx)
    }

    pub fn from_receiver(rx: mpsc::UnboundedReceiver<String>) -> Self {
        Self {
            lines: Arc::new(Mutex::new(rx)),
        }
    }

    /// Next line without its newline; `None` at end of input
    pub async fn next_line(&self) -> Option<String> {
        self.lines.lock().await.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_the_same_lines() {
        let (tx, rx) = mpsc::unbounded_channel();
        let input = TerminalInput::from_receiver(rx);
        let other = input.clone();

        tx.send("one".to_string()).unwrap();
        tx.send("two".to_string()).unwrap();
        drop(tx);

        assert_eq!(input.next_line().await.as_deref(), Some("one"));
        assert_eq!(other.next_line().await.as_deref(), Some("two"));
        assert_eq!(input.next_line().await, None);
    }
}
