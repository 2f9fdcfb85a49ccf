//! Debounced text input.
//!
//! Every pushed value restarts the quiet period; only the last value of a
//! burst comes out. There is no maximum wait, so input that never pauses
//! never settles.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Sending half: feed raw edits in here.
#[derive(Debug, Clone)]
pub struct DebounceHandle {
    tx: mpsc::UnboundedSender<String>,
}

impl DebounceHandle {
    /// Returns false once the debouncer has shut down.
    pub fn push(&self, value: impl Into<String>) -> bool {
        self.tx.send(value.into()).is_ok()
    }
}

pub struct Debouncer;

impl Debouncer {
    /// Spawn the debounce loop on the current runtime.
    ///
    /// The loop ends when every handle is dropped; a value still waiting
    /// for its quiet period is flushed first.
    pub fn spawn(delay: Duration) -> (DebounceHandle, mpsc::UnboundedReceiver<String>, JoinHandle<()>) {
        let (in_tx, mut in_rx) = mpsc::unbounded_channel::<String>();
        let (out_tx, out_rx) = mpsc::unbounded_channel::<String>();

        let task = tokio::spawn(async move {
            while let Some(mut pending) = in_rx.recv().await {
                loop {
                    tokio::select! {
                        next = in_rx.recv() => match next {
                            Some(value) => {
                                trace!("debounce timer reset");
                                pending = value;
                            }
                            None => {
                                let _ = out_tx.send(pending);
                                return;
                            }
                        },
                        _ = tokio::time::sleep(delay) => {
                            if out_tx.send(pending).is_err() {
                                return;
                            }
                            break;
                        }
                    }
                }
            }
        });

        (DebounceHandle { tx: in_tx }, out_rx, task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_last_value_once() {
        let (handle, mut rx, _task) = Debouncer::spawn(Duration::from_millis(500));

        handle.push("B");
        handle.push("Bo");
        handle.push("Bonjour");

        assert_eq!(rx.recv().await.as_deref(), Some("Bonjour"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_keystroke_resets_timer() {
        let (handle, mut rx, _task) = Debouncer::spawn(Duration::from_millis(500));

        for word in ["h", "he", "hel", "hell"] {
            handle.push(word);
            tokio::time::sleep(Duration::from_millis(400)).await;
            assert!(rx.try_recv().is_err(), "settled too early");
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(rx.try_recv().ok().as_deref(), Some("hell"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_pauses_emit_separately() {
        let (handle, mut rx, _task) = Debouncer::spawn(Duration::from_millis(100));

        handle.push("first");
        assert_eq!(rx.recv().await.as_deref(), Some("first"));
        handle.push("second");
        assert_eq!(rx.recv().await.as_deref(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_flushes_pending() {
        let (handle, mut rx, task) = Debouncer::spawn(Duration::from_secs(60));
        handle.push("last words");
        drop(handle);

        assert_eq!(rx.recv().await.as_deref(), Some("last words"));
        task.await.unwrap();
        assert!(rx.recv().await.is_none());
    }
}
