//! Cancelable debounce timer for coalescing rapid input
//!
//! Rapid submissions within the quiet window collapse to a single
//! settle callback carrying the latest value; each new submission
//! resets the timer. Standard debounce semantics, not throttle.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

/// Debounce timer backed by a worker task
///
/// Dropped timers abort their worker, canceling any pending settle.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    worker: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns a debounce worker with the given quiet window
    ///
    /// `on_settle` runs once per burst, with the last submitted value,
    /// after `window` of inactivity.
    pub fn spawn<F>(window: Duration, mut on_settle: F) -> Self
    where
        F: FnMut(T) + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let worker = tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(value) => latest = value,
                            None => break,
                        },
                        () = sleep(window) => break,
                    }
                }
                on_settle(latest);
            }
        });
        Self { tx, worker }
    }

    /// Submits a value, resetting the quiet window
    pub fn submit(&self, value: T) {
        let _ = self.tx.send(value);
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[tokio::test(start_paused = true)]
    async fn burst_coalesces_to_latest_value() {
        let settled = Arc::new(Mutex::new(Vec::new()));
        let sink = settled.clone();
        let debouncer = Debouncer::spawn(Duration::from_millis(200), move |v: String| {
            sink.lock().unwrap().push(v);
        });

        debouncer.submit("b".to_string());
        sleep(Duration::from_millis(50)).await;
        debouncer.submit("bi".to_string());
        sleep(Duration::from_millis(50)).await;
        debouncer.submit("bit".to_string());

        sleep(Duration::from_millis(400)).await;
        assert_eq!(*settled.lock().unwrap(), vec!["bit".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn separate_bursts_settle_separately() {
        let settled = Arc::new(Mutex::new(Vec::new()));
        let sink = settled.clone();
        let debouncer = Debouncer::spawn(Duration::from_millis(200), move |v: u32| {
            sink.lock().unwrap().push(v);
        });

        debouncer.submit(1);
        sleep(Duration::from_millis(300)).await;
        debouncer.submit(2);
        sleep(Duration::from_millis(300)).await;

        assert_eq!(*settled.lock().unwrap(), vec![1, 2]);
    }
}
