use std::{future::Future, time::Duration};

use backoff::{future::retry_notify, ExponentialBackoff, ExponentialBackoffBuilder};
use tokio::{
    sync::{broadcast, broadcast::error::RecvError, mpsc},
    task::JoinHandle,
};
use tracing::warn;

use crate::{LedgerChange, LedgerCollection, Result};

const SNAPSHOT_BUFFER: usize = 16;
const FETCH_RETRY_INITIAL: Duration = Duration::from_millis(100);
const FETCH_RETRY_MAX: Duration = Duration::from_secs(10);

// Keeps retrying until the subscription is dropped.
fn fetch_backoff() -> ExponentialBackoff {
    ExponentialBackoffBuilder::new()
        .with_initial_interval(FETCH_RETRY_INITIAL)
        .with_max_interval(FETCH_RETRY_MAX)
        .with_max_elapsed_time(None)
        .build()
}

/// Live query over one component collection.
///
/// Yields a first snapshot, then a new snapshot after every relevant change.
/// Dropping or cancelling the subscription stops its feed.
pub struct Subscription<T> {
    receiver: mpsc::Receiver<Vec<T>>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Subscription<T> {
    /// Feed snapshots produced by `fetch` each time `changes` reports a
    /// mutation on `(component_id, collection)`.
    ///
    /// `changes` must be obtained before the initial fetch so no mutation is missed.
    pub fn spawn<F, Fut>(
        mut changes: broadcast::Receiver<LedgerChange>,
        component_id: u64,
        collection: LedgerCollection,
        fetch: F,
    ) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(SNAPSHOT_BUFFER);
        let task = tokio::spawn(async move {
            loop {
                let snapshot = retry_notify(
                    fetch_backoff(),
                    || async { fetch().await.map_err(backoff::Error::transient) },
                    |e, delay: Duration| {
                        warn!(component_id, ?collection, error = %e, ?delay, "Could not load ledger snapshot, retrying");
                    },
                )
                .await;

                match snapshot {
                    Ok(snapshot) => {
                        if sender.send(snapshot).await.is_err() {
                            return;
                        }
                    }
                    // Permanent errors are never produced.
                    Err(_) => return,
                }

                loop {
                    match changes.recv().await {
                        Ok(change)
                            if change.component_id == component_id
                                && change.collection == collection =>
                        {
                            break
                        }
                        Ok(_) => continue,
                        // Missed notifications, reload.
                        Err(RecvError::Lagged(_)) => break,
                        Err(RecvError::Closed) => return,
                    }
                }
            }
        });

        Self { receiver, task }
    }

    /// Wait for the next snapshot. `None` once the feed is closed.
    pub async fn next(&mut self) -> Option<Vec<T>> {
        self.receiver.recv().await
    }

    pub fn cancel(self) {}
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
