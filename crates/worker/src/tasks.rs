//! Tracking for fire-and-forget background work.
//!
//! Strategies return a response before their cache writes and revalidation
//! fetches have finished. Those units are spawned into a [`TaskTracker`]
//! rather than detached, so the host can hold the worker alive until they
//! complete — the explicit form of the platform's "do not terminate me
//! until this work finishes" obligation. There is no cancellation and no
//! timeout: every tracked task runs to whatever end the transport produces.

use std::future::Future;

use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// A join set of background units of work.
#[derive(Debug, Default)]
pub struct TaskTracker {
    tasks: Mutex<JoinSet<()>>,
}

impl TaskTracker {
    pub fn new() -> Self {
        Self { tasks: Mutex::new(JoinSet::new()) }
    }

    /// Spawn a background unit and keep a handle to it.
    pub async fn spawn<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.lock().await.spawn(work);
    }

    /// Await every unit tracked so far.
    ///
    /// Used at host shutdown, and by tests to make background refreshes
    /// observable. Panicked tasks are logged and do not propagate.
    pub async fn settle(&self) {
        let mut tasks = self.tasks.lock().await;
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("background task failed: {e}");
            }
        }
    }

    /// Number of units not yet joined.
    pub async fn pending(&self) -> usize {
        self.tasks.lock().await.len()
    }
}
