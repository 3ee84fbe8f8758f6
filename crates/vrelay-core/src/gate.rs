//! Single-permit admission gate for blocking specialist work.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::metrics;

/// Serializes blocking work while keeping the async runtime responsive.
///
/// At most one unit of work runs at any instant across all clones of the
/// gate. Waiters are admitted first-come-first-served: the underlying tokio
/// semaphore hands out permits in the order they were requested, and a
/// waiter that gives up (for example on timeout) simply leaves the queue.
///
/// Admitted work is moved onto tokio's blocking thread pool. The permit
/// travels with it and is released only when the work returns, even if the
/// caller stopped waiting for the result.
#[derive(Clone)]
pub struct ConcurrencyGate {
    permits: Arc<Semaphore>,
}

impl ConcurrencyGate {
    /// Create a gate admitting one unit of work at a time.
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(1)),
        }
    }

    /// Run blocking work once admitted and return its output.
    pub async fn run_exclusively<F, T>(&self, work: F) -> CoreResult<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let wait_start = Instant::now();
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| CoreError::GateClosed)?;
        let waited = wait_start.elapsed();
        metrics::record_gate_wait(waited.as_secs_f64());
        debug!(waited_ms = waited.as_millis() as u64, "Concurrency gate admitted work");

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            work()
        })
        .await
        .map_err(|e| CoreError::worker(format!("Blocking task join error: {}", e)))
    }

    /// Whether a unit of work is currently admitted.
    pub fn is_busy(&self) -> bool {
        self.permits.available_permits() == 0
    }
}

impl Default for ConcurrencyGate {
    fn default() -> Self {
        Self::new()
    }
}
