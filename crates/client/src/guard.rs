use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

/// Single-flight guard for token refresh.
///
/// A caller arriving while a refresh is in flight gets `false` immediately
/// instead of queueing a second refresh.
#[derive(Debug, Default)]
pub struct RefreshGuard {
    lock: Mutex<()>,
    in_flight: AtomicBool,
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl RefreshGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run `refresh` unless another refresh is already in flight.
    pub async fn run<F, Fut>(&self, refresh: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = bool>,
    {
        if self.is_in_flight() {
            return false;
        }

        let _lock = self.lock.lock().await;
        self.in_flight.store(true, Ordering::Release);
        let _in_flight = InFlight(&self.in_flight);

        refresh().await
    }
}
