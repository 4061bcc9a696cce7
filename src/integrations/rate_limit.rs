// src/integrations/rate_limit.rs

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Minimum spacing the registry imposes on outbound calls: 1 request/second.
pub const REGISTRY_MIN_INTERVAL: Duration = Duration::from_millis(1000);

/// Process-wide spacing gate for registry calls.
///
/// One instance is created at wiring time and `Arc`-shared into every
/// resolver, so the spacing holds globally no matter how many scans arrive
/// in a burst. Never ambient/static state: injection keeps tests in control
/// of the interval.
///
/// `acquire` only ever delays; it cannot fail or reject. Waiters are served
/// in request order: the tokio mutex queues them fairly, and the lock is
/// held through the sleep so no later caller can slip past an earlier one.
pub struct RateLimiter {
    last_call_at: Mutex<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            // Backdated so the first acquire proceeds immediately
            last_call_at: Mutex::new(Instant::now() - min_interval),
            min_interval,
        }
    }

    /// Suspend until at least `min_interval` has elapsed since the start of
    /// the previous acquire, then record the new call instant and return.
    pub async fn acquire(&self) {
        let mut last = self.last_call_at.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}
