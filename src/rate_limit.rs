// src/rate_limit.rs
//! Per-source request pacing.
//!
//! One [`RateLimiter`] per external source, configured with a requests-per-
//! second budget. `acquire()` sleeps out the remainder of the interval since
//! the last grant, then records the new grant time. The last-grant timestamp
//! sits behind an async mutex so concurrent acquirers of the same source
//! serialize correctly instead of racing the clock.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug)]
pub struct RateLimiter {
    last_grant: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    /// Limiter allowing `rate_per_sec` requests per second. Non-positive
    /// rates fall back to one request per second.
    pub fn new(rate_per_sec: f64) -> Self {
        let rate = if rate_per_sec > 0.0 { rate_per_sec } else { 1.0 };
        Self {
            last_grant: Mutex::new(None),
            min_interval: Duration::from_secs_f64(1.0 / rate),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Wait until the source's interval has elapsed, then take the slot.
    /// Holding the lock across the sleep is intentional: it makes grants
    /// strictly sequential under contention.
    pub async fn acquire(&self) {
        let mut last = self.last_grant.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                tracing::debug!(wait_ms = wait.as_millis() as u64, "rate limit wait");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }
}
