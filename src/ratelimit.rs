//! Outbound request rate limiting
//!
//! Enforces a minimum spacing between requests. The mutex is held across
//! the read-sleep-write so two racing callers cannot both observe the same
//! last-request instant and fire together; the second waits the full
//! interval measured from the first one's updated instant.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

/// Default minimum spacing between requests.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(1);

pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Block until at least `min_interval` has elapsed since the previous
    /// acquisition returned, then record the current instant.
    ///
    /// The instant is written only after the wait completes, so a caller
    /// cancelled mid-sleep does not advance the limiter and the next call
    /// is not double-penalized.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}
