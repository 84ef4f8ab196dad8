//! Fixed-interval rate gate

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep_until};
use tracing::trace;

/// Paces callers to at most `R` permits per second.
///
/// Permits are spaced by `ceil(1000 / R)` milliseconds with no burst
/// allowance; the first permit is granted immediately. Waiters are served in
/// arrival order (`tokio::sync::Mutex` is fair).
#[derive(Debug)]
pub struct RateGate {
    calls_per_second: u32,
    interval: Duration,
    last_grant: Mutex<Option<Instant>>,
}

impl RateGate {
    /// Create a gate for `calls_per_second`; zero is treated as one
    pub fn new(calls_per_second: u32) -> Self {
        let calls_per_second = calls_per_second.max(1);
        Self {
            calls_per_second,
            interval: Self::interval_for(calls_per_second),
            last_grant: Mutex::new(None),
        }
    }

    /// Minimum spacing between permits for a rate: `ceil(1000 / rate)` ms
    pub fn interval_for(calls_per_second: u32) -> Duration {
        let rate = u64::from(calls_per_second.max(1));
        Duration::from_millis(1000_u64.div_ceil(rate))
    }

    pub fn calls_per_second(&self) -> u32 {
        self.calls_per_second
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next permit is due, then take it
    pub async fn acquire(&self) {
        let mut last_grant = self.last_grant.lock().await;

        if let Some(previous) = *last_grant {
            let ready_at = previous + self.interval;
            if ready_at > Instant::now() {
                trace!(wait_ms = (ready_at - Instant::now()).as_millis() as u64, "rate gate waiting");
                sleep_until(ready_at).await;
            }
        }

        *last_grant = Some(Instant::now());
    }
}
