use async_trait::async_trait;
use idworker::{Clock, SystemClock};
use jiff::Timestamp;

/// A [`Clock`] that can also suspend the calling task.
#[async_trait]
pub trait AsyncClock: Clock {
    /// Suspend the current task until the clock reaches the target time.
    async fn sleep_until(&self, target: Timestamp);
}

#[async_trait]
impl AsyncClock for SystemClock {
    async fn sleep_until(&self, target: Timestamp) {
        loop {
            let now = self.now();
            if now >= target {
                return;
            }
            tokio::time::sleep(target.duration_since(now).unsigned_abs()).await;
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
#[async_trait]
impl AsyncClock for idworker::clock::ManualClock {
    async fn sleep_until(&self, target: Timestamp) {
        self.wait_until(target);
    }
}
