//! Time source used by polling and delayed refreshes.
//!
//! Production code uses [`TokioClock`]; tests either run on tokio's paused
//! clock or supply their own implementation that records requested sleeps.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

#[async_trait]
pub trait Clock: Send + Sync {
    /// Current instant, used to measure elapsed polling time
    fn now(&self) -> Instant;

    /// Wait for the given duration
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
