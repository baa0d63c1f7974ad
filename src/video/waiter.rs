//! Wait between status checks.

use async_trait::async_trait;
use std::time::Duration;

/// Suspends the polling loop between attempts.
#[async_trait]
pub trait PollWaiter: Send + Sync {
    /// Waits for `interval` without blocking the runtime.
    async fn wait(&self, interval: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioWaiter;

#[async_trait]
impl PollWaiter for TokioWaiter {
    async fn wait(&self, interval: Duration) {
        tokio::time::sleep(interval).await;
    }
}
