//! Suspension points
//!
//! Every timed pause a stream takes goes through a [`Pacer`]. The default
//! implementation sleeps on the tokio timer, which lets tests drive time with
//! a paused clock.

use async_trait::async_trait;
use std::time::Duration;

/// Source of timed suspensions for running streams
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Suspend the calling stream for `duration`
    async fn pause(&self, duration: Duration);
}

/// Pacer backed by `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
