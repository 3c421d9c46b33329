//! Delivery strategies: how a terminal job result reaches the caller

pub mod polling;
pub mod push;
pub mod sse;

pub use polling::PollingStrategy;
pub use push::{PushStrategy, Subscription};

use async_trait::async_trait;

use crate::error::Result;
use crate::types::JobSnapshot;

/// One-shot read of a job's current state.
///
/// Implemented by `ReviewClient`. Kept as a seam so the polling strategy can
/// be driven by any snapshot source.
#[async_trait]
pub trait ResultSource: Send + Sync {
    /// Perform exactly one status/result request.
    async fn fetch(&self, id: &str) -> Result<JobSnapshot>;
}

/// A mechanism that eventually yields a terminal job snapshot.
///
/// Implementations:
/// - `PollingStrategy`: repeated fetches with exponential backoff
/// - `PushStrategy`: a single server-push subscription
///
/// Exactly one strategy should be used per job id at a time.
#[async_trait]
pub trait DeliveryStrategy: Send + Sync {
    /// Wait until the job reaches a terminal state or the strategy's wait
    /// budget is exhausted.
    async fn wait_for_result(&self, id: &str) -> Result<JobSnapshot>;

    /// Strategy name for logging
    fn name(&self) -> &str;
}
