//! Polling delivery with exponential backoff

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use crate::config::PollingConfig;
use crate::error::{Error, Result};
use crate::types::{JobSnapshot, JobStatus};

use super::{DeliveryStrategy, ResultSource};

/// Poll the result endpoint until the job is terminal.
///
/// Delays grow as `initial * factor^k` up to the cap. The budget is checked
/// before each sleep, so the accumulated wait never overshoots it and no
/// fetch happens after the budget is declared exhausted.
pub struct PollingStrategy {
    source: Arc<dyn ResultSource>,
    config: PollingConfig,
}

impl PollingStrategy {
    pub fn new(source: Arc<dyn ResultSource>, config: PollingConfig) -> Self {
        Self { source, config }
    }

    async fn poll(&self, id: &str) -> Result<JobSnapshot> {
        let budget = self.config.budget();
        let cap = self.config.max_delay();
        let mut delay = self.config.initial_delay();
        let mut elapsed = Duration::ZERO;

        loop {
            // Transport and not-found failures abort the loop; retrying them
            // would mask outages and expired ids as slow jobs.
            let snapshot = self.source.fetch(id).await?;
            match snapshot.status {
                JobStatus::Ready => {
                    tracing::info!(id = %id, waited = ?elapsed, "job ready");
                    return Ok(snapshot);
                }
                JobStatus::Error => {
                    let message = snapshot
                        .message
                        .unwrap_or_else(|| "backend reported a failed analysis".to_string());
                    tracing::warn!(id = %id, %message, "job failed");
                    return Err(Error::Analysis(message));
                }
                JobStatus::Pending => {}
            }

            if elapsed + delay > budget {
                tracing::warn!(id = %id, waited = ?elapsed, "poll budget exhausted");
                return Err(Error::DeadlineExceeded { waited: elapsed });
            }

            tracing::debug!(id = %id, delay = ?delay, "job not ready, backing off");
            sleep(delay).await;
            elapsed += delay;
            delay = cap.min(delay * self.config.backoff_factor);
        }
    }
}

#[async_trait]
impl DeliveryStrategy for PollingStrategy {
    async fn wait_for_result(&self, id: &str) -> Result<JobSnapshot> {
        self.poll(id).await
    }

    fn name(&self) -> &str {
        "polling"
    }
}
