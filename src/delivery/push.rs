//! Push delivery: one server-sent event per job

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use std::sync::Arc;

use crate::client::ReviewClient;
use crate::config::PushConfig;
use crate::error::{Error, Result};
use crate::types::job::ResultDocument;
use crate::types::JobSnapshot;

use super::sse::SseParser;
use super::DeliveryStrategy;

/// A live push channel scoped to one job id.
///
/// The channel carries at most one terminal event. `recv` returns it and
/// closes the channel; after `close` (or any terminal `recv` outcome) no
/// further bytes are read and no event is delivered.
pub struct Subscription {
    id: String,
    stream: Option<BoxStream<'static, reqwest::Result<Bytes>>>,
    parser: SseParser,
}

impl Subscription {
    pub(crate) async fn open(
        client: &reqwest::Client,
        base_url: &str,
        id: &str,
    ) -> Result<Self> {
        let url = format!("{}/api/v1/result/subscribe/{}", base_url, id);
        tracing::info!(url = %url, "opening push channel");

        let response = client
            .get(&url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::channel(format!(
                "subscribe answered {}: {}",
                status, body
            )));
        }

        Ok(Self {
            id: id.to_string(),
            stream: Some(response.bytes_stream().boxed()),
            parser: SseParser::new(),
        })
    }

    /// Wait for the terminal event. Whatever the outcome, the channel is
    /// closed afterwards.
    pub async fn recv(&mut self) -> Result<JobSnapshot> {
        let result = self.recv_inner().await;
        self.close();
        result
    }

    async fn recv_inner(&mut self) -> Result<JobSnapshot> {
        let Some(stream) = self.stream.as_mut() else {
            return Err(Error::channel("channel is closed"));
        };

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::channel(format!("stream error: {}", e)))?;
            if let Some(event) = self.parser.push(&chunk).into_iter().next() {
                let doc: ResultDocument = serde_json::from_str(&event.data)
                    .map_err(|e| Error::channel(format!("malformed push payload: {}", e)))?;
                tracing::info!(id = %self.id, "push channel delivered a result");
                return Ok(doc.into_snapshot(&self.id));
            }
        }

        Err(Error::channel("channel closed before a result arrived"))
    }

    /// Close the channel. Idempotent; subsequent `recv` calls fail without
    /// touching the network.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!(id = %self.id, "push channel closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.stream.is_none()
    }

    pub fn job_id(&self) -> &str {
        &self.id
    }
}

/// Deliver via a single push subscription, bounded by a deadline.
///
/// There is no reconnect: a channel that dies before its event surfaces as a
/// `Channel` error, and the caller decides whether to re-subscribe or fall
/// back to polling.
pub struct PushStrategy {
    client: Arc<ReviewClient>,
    config: PushConfig,
}

impl PushStrategy {
    pub fn new(client: Arc<ReviewClient>, config: PushConfig) -> Self {
        Self { client, config }
    }

    async fn wait(&self, id: &str) -> Result<JobSnapshot> {
        let deadline = self.config.deadline();
        let wait = async {
            let mut subscription = self.client.subscribe(id).await?;
            subscription.recv().await
        };

        match tokio::time::timeout(deadline, wait).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(id = %id, ?deadline, "push deadline exceeded");
                Err(Error::DeadlineExceeded { waited: deadline })
            }
        }
    }
}

#[async_trait]
impl DeliveryStrategy for PushStrategy {
    async fn wait_for_result(&self, id: &str) -> Result<JobSnapshot> {
        self.wait(id).await
    }

    fn name(&self) -> &str {
        "push"
    }
}
