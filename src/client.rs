//! HTTP client for the review service: submission and one-shot result fetch

use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::delivery::{ResultSource, Subscription};
use crate::error::{Error, Result};
use crate::types::job::ResultDocument;
use crate::types::{DocumentPayload, JobSnapshot, SubmitReceipt};

/// Client for the contract-review HTTP surface.
///
/// Holds two reqwest clients: one with the short synchronous-call timeout for
/// submit/fetch, and one without an overall timeout for the long-lived push
/// channel (only connection establishment is bounded there).
pub struct ReviewClient {
    http: reqwest::Client,
    streaming: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

impl ReviewClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let timeout = config.endpoint.timeout();
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(5)
            .build()?;
        let streaming = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            streaming,
            base_url: config.endpoint.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Submit a document for review and return the assigned job id.
    ///
    /// One multipart POST, no retry. Submission is not idempotent: the same
    /// document submitted twice creates two distinct jobs.
    pub async fn submit(&self, payload: DocumentPayload) -> Result<SubmitReceipt> {
        let url = format!("{}/api/v1/contracts/review", self.base_url);
        let (filename, media_type, bytes) = payload.into_parts();

        tracing::info!(url = %url, file = %filename, bytes = bytes.len(), "submitting document for review");

        let part = Part::bytes(bytes).file_name(filename).mime_str(&media_type)?;
        let form = Form::new().part("file", part);

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "submission refused");
            return Err(Error::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        let body: SubmitResponse = response.json().await?;
        if body.id.is_empty() {
            return Err(Error::transport("submission answer carried an empty id"));
        }
        tracing::info!(id = %body.id, "submission accepted");

        Ok(SubmitReceipt {
            id: body.id,
            submitted_at: Utc::now(),
        })
    }

    /// Fetch the current status/result for a job id. Exactly one round trip;
    /// safe to call repeatedly.
    pub async fn fetch_result(&self, id: &str) -> Result<JobSnapshot> {
        let url = format!("{}/api/v1/result/{}", self.base_url, id);
        tracing::debug!(url = %url, "fetching job result");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(id.to_string()));
        }

        // The service answers 202 with a small status body while the job is
        // still in flight; the status code is authoritative there.
        if status == StatusCode::ACCEPTED {
            let doc: ResultDocument = response.json().await?;
            return Ok(doc.into_pending_snapshot(id));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // A definitive analysis failure still carries a result document.
            if let Ok(doc) = serde_json::from_str::<ResultDocument>(&body) {
                if doc.status == "error" {
                    return Ok(doc.into_snapshot(id));
                }
            }
            return Err(Error::transport(format!(
                "result endpoint answered {}: {}",
                status, body
            )));
        }

        let doc: ResultDocument = response.json().await?;
        Ok(doc.into_snapshot(id))
    }

    /// Open the push channel for a job id.
    pub async fn subscribe(&self, id: &str) -> Result<Subscription> {
        Subscription::open(&self.streaming, &self.base_url, id).await
    }

    /// Base URL the client talks to, with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ResultSource for ReviewClient {
    async fn fetch(&self, id: &str) -> Result<JobSnapshot> {
        self.fetch_result(id).await
    }
}
