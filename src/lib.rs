//! clause-review: async client for a contract-review service
//!
//! Submit a PDF or DOCX contract, receive an opaque job id, and obtain the
//! terminal clause findings either by polling the result endpoint with
//! exponential backoff or through a single server-push subscription.
//!
//! ```no_run
//! use std::sync::Arc;
//! use clause_review::{ClientConfig, DocumentPayload, PollingStrategy, ReviewClient};
//! use clause_review::delivery::DeliveryStrategy;
//!
//! # async fn run() -> clause_review::Result<()> {
//! let config = ClientConfig::default();
//! let client = Arc::new(ReviewClient::new(config.clone())?);
//!
//! let payload = DocumentPayload::from_path("contract.pdf")?;
//! let receipt = client.submit(payload).await?;
//!
//! let strategy = PollingStrategy::new(client.clone(), config.polling);
//! let snapshot = strategy.wait_for_result(&receipt.id).await?;
//! println!("{} clauses flagged", snapshot.issue_count());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod delivery;
pub mod error;
pub mod progress;
pub mod session;
pub mod types;

pub use client::ReviewClient;
pub use config::{ClientConfig, EndpointConfig, PollingConfig, PushConfig};
pub use delivery::{DeliveryStrategy, PollingStrategy, PushStrategy, ResultSource, Subscription};
pub use error::{Error, Result};
pub use progress::ProgressTicker;
pub use session::{ReviewSession, SessionEvent, SessionState};
pub use types::{Clause, DocumentPayload, JobSnapshot, JobStatus, SubmitReceipt};
