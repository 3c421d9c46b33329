//! Error types for the review client

use std::time::Duration;
use thiserror::Error;

/// Result type alias for review-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Review client errors
#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure: DNS, connect, timeout, or a response body that
    /// could not be decoded
    #[error("transport error: {0}")]
    Transport(String),

    /// The backend explicitly refused the submission (file type, size, or
    /// request shape); `detail` carries the response body verbatim
    #[error("submission rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// The job id is unknown to the backend (expired or never existed)
    #[error("unknown job id: {0}")]
    NotFound(String),

    /// The wait budget elapsed without a terminal result; the job may still
    /// complete later and can be watched again
    #[error("no result after {waited:?}")]
    DeadlineExceeded { waited: Duration },

    /// The push channel closed or errored before delivering a result
    #[error("push channel failed: {0}")]
    Channel(String),

    /// The backend reported a definitive analysis failure for this job
    #[error("analysis failed: {0}")]
    Analysis(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Media type outside the accepted document formats
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// Payload larger than the submission limit
    #[error("file too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Create a channel error
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(err.to_string())
    }
}
