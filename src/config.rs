//! Configuration for the review client

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// Top-level client configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Review service endpoint
    #[serde(default)]
    pub endpoint: EndpointConfig,
    /// Polling strategy parameters
    #[serde(default)]
    pub polling: PollingConfig,
    /// Push subscription parameters
    #[serde(default)]
    pub push: PushConfig,
}

impl ClientConfig {
    /// Load configuration from a TOML file. Missing sections and fields fall
    /// back to their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("invalid config file: {}", e)))
    }
}

/// Review service endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the review service
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout for the synchronous calls (submit, one-shot fetch) in
    /// seconds. The push channel is exempt; only its connect phase is bounded.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

/// Exponential-backoff polling parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// First delay between polls in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Multiplicative growth factor applied after each poll
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: u32,
    /// Upper bound on a single delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Total wait budget in seconds
    #[serde(default = "default_budget_secs")]
    pub budget_secs: u64,
}

impl PollingConfig {
    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    pub fn budget(&self) -> Duration {
        Duration::from_secs(self.budget_secs)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            backoff_factor: default_backoff_factor(),
            max_delay_ms: default_max_delay_ms(),
            budget_secs: default_budget_secs(),
        }
    }
}

fn default_initial_delay_ms() -> u64 {
    2_000
}
fn default_backoff_factor() -> u32 {
    2
}
fn default_max_delay_ms() -> u64 {
    60_000
}
fn default_budget_secs() -> u64 {
    300 // 5 minutes
}

/// Push subscription parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Overall wait deadline in seconds. Defaults to the server's own
    /// emitter timeout of 15 minutes.
    #[serde(default = "default_push_deadline_secs")]
    pub deadline_secs: u64,
}

impl PushConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            deadline_secs: default_push_deadline_secs(),
        }
    }
}

fn default_push_deadline_secs() -> u64 {
    900 // 15 minutes
}
