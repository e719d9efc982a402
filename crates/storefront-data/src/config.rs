//! Index client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;

/// Where the product index lives and how to reach it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndexConfig {
    /// Application identifier issued by the index service.
    pub app_id: String,
    /// Search-only API key.
    pub api_key: String,
    /// Primary index name.
    pub index: String,
    /// Host override (defaults to `{app_id}-dsn.algolia.net`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Total request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Retries after the first attempt for transient failures.
    pub max_retries: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            app_id: String::new(),
            api_key: String::new(),
            index: "products".to_string(),
            host: None,
            timeout_ms: 2_000,
            max_retries: 1,
        }
    }
}

impl IndexConfig {
    /// Base URL for query requests, without a trailing slash.
    pub fn base_url(&self) -> String {
        match self.host.as_deref().map(str::trim) {
            Some(host) if host.starts_with("http://") || host.starts_with("https://") => {
                host.trim_end_matches('/').to_string()
            }
            Some(host) if !host.is_empty() => format!("https://{}", host.trim_end_matches('/')),
            _ => format!("https://{}-dsn.algolia.net", self.app_id),
        }
    }

    /// Timeouts derived from `timeout_ms`.
    pub fn timeouts(&self) -> TimeoutConfig {
        TimeoutConfig::from_total(Duration::from_millis(self.timeout_ms))
    }

    /// Retry policy derived from `max_retries`.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries)
    }
}
