//! HTTP client for the hosted search index.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_search::search::{ResultPage, SearchBackend, SearchRequest};
use storefront_search::SearchError;

use crate::config::IndexConfig;
use crate::retry::RetryPolicy;
use crate::timeout::TimeoutConfig;

const APP_ID_HEADER: &str = "X-Algolia-Application-Id";
const API_KEY_HEADER: &str = "X-Algolia-API-Key";

/// Error type for fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP error: {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout(e.to_string())
        } else if e.is_connect() {
            FetchError::Connection(e.to_string())
        } else if e.is_decode() {
            FetchError::Deserialization(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

impl From<FetchError> for SearchError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Deserialization(msg) => SearchError::MalformedResponse(msg),
            FetchError::Config(msg) => SearchError::Config(msg),
            other => SearchError::Upstream(other.to_string()),
        }
    }
}

/// Fetch policy combining timeout and retry configuration.
#[derive(Debug, Clone, Default)]
pub struct FetchPolicy {
    /// Timeout configuration.
    pub timeout: TimeoutConfig,
    /// Retry policy.
    pub retry: RetryPolicy,
}

impl FetchPolicy {
    /// Create a new fetch policy.
    pub fn new(timeout: TimeoutConfig, retry: RetryPolicy) -> Self {
        Self { timeout, retry }
    }

    /// Create from index configuration.
    pub fn from_config(config: &IndexConfig) -> Self {
        Self::new(config.timeouts(), config.retry_policy())
    }
}

/// Body of a query request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryBody<'a> {
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    filters: Option<&'a str>,
    page: u32,
    hits_per_page: u32,
}

impl<'a> From<&'a SearchRequest> for QueryBody<'a> {
    fn from(request: &'a SearchRequest) -> Self {
        Self {
            query: &request.text,
            filters: request.filter_expression.as_deref(),
            page: request.page,
            hits_per_page: request.page_size,
        }
    }
}

/// Query response as the index service sends it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    hits: Vec<Value>,
    #[serde(default)]
    nb_hits: u64,
    #[serde(default)]
    nb_pages: u32,
    #[serde(default)]
    page: u32,
}

impl From<QueryResponse> for ResultPage<Value> {
    fn from(r: QueryResponse) -> Self {
        ResultPage::new(r.hits, r.nb_hits, r.nb_pages, r.page)
    }
}

/// Client for the index service's query endpoint.
#[derive(Debug, Clone)]
pub struct IndexClient {
    http: Client,
    config: IndexConfig,
    policy: FetchPolicy,
}

impl IndexClient {
    /// Create a client. Fails when credentials are missing.
    pub fn new(config: IndexConfig) -> Result<Self, FetchError> {
        let policy = FetchPolicy::from_config(&config);
        Self::with_policy(config, policy)
    }

    /// Create a client with an explicit policy.
    pub fn with_policy(config: IndexConfig, policy: FetchPolicy) -> Result<Self, FetchError> {
        if config.app_id.trim().is_empty() || config.api_key.trim().is_empty() {
            return Err(FetchError::Config(
                "search app_id and api_key must be set".to_string(),
            ));
        }
        if config.index.trim().is_empty() {
            return Err(FetchError::Config("search index name must be set".to_string()));
        }

        let http = Client::builder()
            .connect_timeout(policy.timeout.connect)
            .timeout(policy.timeout.total)
            .build()
            .map_err(|e| FetchError::Config(e.to_string()))?;

        Ok(Self {
            http,
            config,
            policy,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Query endpoint for the index that serves `request`'s sort order.
    pub fn endpoint(&self, request: &SearchRequest) -> String {
        format!(
            "{}/1/indexes/{}/query",
            self.config.base_url(),
            request.sort.index_name(&self.config.index)
        )
    }

    /// Run a query, retrying transient failures per the policy.
    pub async fn query(&self, request: &SearchRequest) -> Result<ResultPage<Value>, FetchError> {
        let url = self.endpoint(request);
        let body = QueryBody::from(request);
        let mut attempt = 0;

        loop {
            match self.send_once(&url, &body).await {
                Ok(response) => {
                    tracing::debug!(
                        query = %request.text,
                        hits = response.hits.len(),
                        total = response.nb_hits,
                        "index query succeeded"
                    );
                    return Ok(response.into());
                }
                Err(err) if self.policy.retry.should_retry(&err, attempt) => {
                    let delay = self.policy.retry.backoff.delay_for_attempt(attempt);
                    tracing::debug!(attempt, ?delay, error = %err, "retrying index query");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once(&self, url: &str, body: &QueryBody<'_>) -> Result<QueryResponse, FetchError> {
        let resp = self
            .http
            .post(url)
            .header(APP_ID_HEADER, &self.config.app_id)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Deserialization(e.to_string()))
    }
}

#[async_trait]
impl SearchBackend for IndexClient {
    async fn search(&self, request: &SearchRequest) -> Result<ResultPage<Value>, SearchError> {
        Ok(self.query(request).await?)
    }
}
