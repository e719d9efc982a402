//! The search index collaborator.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SearchError;
use crate::search::{ResultPage, SearchRequest};

/// Anything that can answer a [`SearchRequest`].
///
/// Hits are returned as raw JSON because listing records vary in field
/// naming; consumers normalise them into their own shapes.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run one search.
    async fn search(&self, request: &SearchRequest) -> Result<ResultPage<Value>, SearchError>;
}

#[async_trait]
impl<B: SearchBackend + ?Sized> SearchBackend for std::sync::Arc<B> {
    async fn search(&self, request: &SearchRequest) -> Result<ResultPage<Value>, SearchError> {
        (**self).search(request).await
    }
}
