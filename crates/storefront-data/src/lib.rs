//! Hosted search index client.
//!
//! This crate provides:
//! - `IndexClient` - the storefront's [`SearchBackend`](storefront_search::search::SearchBackend)
//!   over the index service's HTTP query API
//! - `IndexConfig` - credentials, index name and limits
//! - `TimeoutConfig` - connect and total timeouts
//! - `RetryPolicy` - retry strategies for transient failures

mod client;
mod config;
mod retry;
mod timeout;

pub use client::*;
pub use config::*;
pub use retry::*;
pub use timeout::*;
