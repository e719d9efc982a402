//! CLI configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use storefront_data::IndexConfig;
use storefront_search::PriceConfig;
use storefront_suggest::SuggestConfig;

/// Overrides the index application id.
pub const APP_ID_ENV: &str = "STOREFRONT_SEARCH_APP_ID";
/// Overrides the index API key.
pub const API_KEY_ENV: &str = "STOREFRONT_SEARCH_API_KEY";

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Product index connection.
    #[serde(default)]
    pub search: IndexConfig,

    /// Price label settings.
    #[serde(default)]
    pub price: PriceConfig,

    /// Autocomplete tuning.
    #[serde(default)]
    pub suggest: SuggestConfig,

    /// Recent-search persistence.
    #[serde(default)]
    pub recent: RecentConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(&content, path.ends_with(".json"))
            .with_context(|| format!("Failed to parse config file: {}", path))
    }

    fn parse(content: &str, json: bool) -> Result<Self> {
        if json {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(toml::from_str(content)?)
        }
    }

    /// Apply credential overrides from the environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(app_id) = lookup(APP_ID_ENV).filter(|v| !v.trim().is_empty()) {
            self.search.app_id = app_id;
        }
        if let Some(api_key) = lookup(API_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.search.api_key = api_key;
        }
        self
    }
}

/// Where recent searches are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentConfig {
    /// JSON file holding the list (default: `~/.local/share/storefront/recent.json`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl RecentConfig {
    /// Resolved store path.
    pub fn store_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| data_dir().join("storefront").join("recent.json"))
    }
}

/// Get the platform-specific data directory.
fn data_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        std::env::temp_dir()
    }
}
