//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use storefront_cache::FileStore;
use storefront_data::IndexClient;
use storefront_search::search::FilterCompiler;
use storefront_search::PriceRangeCodec;
use storefront_suggest::RecentSearchStore;

use crate::config::CliConfig;
use crate::output::Output;

const CONFIG_NAMES: [&str; 3] = ["storefront.toml", ".storefront.toml", "storefront.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config = match config_path {
            Some(path) => CliConfig::load(path)?,
            None => Self::find_config(&cwd).unwrap_or_default(),
        };

        Ok(Self {
            config: config.with_env_overrides(),
            output,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<CliConfig> {
        start.ancestors().find_map(|dir| {
            CONFIG_NAMES.iter().find_map(|name| {
                let path = dir.join(name);
                if !path.exists() {
                    return None;
                }
                tracing::debug!(path = %path.display(), "using config file");
                CliConfig::load(path.to_str()?).ok()
            })
        })
    }

    /// Price codec for the configured currency.
    pub fn codec(&self) -> PriceRangeCodec {
        PriceRangeCodec::new(self.config.price.clone())
    }

    /// Filter compiler for the configured currency.
    pub fn compiler(&self) -> FilterCompiler {
        FilterCompiler::new(self.codec())
    }

    /// Client for the configured product index.
    pub fn index_client(&self) -> Result<IndexClient> {
        IndexClient::new(self.config.search.clone()).context(
            "Search index is not configured (set [search] in storefront.toml or STOREFRONT_SEARCH_APP_ID / STOREFRONT_SEARCH_API_KEY)",
        )
    }

    /// Path of the recent-search file.
    pub fn recent_path(&self) -> PathBuf {
        self.config.recent.store_path()
    }

    /// Open the persisted recent-search list.
    pub fn recents(&self) -> Result<RecentSearchStore<FileStore>> {
        let path = self.recent_path();
        let store = FileStore::open(&path)
            .with_context(|| format!("Failed to open recent searches at {}", path.display()))?;
        Ok(RecentSearchStore::with_config(store, &self.config.suggest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_with(config: CliConfig) -> Context {
        Context {
            config,
            output: Output::new(false, true),
        }
    }

    #[test]
    fn test_recents_persist_to_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = CliConfig::default();
        config.recent.path = Some(dir.path().join("nested").join("recent.json"));
        let ctx = context_with(config);

        ctx.recents().unwrap().record_search("desk lamp");
        ctx.recents().unwrap().record_search("kettle");

        let reopened = ctx.recents().unwrap();
        assert_eq!(reopened.entries(), &["kettle", "desk lamp"]);
        assert!(ctx.recent_path().exists());
    }

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("storefront.toml"),
            "[search]\nindex = \"campus_products\"\n",
        )
        .unwrap();
        let nested = dir.path().join("apps").join("web");
        std::fs::create_dir_all(&nested).unwrap();

        let config = Context::find_config(&nested).unwrap();
        assert_eq!(config.search.index, "campus_products");
    }
}
