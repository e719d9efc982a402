//! Key-value persistence for storefront preferences.
//!
//! Small per-shopper lists (recent searches and the like) are stored as
//! JSON strings under fixed keys. [`KeyValueStore`] is the raw string
//! capability; [`Cache`] layers typed JSON access on top of any store.
//!
//! # Example
//!
//! ```rust
//! use storefront_cache::{Cache, MemoryStore};
//!
//! let cache = Cache::new(MemoryStore::new());
//! cache.set("recentSearches", &vec!["phone".to_string()])?;
//!
//! let recent: Option<Vec<String>> = cache.get("recentSearches")?;
//! assert_eq!(recent, Some(vec!["phone".to_string()]));
//! # Ok::<(), storefront_cache::CacheError>(())
//! ```

mod error;
mod kv;

pub use error::CacheError;
#[cfg(target_arch = "wasm32")]
pub use kv::SpinStore;
pub use kv::{Cache, FileStore, KeyValueStore, MemoryStore};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KeyValueStore, MemoryStore};
}
