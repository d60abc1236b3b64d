//! # envsync store
//!
//! Hierarchical parameter paths over a remote parameter store.
//!
//! ## Layout
//!
//! Parameters live under `/<base>/<environment>/<service>/<key>`. The base is
//! optional and may span several segments.
//!
//! ```text
//! PathBuilder ──> path
//!     │
//!     ├──> PaginatedLister (ParameterStore::list_by_path, page by page)
//!     │      └─> RawParameter[]
//!     │
//!     ├──> NormalizedParam (short name, secret flag)
//!     │
//!     ├──> ListingCache (path → ParamMap, process lifetime)
//!     │
//!     └──> TreeAggregator
//!            ├─> ParamTree   (env → service → key)
//!            └─> FrequencyMap (segment value → occurrences)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use envsync_store::{FileStore, ParamManager, StoreConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(FileStore::open(".envsync/store.json").await?);
//!     let manager = ParamManager::new(store, StoreConfig::default().with_base_path("/org"));
//!
//!     let params = manager.get_parameters_by_service("prod", "api", true).await?;
//!     for (key, param) in params.iter() {
//!         println!("{key}={}", param.value);
//!     }
//!     Ok(())
//! }
//! ```

mod cache;
mod client;
mod config;
mod error;
mod file_store;
mod lister;
mod manager;
mod memory;
mod param;
mod path;
mod tree;

pub use cache::ListingCache;
pub use client::{ListPage, ListRequest, ParameterStore, PutRequest, PutResult};
pub use config::{BasePath, StoreConfig, DEFAULT_PAGE_SIZE};
pub use error::{BackendError, Result, StoreError};
pub use file_store::FileStore;
pub use lister::PaginatedLister;
pub use manager::{ParamManager, ParamWrite};
pub use memory::{MemoryStore, MemoryStoreError};
pub use param::{
    normalize_all, NormalizedParam, ParamMap, ParamType, RawParameter, LIST_TAG, PLAIN_TAG,
    SECRET_TAG,
};
pub use path::{segment, ParamLocation, PathBuilder, PathLayout};
pub use tree::{build_frequency, build_tree, FrequencyMap, ParamTree};
