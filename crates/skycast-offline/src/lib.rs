//! Offline cache worker for SkyCast.
//!
//! Pre-populates a versioned cache of static assets and answers requests
//! network-first, falling back to the cache when the network is gone.

pub mod error;
pub mod storage;
pub mod worker;

pub use error::OfflineError;
pub use storage::{CacheStorage, CachedEntry, MemoryCacheStorage, SqliteCacheStorage};
pub use worker::CacheWorker;
