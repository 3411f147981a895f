//! Cache Module
//!
//! In-memory key/value cache with absolute TTL expiration, used for
//! read-through category lookups and verified identity tokens.

mod entry;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default absolute expiration for cached categories, in seconds (15 minutes)
pub const DEFAULT_CATEGORY_TTL: u64 = 15 * 60;

/// Cache store shared between request handlers and the cleanup task.
pub type SharedCache<V> = Arc<RwLock<CacheStore<V>>>;

/// Wraps a store for sharing.
pub fn shared<V>(store: CacheStore<V>) -> SharedCache<V> {
    Arc::new(RwLock::new(store))
}
