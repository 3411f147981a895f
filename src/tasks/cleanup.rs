//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a background task that periodically sweeps expired entries from `cache`.
///
/// The task sleeps `cleanup_interval_secs` (at least one second) between
/// runs and holds the write lock only while sweeping. `name` identifies the
/// cache in log output.
///
/// # Returns
/// A JoinHandle for the spawned task, which is aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = cache::shared(CacheStore::<Category>::new(900));
/// let cleanup_handle = spawn_cleanup_task("categories", cache.clone(), 60);
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(
    name: &'static str,
    cache: SharedCache<V>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    let interval_secs = cleanup_interval_secs.max(1);
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            cache = name,
            "Starting TTL cleanup task with interval of {} seconds", interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup_expired()
            };

            if removed > 0 {
                info!(cache = name, "TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!(cache = name, "TTL cleanup: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{self, CacheStore};

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let cache = cache::shared(CacheStore::new(300));

        {
            let mut cache_guard = cache.write().await;
            cache_guard.insert_with_ttl("expire_soon", "value".to_string(), Some(1));
        }

        let handle = spawn_cleanup_task("test", cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(2500)).await;

        {
            let cache_guard = cache.read().await;
            assert_eq!(cache_guard.len(), 0, "Expired entry should have been cleaned up");
            assert_eq!(cache_guard.stats().expirations, 1);
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let cache = cache::shared(CacheStore::new(3600));

        {
            let mut cache_guard = cache.write().await;
            cache_guard.insert("long_lived", "value".to_string());
        }

        let handle = spawn_cleanup_task("test", cache.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        {
            let mut cache_guard = cache.write().await;
            assert_eq!(cache_guard.get("long_lived"), Some("value".to_string()));
        }

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let cache = cache::shared(CacheStore::<u8>::new(300));

        let handle = spawn_cleanup_task("test", cache, 0);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
