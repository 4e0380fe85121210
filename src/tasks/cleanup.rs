//! Expired Entry Purge Task
//!
//! Background task that periodically drops expired entries from the
//! in-memory backend so memory is reclaimed without waiting for a read.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::backend::MemoryBackend;

/// Spawns a background task that purges expired entries every
/// `cleanup_interval_secs` seconds.
///
/// Returns the task handle so it can be aborted on shutdown.
///
/// # Example
/// ```ignore
/// let backend = Arc::new(MemoryBackend::new(10_000));
/// let handle = spawn_cleanup_task(backend.clone(), 60);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task(backend: Arc<MemoryBackend>, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expired entry purge with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            match backend.purge_expired() {
                Ok(0) => debug!("Purge: no expired entries found"),
                Ok(removed) => info!("Purge: removed {} expired entries", removed),
                Err(err) => warn!(error = %err, "Purge failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CacheBackend;

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let backend = Arc::new(MemoryBackend::new(100));
        backend
            .put("expire_soon", b"v".to_vec(), Duration::from_millis(200))
            .unwrap();

        let handle = spawn_cleanup_task(backend.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Purged without any read touching the key
        assert_eq!(backend.len().unwrap(), 0);

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_preserves_valid_entries() {
        let backend = Arc::new(MemoryBackend::new(100));
        backend
            .put("long_lived", b"v".to_vec(), Duration::from_secs(3600))
            .unwrap();

        let handle = spawn_cleanup_task(backend.clone(), 1);

        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(backend.get("long_lived").unwrap(), Some(b"v".to_vec()));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let handle = spawn_cleanup_task(Arc::new(MemoryBackend::new(10)), 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
