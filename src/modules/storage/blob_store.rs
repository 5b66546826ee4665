use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::error::{AppError, Result};

/// Well-known blob keys
pub mod keys {
    pub const REPORTS: &str = "reports";
    pub const PROFILES: &str = "profiles";
    pub const CURRENT_PROFILE: &str = "current_profile";
    pub const HAS_SEEN_WELCOME: &str = "has_seen_welcome";
}

const FLAG_TRUE: &[u8] = b"true";
const FLAG_FALSE: &[u8] = b"false";

/// Key-value store of opaque byte blobs.
///
/// Implementations must make `put` durable before returning.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read a blob; `None` when the key was never written or was deleted
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Replace the blob stored under `key`
    async fn put(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Remove the blob; deleting a missing key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    async fn get_flag(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.as_deref() == Some(FLAG_TRUE))
    }

    async fn set_flag(&self, key: &str, value: bool) -> Result<()> {
        self.put(key, if value { FLAG_TRUE } else { FLAG_FALSE })
            .await
    }
}

/// Bounds every call on the wrapped store, so a stalled engine surfaces
/// as a persistence failure instead of hanging the caller.
pub struct TimeoutBlobStore {
    inner: Arc<dyn BlobStore>,
    timeout: Duration,
}

impl TimeoutBlobStore {
    pub fn new(inner: Arc<dyn BlobStore>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        op: &str,
        key: &str,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| {
                tracing::error!(
                    "Blob store {} for key '{}' timed out after {:?}",
                    op,
                    key,
                    self.timeout
                );
                AppError::Persistence(format!("{} '{}' timed out", op, key))
            })?
    }
}

#[async_trait]
impl BlobStore for TimeoutBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.bounded("read", key, self.inner.get(key)).await
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        self.bounded("write", key, self.inner.put(key, value)).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.bounded("delete", key, self.inner.delete(key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::MemoryBlobStore;

    struct StalledBlobStore;

    #[async_trait]
    impl BlobStore for StalledBlobStore {
        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>> {
            std::future::pending().await
        }

        async fn put(&self, _key: &str, _value: &[u8]) -> Result<()> {
            std::future::pending().await
        }

        async fn delete(&self, _key: &str) -> Result<()> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_flags_default_to_false() {
        let store = MemoryBlobStore::new();
        assert!(!store.get_flag(keys::HAS_SEEN_WELCOME).await.unwrap());

        store.set_flag(keys::HAS_SEEN_WELCOME, true).await.unwrap();
        assert!(store.get_flag(keys::HAS_SEEN_WELCOME).await.unwrap());

        store.set_flag(keys::HAS_SEEN_WELCOME, false).await.unwrap();
        assert!(!store.get_flag(keys::HAS_SEEN_WELCOME).await.unwrap());
    }

    #[tokio::test]
    async fn test_timeout_surfaces_persistence_error() {
        let store = TimeoutBlobStore::new(Arc::new(StalledBlobStore), Duration::from_millis(20));

        let err = store.put(keys::REPORTS, b"[]").await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));

        let err = store.get(keys::REPORTS).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_timeout_passes_through_results() {
        let inner = Arc::new(MemoryBlobStore::new());
        let store = TimeoutBlobStore::new(inner.clone(), Duration::from_secs(1));

        store.put(keys::PROFILES, b"abc").await.unwrap();
        assert_eq!(
            store.get(keys::PROFILES).await.unwrap(),
            Some(b"abc".to_vec())
        );
        assert_eq!(inner.write_count(), 1);
    }
}
