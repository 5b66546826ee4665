use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::core::error::{AppError, Result};
use crate::modules::storage::BlobStore;

/// One file per key under a data directory.
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous blob intact.
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Open (and create if needed) the data directory
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            tracing::error!("Failed to create data directory {:?}: {}", root, e);
            AppError::Persistence(format!("cannot create data directory: {}", e))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(AppError::Persistence(format!("invalid blob key '{}'", key)));
        }
        Ok(self.root.join(format!("{}.blob", key)))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                tracing::error!("Failed to read blob {:?}: {}", path, e);
                Err(AppError::Persistence(format!("read '{}': {}", key, e)))
            }
        }
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("blob.tmp");

        tokio::fs::write(&tmp, value).await.map_err(|e| {
            tracing::error!("Failed to write blob {:?}: {}", tmp, e);
            AppError::Persistence(format!("write '{}': {}", key, e))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            tracing::error!("Failed to move blob into place {:?}: {}", path, e);
            AppError::Persistence(format!("write '{}': {}", key, e))
        })?;

        tracing::debug!("Wrote blob '{}' ({} bytes)", key, value.len());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                tracing::error!("Failed to delete blob {:?}: {}", path, e);
                Err(AppError::Persistence(format!("delete '{}': {}", key, e)))
            }
        }
    }
}
