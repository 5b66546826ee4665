//! Versioned on-disk format for persisted collections.
//!
//! Every collection is written as `{"version": N, "items": [...]}`. A bare
//! JSON array is the unversioned layout written before the tag existed and
//! is read as version 0.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::error::{AppError, Result};
use crate::modules::storage::BlobStore;
use crate::shared::constants::PERSISTED_FORMAT_VERSION;

#[derive(Debug, Error)]
pub enum PersistedFormatError {
    #[error("malformed record: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported format version {found} (newest known is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    items: &'a [T],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCollection<T> {
    Versioned { version: u32, items: Vec<T> },
    Legacy(Vec<T>),
}

/// Collection read back from storage, with the version it was written in
#[derive(Debug)]
pub struct Decoded<T> {
    pub version: u32,
    pub items: Vec<T>,
}

pub fn encode_collection<T: Serialize>(
    items: &[T],
) -> std::result::Result<Vec<u8>, PersistedFormatError> {
    let envelope = EnvelopeRef {
        version: PERSISTED_FORMAT_VERSION,
        items,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

pub fn decode_collection<T: DeserializeOwned>(
    bytes: &[u8],
) -> std::result::Result<Decoded<T>, PersistedFormatError> {
    match serde_json::from_slice::<StoredCollection<T>>(bytes)? {
        StoredCollection::Versioned { version, items } => {
            if version > PERSISTED_FORMAT_VERSION {
                return Err(PersistedFormatError::UnsupportedVersion {
                    found: version,
                    supported: PERSISTED_FORMAT_VERSION,
                });
            }
            Ok(Decoded { version, items })
        }
        StoredCollection::Legacy(items) => Ok(Decoded { version: 0, items }),
    }
}

/// Why a stored collection could not be restored
#[derive(Debug, Error)]
pub enum ReadFailure {
    /// Storage did not answer; whatever it holds is still there
    #[error("storage unavailable: {0}")]
    Unavailable(AppError),

    #[error(transparent)]
    Format(#[from] PersistedFormatError),
}

/// Read a collection. `Ok(None)` means nothing was ever stored under `key`.
pub async fn try_read_collection<T: DeserializeOwned>(
    blobs: &dyn BlobStore,
    key: &str,
) -> std::result::Result<Option<Vec<T>>, ReadFailure> {
    let Some(bytes) = blobs.get(key).await.map_err(ReadFailure::Unavailable)? else {
        return Ok(None);
    };

    let decoded = decode_collection::<T>(&bytes)?;
    if decoded.version < PERSISTED_FORMAT_VERSION {
        tracing::info!(
            "Migrating '{}' from format v{} to v{}",
            key,
            decoded.version,
            PERSISTED_FORMAT_VERSION
        );
    }
    Ok(Some(decoded.items))
}

/// Read a collection, treating a missing, unreadable or corrupt blob as
/// empty. Only for records a later write replaces wholesale.
pub async fn read_collection<T: DeserializeOwned>(blobs: &dyn BlobStore, key: &str) -> Vec<T> {
    match try_read_collection(blobs, key).await {
        Ok(items) => items.unwrap_or_default(),
        Err(ReadFailure::Unavailable(e)) => {
            tracing::warn!("Failed to read '{}', starting empty: {}", key, e);
            Vec::new()
        }
        Err(ReadFailure::Format(e)) => {
            tracing::warn!("Discarding corrupt '{}' record: {}", key, e);
            Vec::new()
        }
    }
}

/// Serialize and hand the full collection to the blob store
pub async fn write_collection<T: Serialize>(
    blobs: &dyn BlobStore,
    key: &str,
    items: &[T],
) -> Result<()> {
    let bytes = encode_collection(items)
        .map_err(|e| AppError::Persistence(format!("encode '{}': {}", key, e)))?;
    blobs.put(key, &bytes).await
}
