//! Storage module for durable state
//!
//! The persistence collaborator is a key-value store of byte blobs. Reports,
//! profiles and the active-profile record each live under their own key.
//! Engines: local files, PostgreSQL, and process memory.

mod blob_store;
mod file_store;
mod memory_store;
mod postgres_store;

pub use blob_store::{keys, BlobStore, TimeoutBlobStore};
pub use file_store::FileBlobStore;
pub use memory_store::MemoryBlobStore;
pub use postgres_store::PgBlobStore;
