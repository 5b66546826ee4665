#[cfg(test)]
use crate::core::error::{AppError, Result};
#[cfg(test)]
use crate::features::users::models::{Profile, UserRole};
#[cfg(test)]
use crate::modules::storage::{BlobStore, MemoryBlobStore};

#[cfg(test)]
use async_trait::async_trait;
#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(test)]
pub fn citizen_profile(email: &str) -> Profile {
    Profile::new(email, "citizen123", "Test Citizen", UserRole::Citizen)
}

#[cfg(test)]
pub fn municipality_profile() -> Profile {
    Profile::new(
        "primarie@test.ro",
        "primarie123",
        "Test Municipality",
        UserRole::Municipality,
    )
}

#[cfg(test)]
pub fn hospital_profile() -> Profile {
    Profile::new("spital@test.ro", "spital123", "Test Hospital", UserRole::Hospital)
}

/// Attach `profile` as the acting profile on every request
#[cfg(test)]
pub fn with_profile(router: Router, profile: Profile) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let profile = profile.clone();
            async move {
                request.extensions_mut().insert(profile);
                let response: Response = next.run(request).await;
                response
            }
        },
    ))
}

/// Memory-backed blob store whose reads and writes can be made to fail
#[cfg(test)]
#[derive(Default)]
pub struct FlakyBlobStore {
    pub inner: MemoryBlobStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

#[cfg(test)]
impl FlakyBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[async_trait]
impl BlobStore for FlakyBlobStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Persistence(format!("injected read failure on '{}'", key)));
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence(format!("injected write failure on '{}'", key)));
        }
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Persistence(format!("injected write failure on '{}'", key)));
        }
        self.inner.delete(key).await
    }
}
