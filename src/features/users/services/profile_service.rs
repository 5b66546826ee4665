use tokio::sync::Mutex;

use crate::core::error::Result;
use crate::features::users::models::{Profile, UserRole};
use crate::features::users::services::ProfileCache;

/// Shared handle to the profile cache. Every operation takes the lock for
/// its whole duration, so a registration and its persistence never
/// interleave with another request.
pub struct ProfileService {
    cache: Mutex<ProfileCache>,
}

impl ProfileService {
    pub fn new(cache: ProfileCache) -> Self {
        Self {
            cache: Mutex::new(cache),
        }
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<Profile> {
        self.cache
            .lock()
            .await
            .register(email, password, name, role)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Option<Profile> {
        self.cache.lock().await.find_by_email(email).cloned()
    }

    pub async fn find_by_credentials(&self, email: &str, password: &str) -> Option<Profile> {
        self.cache
            .lock()
            .await
            .find_by_credentials(email, password)
            .cloned()
    }

    pub async fn current(&self) -> Option<Profile> {
        self.cache.lock().await.current().cloned()
    }

    pub async fn set_current(&self, profile: Profile) -> Result<()> {
        self.cache.lock().await.set_current(profile).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.cache.lock().await.clear().await
    }

    pub async fn has_seen_welcome(&self) -> bool {
        self.cache.lock().await.has_seen_welcome()
    }

    pub async fn complete_onboarding(&self) -> Result<()> {
        self.cache.lock().await.complete_onboarding().await
    }
}
