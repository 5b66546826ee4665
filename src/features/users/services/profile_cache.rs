use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::users::models::{Profile, UserRole};
use crate::modules::storage::{keys, BlobStore};
use crate::shared::constants::MIN_PASSWORD_LENGTH;
use crate::shared::persisted::{read_collection, try_read_collection, write_collection, ReadFailure};

/// Example accounts written on first run, one per role
const SEED_PROFILES: [(&str, &str, &str, UserRole); 3] = [
    (
        "primaria@oras.ro",
        "primaria123",
        "Primăria Oraș",
        UserRole::Municipality,
    ),
    (
        "spital@oras.ro",
        "spital123",
        "Spitalul Oraș",
        UserRole::Hospital,
    ),
    (
        "cetatean@exemplu.ro",
        "cetatean123",
        "Cetățean Exemplu",
        UserRole::Citizen,
    ),
];

/// Local profile records, the active-profile pointer and the onboarding
/// flag. Single-actor: callers serialize access.
pub struct ProfileCache {
    blobs: Arc<dyn BlobStore>,
    profiles: Vec<Profile>,
    current: Option<Profile>,
    has_seen_welcome: bool,
    /// Set while the stored collection could not be read. Writes are held
    /// so the in-memory seeds never replace profiles storage still holds.
    detached: bool,
}

impl ProfileCache {
    /// Restore state from storage, seeding the example profiles when none
    /// have ever been saved
    pub async fn load(blobs: Arc<dyn BlobStore>) -> Self {
        let (profiles, detached) = restore_profiles(blobs.as_ref()).await;

        let current = read_collection::<Profile>(blobs.as_ref(), keys::CURRENT_PROFILE)
            .await
            .into_iter()
            .next();

        let has_seen_welcome = blobs
            .get_flag(keys::HAS_SEEN_WELCOME)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to read onboarding flag: {}", e);
                false
            });

        tracing::debug!(
            "Profile cache loaded: profiles={}, active={:?}",
            profiles.len(),
            current.as_ref().map(|p| p.email.as_str())
        );

        Self {
            blobs,
            profiles,
            current,
            has_seen_welcome,
            detached,
        }
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Add a profile. Emails are unique ignoring case.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> Result<Profile> {
        if email.trim().is_empty() {
            return Err(AppError::Validation("Email is required".to_string()));
        }
        if name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        self.attach().await?;
        if self.find_by_email(email).is_some() {
            return Err(AppError::DuplicateEmail(email.trim().to_string()));
        }

        let profile = Profile::new(email, password, name, role);
        self.profiles.push(profile.clone());

        if let Err(e) = self.save_profiles().await {
            self.profiles.pop();
            return Err(e);
        }

        tracing::info!("Registered profile {} ({})", profile.id, profile.role);
        Ok(profile)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.email_matches(email))
    }

    /// Local convenience lookup; the identity provider remains the
    /// authority on credentials
    pub fn find_by_credentials(&self, email: &str, password: &str) -> Option<&Profile> {
        self.profiles
            .iter()
            .find(|p| p.email_matches(email) && p.password_matches(password))
    }

    pub fn current(&self) -> Option<&Profile> {
        self.current.as_ref()
    }

    pub async fn set_current(&mut self, profile: Profile) -> Result<()> {
        write_collection(
            self.blobs.as_ref(),
            keys::CURRENT_PROFILE,
            std::slice::from_ref(&profile),
        )
        .await?;
        tracing::info!("Active profile set to {}", profile.id);
        self.current = Some(profile);
        Ok(())
    }

    pub async fn clear(&mut self) -> Result<()> {
        self.blobs.delete(keys::CURRENT_PROFILE).await?;
        if let Some(previous) = self.current.take() {
            tracing::info!("Active profile {} cleared", previous.id);
        }
        Ok(())
    }

    pub fn has_seen_welcome(&self) -> bool {
        self.has_seen_welcome
    }

    pub async fn complete_onboarding(&mut self) -> Result<()> {
        self.blobs.set_flag(keys::HAS_SEEN_WELCOME, true).await?;
        self.has_seen_welcome = true;
        Ok(())
    }

    async fn save_profiles(&self) -> Result<()> {
        write_collection(self.blobs.as_ref(), keys::PROFILES, &self.profiles).await
    }

    /// Retry the read a failed load skipped. Errors while storage still does
    /// not answer.
    async fn attach(&mut self) -> Result<()> {
        if !self.detached {
            return Ok(());
        }

        let (profiles, detached) = restore_profiles(self.blobs.as_ref()).await;
        if detached {
            return Err(AppError::Persistence(
                "Profile storage is unreachable".to_string(),
            ));
        }

        tracing::info!("Profile storage reachable again, {} profiles", profiles.len());
        self.profiles = profiles;
        self.detached = false;
        Ok(())
    }
}

fn seed_profiles() -> Vec<Profile> {
    SEED_PROFILES
        .iter()
        .map(|(email, password, name, role)| Profile::new(email, password, name, *role))
        .collect()
}

/// Stored profiles, or the seeds when storage holds none. The flag is set
/// when storage could not be read at all; seeds are then kept in memory only.
async fn restore_profiles(blobs: &dyn BlobStore) -> (Vec<Profile>, bool) {
    match try_read_collection::<Profile>(blobs, keys::PROFILES).await {
        Ok(Some(profiles)) if !profiles.is_empty() => return (profiles, false),
        Ok(_) => {}
        Err(ReadFailure::Format(e)) => {
            tracing::warn!("Discarding corrupt profiles record: {}", e);
        }
        Err(ReadFailure::Unavailable(e)) => {
            tracing::error!("Profiles unreadable, holding writes until storage answers: {}", e);
            return (seed_profiles(), true);
        }
    }

    let profiles = seed_profiles();
    match write_collection(blobs, keys::PROFILES, &profiles).await {
        Ok(()) => tracing::info!("Seeded {} example profiles", profiles.len()),
        Err(e) => tracing::warn!("Seeded example profiles but could not persist: {}", e),
    }
    (profiles, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::MemoryBlobStore;
    use crate::shared::test_helpers::FlakyBlobStore;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    async fn fresh_cache() -> (Arc<MemoryBlobStore>, ProfileCache) {
        let blobs = Arc::new(MemoryBlobStore::new());
        let cache = ProfileCache::load(blobs.clone()).await;
        (blobs, cache)
    }

    #[tokio::test]
    async fn test_first_run_seeds_one_profile_per_role() {
        let (_, cache) = fresh_cache().await;

        assert_eq!(cache.profiles().len(), 3);
        for role in [UserRole::Citizen, UserRole::Municipality, UserRole::Hospital] {
            assert_eq!(
                cache.profiles().iter().filter(|p| p.role == role).count(),
                1
            );
        }
        assert!(cache
            .find_by_credentials("primaria@oras.ro", "primaria123")
            .is_some());
    }

    #[tokio::test]
    async fn test_seeding_is_idempotent() {
        let (blobs, mut cache) = fresh_cache().await;
        cache
            .register("nou@oras.ro", "parola123", "Nou", UserRole::Citizen)
            .await
            .unwrap();

        let reloaded = ProfileCache::load(blobs.clone()).await;
        assert_eq!(reloaded.profiles().len(), 4);

        let again = ProfileCache::load(blobs).await;
        assert_eq!(again.profiles(), reloaded.profiles());
    }

    #[tokio::test]
    async fn test_register_rejects_case_insensitive_duplicate() {
        let (_, mut cache) = fresh_cache().await;
        let email: String = SafeEmail().fake();
        let name: String = Name().fake();

        cache
            .register(&email.to_lowercase(), "secret1", &name, UserRole::Citizen)
            .await
            .unwrap();
        let before = cache.profiles().len();

        let err = cache
            .register(&email.to_uppercase(), "secret2", &name, UserRole::Hospital)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateEmail(_)));
        assert_eq!(cache.profiles().len(), before);
    }

    #[tokio::test]
    async fn test_register_validates_fields() {
        let (_, mut cache) = fresh_cache().await;

        let short = cache
            .register("a@b.ro", "12345", "A", UserRole::Citizen)
            .await
            .unwrap_err();
        assert!(matches!(short, AppError::Validation(_)));

        let nameless = cache
            .register("a@b.ro", "123456", "  ", UserRole::Citizen)
            .await
            .unwrap_err();
        assert!(matches!(nameless, AppError::Validation(_)));

        assert_eq!(cache.profiles().len(), 3);
    }

    #[tokio::test]
    async fn test_find_by_credentials() {
        let (_, mut cache) = fresh_cache().await;
        cache
            .register("Maria@Exemplu.ro", "parola123", "Maria", UserRole::Citizen)
            .await
            .unwrap();

        assert!(cache
            .find_by_credentials("maria@exemplu.ro", "parola123")
            .is_some());
        assert!(cache
            .find_by_credentials("maria@exemplu.ro", "PAROLA123")
            .is_none());
        assert!(cache
            .find_by_credentials("altcineva@exemplu.ro", "parola123")
            .is_none());
    }

    #[tokio::test]
    async fn test_current_profile_survives_reload() {
        let (blobs, mut cache) = fresh_cache().await;
        let citizen = cache
            .find_by_email("cetatean@exemplu.ro")
            .cloned()
            .unwrap();

        cache.set_current(citizen.clone()).await.unwrap();
        let reloaded = ProfileCache::load(blobs.clone()).await;
        assert_eq!(reloaded.current(), Some(&citizen));

        cache.clear().await.unwrap();
        assert!(cache.current().is_none());
        let reloaded = ProfileCache::load(blobs).await;
        assert!(reloaded.current().is_none());
    }

    #[tokio::test]
    async fn test_onboarding_flag_persists() {
        let (blobs, mut cache) = fresh_cache().await;
        assert!(!cache.has_seen_welcome());

        cache.complete_onboarding().await.unwrap();
        assert!(cache.has_seen_welcome());
        assert!(ProfileCache::load(blobs).await.has_seen_welcome());
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_partial_state() {
        let blobs = Arc::new(FlakyBlobStore::new());
        let mut cache = ProfileCache::load(blobs.clone()).await;
        blobs.fail_writes(true);

        let err = cache
            .register("x@y.ro", "secret1", "X", UserRole::Citizen)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
        assert!(cache.find_by_email("x@y.ro").is_none());

        let seeded = cache.profiles()[0].clone();
        assert!(cache.set_current(seeded).await.is_err());
        assert!(cache.current().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_storage_still_starts() {
        let blobs = Arc::new(FlakyBlobStore::new());
        let mut cache = ProfileCache::load(blobs.clone()).await;
        cache
            .register("nou@oras.ro", "parola123", "Nou", UserRole::Citizen)
            .await
            .unwrap();
        let stored = blobs.inner.get(keys::PROFILES).await.unwrap();
        let writes = blobs.inner.write_count();

        blobs.fail_reads(true);
        let cache = ProfileCache::load(blobs.clone()).await;
        assert_eq!(cache.profiles().len(), 3);
        assert!(cache.current().is_none());
        assert!(!cache.has_seen_welcome());

        assert_eq!(blobs.inner.write_count(), writes);
        assert_eq!(blobs.inner.get(keys::PROFILES).await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_profiles_survive_transient_read_failure() {
        let blobs = Arc::new(FlakyBlobStore::new());
        let mut cache = ProfileCache::load(blobs.clone()).await;
        cache
            .register("nou@oras.ro", "parola123", "Nou", UserRole::Citizen)
            .await
            .unwrap();

        blobs.fail_reads(true);
        let mut degraded = ProfileCache::load(blobs.clone()).await;
        let err = degraded
            .register("altul@oras.ro", "parola123", "Altul", UserRole::Citizen)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));

        blobs.fail_reads(false);
        let reloaded = ProfileCache::load(blobs.clone()).await;
        assert_eq!(reloaded.profiles().len(), 4);
        assert!(reloaded.find_by_email("nou@oras.ro").is_some());

        degraded
            .register("altul@oras.ro", "parola123", "Altul", UserRole::Citizen)
            .await
            .unwrap();
        assert_eq!(degraded.profiles().len(), 5);
        assert!(degraded.find_by_email("nou@oras.ro").is_some());
    }

    #[tokio::test]
    async fn test_corrupt_profiles_are_reseeded() {
        let blobs = Arc::new(MemoryBlobStore::new());
        blobs.put(keys::PROFILES, b"{garbage").await.unwrap();

        let cache = ProfileCache::load(blobs.clone()).await;
        assert_eq!(cache.profiles().len(), 3);
        assert_eq!(ProfileCache::load(blobs).await.profiles(), cache.profiles());
    }
}
