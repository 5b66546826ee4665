use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::clients::AuthProvider;
use crate::features::auth::dtos::{AuthResponseDto, LoginRequestDto, RegisterRequestDto};
use crate::features::users::models::Profile;
use crate::features::users::ProfileService;

/// Register, sign in and sign out against the identity provider, keeping
/// the local profile cache and active profile in step
pub struct AuthService {
    provider: Arc<dyn AuthProvider>,
    profiles: Arc<ProfileService>,
}

impl AuthService {
    pub fn new(provider: Arc<dyn AuthProvider>, profiles: Arc<ProfileService>) -> Self {
        Self { provider, profiles }
    }

    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        if self.profiles.find_by_email(&dto.email).await.is_some() {
            return Err(AppError::DuplicateEmail(dto.email.trim().to_string()));
        }

        let token = self
            .provider
            .sign_up(dto.email.trim(), &dto.password, dto.name.trim())
            .await?;

        let profile = self
            .profiles
            .register(&dto.email, &dto.password, &dto.name, dto.role)
            .await?;
        self.profiles.set_current(profile.clone()).await?;

        Ok(AuthResponseDto {
            token: token.token,
            profile: profile.into(),
        })
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let token = self
            .provider
            .sign_in(dto.email.trim(), &dto.password)
            .await?;

        let profile = match self
            .profiles
            .find_by_credentials(&dto.email, &dto.password)
            .await
        {
            Some(profile) => profile,
            // Password may have changed at the provider since it was cached
            None if self.provider.verifies_credentials() => self
                .profiles
                .find_by_email(&dto.email)
                .await
                .ok_or_else(|| AppError::NotFound("No local profile for this account".to_string()))?,
            None => return Err(AppError::Unauthorized("Invalid credentials".to_string())),
        };

        self.profiles.set_current(profile.clone()).await?;
        tracing::info!("Profile {} signed in", profile.id);

        Ok(AuthResponseDto {
            token: token.token,
            profile: profile.into(),
        })
    }

    pub async fn logout(&self) -> Result<()> {
        self.profiles.clear().await
    }

    pub async fn me(&self) -> Result<Profile> {
        self.profiles
            .current()
            .await
            .ok_or_else(|| AppError::Unauthorized("No active profile".to_string()))
    }
}
