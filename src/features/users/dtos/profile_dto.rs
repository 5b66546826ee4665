use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::users::models::{Profile, UserRole};

/// Public view of a profile; the credential digest never leaves the server
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponseDto {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub role_display_name: String,
    pub role_icon: String,
}

impl From<Profile> for ProfileResponseDto {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            email: profile.email,
            name: profile.name,
            role: profile.role,
            role_display_name: profile.role.display_name().to_string(),
            role_icon: profile.role.icon().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OnboardingStatusDto {
    pub has_seen_welcome: bool,
}
