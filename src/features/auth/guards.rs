//! Role guards for the acting profile.
//!
//! The active-profile middleware places a [`Profile`] in the request
//! extensions; these guards read it and check the role.
//!
//! - citizen: files reports
//! - municipality / hospital (staff): resolve, reopen and wipe reports

use crate::core::error::AppError;
use crate::features::users::models::{Profile, UserRole};
use axum::{extract::FromRequestParts, http::request::Parts};

fn acting_profile(parts: &Parts) -> Result<Profile, AppError> {
    parts
        .extensions
        .get::<Profile>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("No active profile".to_string()))
}

/// Guard admitting only citizens.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireCitizen(profile): RequireCitizen) { ... }
/// ```
pub struct RequireCitizen(pub Profile);

impl<S> FromRequestParts<S> for RequireCitizen
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let profile = acting_profile(parts)?;

        if profile.role != UserRole::Citizen {
            return Err(AppError::Forbidden(
                "Only citizens can file reports".to_string(),
            ));
        }

        Ok(RequireCitizen(profile))
    }
}

/// Guard admitting municipality and hospital representatives
pub struct RequireStaff(pub Profile);

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let profile = acting_profile(parts)?;

        match profile.role {
            UserRole::Municipality | UserRole::Hospital => Ok(RequireStaff(profile)),
            UserRole::Citizen => Err(AppError::Forbidden(
                "Municipality or hospital access required".to_string(),
            )),
        }
    }
}
