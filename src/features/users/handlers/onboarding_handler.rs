use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::users::dtos::OnboardingStatusDto;
use crate::features::users::services::ProfileService;
use crate::shared::types::ApiResponse;

/// Whether the welcome flow has been completed on this installation
#[utoipa::path(
    get,
    path = "/api/onboarding",
    responses(
        (status = 200, description = "Onboarding status", body = ApiResponse<OnboardingStatusDto>)
    ),
    tag = "onboarding"
)]
pub async fn get_onboarding_status(
    State(service): State<Arc<ProfileService>>,
) -> Result<Json<ApiResponse<OnboardingStatusDto>>> {
    let status = OnboardingStatusDto {
        has_seen_welcome: service.has_seen_welcome().await,
    };
    Ok(Json(ApiResponse::success(Some(status), None, None)))
}

/// Mark the welcome flow as seen. Idempotent.
#[utoipa::path(
    post,
    path = "/api/onboarding/complete",
    responses(
        (status = 200, description = "Onboarding completed", body = ApiResponse<OnboardingStatusDto>),
        (status = 500, description = "Flag could not be persisted")
    ),
    tag = "onboarding"
)]
pub async fn complete_onboarding(
    State(service): State<Arc<ProfileService>>,
) -> Result<Json<ApiResponse<OnboardingStatusDto>>> {
    service.complete_onboarding().await?;
    Ok(Json(ApiResponse::success(
        Some(OnboardingStatusDto {
            has_seen_welcome: true,
        }),
        Some("Onboarding completed".to_string()),
        None,
    )))
}
