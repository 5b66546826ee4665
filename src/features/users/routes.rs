use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::users::handlers::onboarding_handler;
use crate::features::users::services::ProfileService;

pub fn routes(service: Arc<ProfileService>) -> Router {
    Router::new()
        .route(
            "/api/onboarding",
            get(onboarding_handler::get_onboarding_status),
        )
        .route(
            "/api/onboarding/complete",
            post(onboarding_handler::complete_onboarding),
        )
        .with_state(service)
}
