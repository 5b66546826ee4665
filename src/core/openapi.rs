use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::categories::{
    dtos as categories_dtos, handlers as categories_handlers, models as categories_models,
};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::features::users::{
    dtos as users_dtos, handlers::onboarding_handler, models as users_models,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        auth_handlers::logout,
        auth_handlers::me,
        // Onboarding
        onboarding_handler::get_onboarding_status,
        onboarding_handler::complete_onboarding,
        // Categories (public)
        categories_handlers::list_categories,
        categories_handlers::get_category,
        // Reports (active profile)
        reports_handlers::list_reports,
        reports_handlers::list_my_reports,
        reports_handlers::get_report_stats,
        reports_handlers::get_report,
        reports_handlers::create_report,
        reports_handlers::create_custom_report,
        reports_handlers::update_report_status,
        reports_handlers::delete_report,
        reports_handlers::delete_all_reports,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth_dtos::RegisterRequestDto,
            auth_dtos::LoginRequestDto,
            auth_dtos::AuthResponseDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            // Users
            users_models::UserRole,
            users_dtos::ProfileResponseDto,
            users_dtos::OnboardingStatusDto,
            ApiResponse<users_dtos::ProfileResponseDto>,
            ApiResponse<users_dtos::OnboardingStatusDto>,
            // Categories
            categories_models::Category,
            categories_models::SeverityLevel,
            categories_dtos::CategoryResponseDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            // Reports
            reports_models::Coordinates,
            reports_models::DeadlineStatus,
            reports_models::UrgencyBand,
            reports_dtos::CreateReportDto,
            reports_dtos::CreateCustomReportDto,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::ReportResponseDto,
            reports_dtos::ReportStatsDto,
            ApiResponse<Vec<reports_dtos::ReportResponseDto>>,
            ApiResponse<reports_dtos::ReportResponseDto>,
            ApiResponse<reports_dtos::ReportStatsDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, sign-in and the active profile"),
        (name = "onboarding", description = "First-run welcome flow"),
        (name = "categories", description = "Problem categories and their policy (public)"),
        (name = "reports", description = "Filing, viewing and resolving reports"),
    ),
    info(
        title = "Flow API",
        version = "0.1.0",
        description = "Civic problem reporting and tracking",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
