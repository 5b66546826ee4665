use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequireCitizen, RequireStaff};
use crate::features::reports::dtos::{
    CreateCustomReportDto, CreateReportDto, ReportListQuery, ReportResponseDto, ReportStatsDto,
    UpdateReportStatusDto,
};
use crate::features::reports::models::{NewReport, Report};
use crate::features::reports::services::{ReportService, ViewFilter};
use crate::features::users::models::Profile;
use crate::shared::types::{ApiResponse, Meta};

fn listing(reports: Vec<Report>) -> ApiResponse<Vec<ReportResponseDto>> {
    let total = reports.len() as i64;
    let dtos: Vec<ReportResponseDto> = reports.into_iter().map(ReportResponseDto::from).collect();
    ApiResponse::success(Some(dtos), None, Some(Meta { total }))
}

/// Reports visible to the active profile's role
#[utoipa::path(
    get,
    path = "/api/reports",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Role view of reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "No active profile")
    ),
    tag = "reports"
)]
pub async fn list_reports(
    profile: Profile,
    State(service): State<Arc<ReportService>>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let filter = ViewFilter::from(query);
    let reports = service.list_for(&profile, &filter).await;
    Ok(Json(listing(reports)))
}

/// Reports filed by the active profile
#[utoipa::path(
    get,
    path = "/api/reports/mine",
    params(ReportListQuery),
    responses(
        (status = 200, description = "Own reports", body = ApiResponse<Vec<ReportResponseDto>>),
        (status = 401, description = "No active profile")
    ),
    tag = "reports"
)]
pub async fn list_my_reports(
    profile: Profile,
    State(service): State<Arc<ReportService>>,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponseDto>>>> {
    let filter = ViewFilter::from(query);
    let reports = service.list_mine(&profile, &filter).await;
    Ok(Json(listing(reports)))
}

/// Counts over the active profile's role view
#[utoipa::path(
    get,
    path = "/api/reports/stats",
    responses(
        (status = 200, description = "Report counts", body = ApiResponse<ReportStatsDto>),
        (status = 401, description = "No active profile")
    ),
    tag = "reports"
)]
pub async fn get_report_stats(
    profile: Profile,
    State(service): State<Arc<ReportService>>,
) -> Result<Json<ApiResponse<ReportStatsDto>>> {
    let stats = service.stats_for(&profile).await;
    Ok(Json(ApiResponse::success(Some(stats.into()), None, None)))
}

#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<ReportResponseDto>),
        (status = 401, description = "No active profile"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn get_report(
    profile: Profile,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.get_visible(&profile, id).await?;
    Ok(Json(ApiResponse::success(Some(report.into()), None, None)))
}

/// File a report in one of the catalogue categories
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Only citizens can file reports"),
        (status = 500, description = "Report could not be persisted")
    ),
    tag = "reports"
)]
pub async fn create_report(
    RequireCitizen(profile): RequireCitizen,
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.create(&profile, NewReport::from(dto)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report created".to_string()),
            None,
        )),
    ))
}

/// File a report outside the catalogue
#[utoipa::path(
    post,
    path = "/api/reports/custom",
    request_body = CreateCustomReportDto,
    responses(
        (status = 201, description = "Report created", body = ApiResponse<ReportResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Only citizens can file reports"),
        (status = 500, description = "Report could not be persisted")
    ),
    tag = "reports"
)]
pub async fn create_custom_report(
    RequireCitizen(profile): RequireCitizen,
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateCustomReportDto>,
) -> Result<(StatusCode, Json<ApiResponse<ReportResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = service.create(&profile, NewReport::from(dto)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(report.into()),
            Some("Report created".to_string()),
            None,
        )),
    ))
}

/// Resolve or reopen a report
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<ReportResponseDto>),
        (status = 403, description = "Municipality or hospital access required"),
        (status = 404, description = "Report not found")
    ),
    tag = "reports"
)]
pub async fn update_report_status(
    RequireStaff(profile): RequireStaff,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<ReportResponseDto>>> {
    let report = service.update_status(&profile, id, dto.is_resolved).await?;
    tracing::debug!("Status of {} set by {}", id, profile.id);
    Ok(Json(ApiResponse::success(
        Some(report.into()),
        Some("Report status updated".to_string()),
        None,
    )))
}

/// Delete one report. Unknown ids succeed.
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(
        ("id" = Uuid, Path, description = "Report ID")
    ),
    responses(
        (status = 204, description = "Report deleted"),
        (status = 403, description = "Not the reporter"),
        (status = 404, description = "Report outside the staff member's view")
    ),
    tag = "reports"
)]
pub async fn delete_report(
    profile: Profile,
    State(service): State<Arc<ReportService>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    service.remove(&profile, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete every report
#[utoipa::path(
    delete,
    path = "/api/reports",
    responses(
        (status = 204, description = "All reports deleted"),
        (status = 403, description = "Municipality or hospital access required")
    ),
    tag = "reports"
)]
pub async fn delete_all_reports(
    RequireStaff(profile): RequireStaff,
    State(service): State<Arc<ReportService>>,
) -> Result<StatusCode> {
    service.remove_all(&profile).await?;
    Ok(StatusCode::NO_CONTENT)
}
