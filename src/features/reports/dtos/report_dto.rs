use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::{Category, SeverityLevel};
use crate::features::reports::models::{
    Coordinates, CustomFields, DeadlineStatus, NewReport, Report, UrgencyBand,
};
use crate::features::reports::services::{ViewFilter, ViewStats};

/// Request body for filing a catalogue report
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateReportDto {
    pub category: Category,
    /// Omitted when the device has no location fix; the request is then
    /// rejected
    pub location: Option<Coordinates>,
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    /// Base64-encoded image
    #[serde(default, with = "crate::shared::encoding::option_base64")]
    #[schema(value_type = Option<String>, format = Byte)]
    pub photo: Option<Vec<u8>>,
}

impl From<CreateReportDto> for NewReport {
    fn from(dto: CreateReportDto) -> Self {
        let mut new_report = NewReport::catalogue(dto.category, dto.location);
        if let Some(description) = dto.description {
            new_report = new_report.with_description(description);
        }
        if let Some(photo) = dto.photo {
            new_report = new_report.with_photo(photo);
        }
        new_report
    }
}

/// Request body for a problem outside the catalogue
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
pub struct CreateCustomReportDto {
    pub location: Option<Coordinates>,
    #[validate(length(
        min = 1,
        max = 2000,
        message = "Description must be between 1 and 2000 characters"
    ))]
    pub description: String,
    #[serde(default, with = "crate::shared::encoding::option_base64")]
    #[schema(value_type = Option<String>, format = Byte)]
    pub photo: Option<Vec<u8>>,
    #[validate(length(min = 1, max = 100, message = "Label must be between 1 and 100 characters"))]
    pub label: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Severity must be between 1 and 5"))]
    pub severity: Option<u8>,
}

impl From<CreateCustomReportDto> for NewReport {
    fn from(dto: CreateCustomReportDto) -> Self {
        let fields = CustomFields {
            label: dto.label,
            icon: dto.icon,
            color: dto.color,
            severity: dto.severity,
        };
        let new_report = NewReport::custom(fields, dto.location).with_description(dto.description);
        match dto.photo {
            Some(photo) => new_report.with_photo(photo),
            None => new_report,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateReportStatusDto {
    pub is_resolved: bool,
}

/// Query parameters for report listings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportListQuery {
    /// List resolved reports instead of active ones (default false)
    pub resolved: Option<bool>,
    /// Case-insensitive match on label, description or reporter name
    pub search: Option<String>,
}

impl From<ReportListQuery> for ViewFilter {
    fn from(query: ReportListQuery) -> Self {
        Self {
            resolved: query.resolved.unwrap_or(false),
            search: query.search.filter(|s| !s.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportResponseDto {
    pub id: Uuid,
    pub location: Coordinates,
    /// Absent for custom reports
    pub category: Option<Category>,
    pub label: String,
    pub icon: String,
    pub color: String,
    pub description: Option<String>,
    #[serde(default, with = "crate::shared::encoding::option_base64")]
    #[schema(value_type = Option<String>, format = Byte)]
    pub photo: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
    pub severity: u8,
    pub severity_level: SeverityLevel,
    pub reporter_name: Option<String>,
    pub reporter_email: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub deadline_status: DeadlineStatus,
    pub urgency: UrgencyBand,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ReportResponseDto {
    pub fn at(report: Report, now: DateTime<Utc>) -> Self {
        let deadline_status = DeadlineStatus::of(&report, now);
        Self {
            id: report.id,
            location: report.location,
            category: report.category,
            severity_level: SeverityLevel::from_severity(report.severity),
            label: report.label,
            icon: report.icon,
            color: report.color,
            description: report.description,
            photo: report.photo,
            created_at: report.created_at,
            severity: report.severity,
            reporter_name: report.reporter_name,
            reporter_email: report.reporter_email,
            deadline: report.deadline,
            deadline_status,
            urgency: deadline_status.urgency(),
            is_resolved: report.is_resolved,
            resolved_at: report.resolved_at,
        }
    }
}

impl From<Report> for ReportResponseDto {
    fn from(report: Report) -> Self {
        Self::at(report, Utc::now())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportStatsDto {
    pub total: usize,
    pub active: usize,
    pub resolved: usize,
}

impl From<ViewStats> for ReportStatsDto {
    fn from(stats: ViewStats) -> Self {
        Self {
            total: stats.total,
            active: stats.active,
            resolved: stats.resolved,
        }
    }
}
