use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::categories::models::{Category, SeverityLevel};

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub slug: Category,
    pub label: String,
    pub icon: String,
    pub color: String,
    pub severity: u8,
    pub severity_level: SeverityLevel,
    pub deadline_days: i64,
    /// Reports in this category need a photo attached
    pub requires_photo: bool,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        let policy = c.policy();
        Self {
            slug: c,
            label: policy.label.to_string(),
            icon: policy.icon.to_string(),
            color: policy.color.to_string(),
            severity: policy.severity,
            severity_level: SeverityLevel::from_severity(policy.severity),
            deadline_days: policy.deadline_days,
            requires_photo: c.requires_photo(),
        }
    }
}
