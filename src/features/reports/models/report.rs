use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{deadline_days, Category, MAX_SEVERITY, MIN_SEVERITY};
use crate::features::users::models::Profile;
use crate::shared::constants::{
    CUSTOM_REPORT_COLOR, CUSTOM_REPORT_ICON, CUSTOM_REPORT_LABEL, CUSTOM_REPORT_SEVERITY,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A civic problem pinned to a location.
///
/// Presentation fields and severity are copied from the category policy at
/// creation, so later policy changes never rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub location: Coordinates,
    /// Absent for custom reports
    #[serde(default)]
    pub category: Option<Category>,
    pub label: String,
    pub icon: String,
    pub color: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "crate::shared::encoding::option_base64")]
    pub photo: Option<Vec<u8>>,
    pub created_at: DateTime<Utc>,
    pub severity: u8,
    #[serde(default)]
    pub reporter_name: Option<String>,
    #[serde(default)]
    pub reporter_email: Option<String>,
    /// Absent only on records written before deadlines existed
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_resolved: bool,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Report {
    pub fn is_medical_emergency(&self) -> bool {
        self.category.is_some_and(Category::is_medical_emergency)
    }

    pub fn is_reported_by(&self, email: &str) -> bool {
        self.reporter_email
            .as_deref()
            .is_some_and(|reporter| reporter.eq_ignore_ascii_case(email.trim()))
    }

    /// Case-insensitive substring match over label, description and
    /// reporter name
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }

        [
            Some(self.label.as_str()),
            self.description.as_deref(),
            self.reporter_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Keeps `resolved_at` in step with `is_resolved`. Re-resolving an
    /// already resolved report keeps the original timestamp.
    pub(crate) fn set_resolved(&mut self, is_resolved: bool, now: DateTime<Utc>) {
        if is_resolved {
            if !self.is_resolved {
                self.resolved_at = Some(now);
            }
        } else {
            self.resolved_at = None;
        }
        self.is_resolved = is_resolved;
    }

    /// Restore the `is_resolved`/`resolved_at` pairing on records written
    /// without it. A resolved report with no timestamp counts as resolved at
    /// creation. Returns whether anything changed.
    pub(crate) fn repair_resolution(&mut self) -> bool {
        match (self.is_resolved, self.resolved_at) {
            (true, None) => {
                self.resolved_at = Some(self.created_at);
                true
            }
            (false, Some(_)) => {
                self.resolved_at = None;
                true
            }
            _ => false,
        }
    }
}

/// Attribution copied by value onto a report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reporter {
    pub name: String,
    pub email: String,
}

impl From<&Profile> for Reporter {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
        }
    }
}

/// Presentation overrides for a report outside the catalogue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomFields {
    pub label: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub severity: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportKind {
    Catalogue(Category),
    Custom(CustomFields),
}

/// Everything a reporting action supplies
#[derive(Debug, Clone)]
pub struct NewReport {
    pub kind: ReportKind,
    /// `None` when the device could not produce a fix
    pub location: Option<Coordinates>,
    pub description: Option<String>,
    pub photo: Option<Vec<u8>>,
    pub reporter: Option<Reporter>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl NewReport {
    pub fn catalogue(category: Category, location: Option<Coordinates>) -> Self {
        Self {
            kind: ReportKind::Catalogue(category),
            location,
            description: None,
            photo: None,
            reporter: None,
        }
    }

    pub fn custom(fields: CustomFields, location: Option<Coordinates>) -> Self {
        Self {
            kind: ReportKind::Custom(fields),
            location,
            description: None,
            photo: None,
            reporter: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_photo(mut self, photo: Vec<u8>) -> Self {
        self.photo = Some(photo);
        self
    }

    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Validate and materialize the report as of `now`
    pub fn into_report(self, now: DateTime<Utc>) -> Result<Report> {
        let location = self
            .location
            .ok_or_else(|| AppError::Validation("Location unavailable".to_string()))?;
        if !location.is_valid() {
            return Err(AppError::Validation(format!(
                "Coordinates out of range: ({}, {})",
                location.latitude, location.longitude
            )));
        }

        let description = non_blank(self.description);
        let photo = self.photo.filter(|bytes| !bytes.is_empty());

        let (category, label, icon, color, severity) = match self.kind {
            ReportKind::Catalogue(category) => {
                if category.requires_photo() && photo.is_none() {
                    return Err(AppError::Validation(format!(
                        "A photo is required for {} reports",
                        category.label()
                    )));
                }
                (
                    Some(category),
                    category.label().to_string(),
                    category.icon().to_string(),
                    category.color().to_string(),
                    category.severity(),
                )
            }
            ReportKind::Custom(fields) => {
                if photo.is_none() {
                    return Err(AppError::Validation(
                        "A photo is required for custom reports".to_string(),
                    ));
                }
                if description.is_none() {
                    return Err(AppError::Validation(
                        "A description is required for custom reports".to_string(),
                    ));
                }
                let severity = fields.severity.unwrap_or(CUSTOM_REPORT_SEVERITY);
                if !(MIN_SEVERITY..=MAX_SEVERITY).contains(&severity) {
                    return Err(AppError::Validation(format!(
                        "Severity must be between {} and {}",
                        MIN_SEVERITY, MAX_SEVERITY
                    )));
                }
                (
                    None,
                    non_blank(fields.label).unwrap_or_else(|| CUSTOM_REPORT_LABEL.to_string()),
                    non_blank(fields.icon).unwrap_or_else(|| CUSTOM_REPORT_ICON.to_string()),
                    non_blank(fields.color).unwrap_or_else(|| CUSTOM_REPORT_COLOR.to_string()),
                    severity,
                )
            }
        };

        let (reporter_name, reporter_email) = match self.reporter {
            Some(reporter) => (Some(reporter.name), Some(reporter.email)),
            None => (None, None),
        };

        Ok(Report {
            id: Uuid::new_v4(),
            location,
            category,
            label,
            icon,
            color,
            description,
            photo,
            created_at: now,
            severity,
            reporter_name,
            reporter_email,
            deadline: Some(now + Duration::days(deadline_days(severity))),
            is_resolved: false,
            resolved_at: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUCHAREST: Coordinates = Coordinates {
        latitude: 44.4268,
        longitude: 26.1025,
    };

    #[test]
    fn test_pothole_snapshots_policy() {
        let now = Utc::now();
        let report = NewReport::catalogue(Category::Pothole, Some(BUCHAREST))
            .into_report(now)
            .unwrap();

        assert_eq!(report.category, Some(Category::Pothole));
        assert_eq!(report.severity, 2);
        assert_eq!(report.label, Category::Pothole.label());
        assert_eq!(report.deadline, Some(now + Duration::days(7)));
        assert!(!report.is_resolved);
        assert!(report.resolved_at.is_none());
    }

    #[test]
    fn test_missing_location_is_rejected() {
        let result = NewReport::catalogue(Category::Graffiti, None).into_report(Utc::now());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_out_of_range_coordinates_are_rejected() {
        let location = Coordinates {
            latitude: 91.0,
            longitude: 0.0,
        };
        let result = NewReport::catalogue(Category::Graffiti, Some(location)).into_report(Utc::now());
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_trash_requires_photo() {
        let without = NewReport::catalogue(Category::Trash, Some(BUCHAREST)).into_report(Utc::now());
        assert!(matches!(without, Err(AppError::Validation(_))));

        let with = NewReport::catalogue(Category::Trash, Some(BUCHAREST))
            .with_photo(vec![1, 2, 3])
            .into_report(Utc::now());
        assert!(with.is_ok());
    }

    #[test]
    fn test_custom_report_defaults() {
        let now = Utc::now();
        let report = NewReport::custom(CustomFields::default(), Some(BUCHAREST))
            .with_description("  Bench missing a plank  ")
            .with_photo(vec![9])
            .into_report(now)
            .unwrap();

        assert!(report.category.is_none());
        assert_eq!(report.label, CUSTOM_REPORT_LABEL);
        assert_eq!(report.icon, CUSTOM_REPORT_ICON);
        assert_eq!(report.color, CUSTOM_REPORT_COLOR);
        assert_eq!(report.severity, 1);
        assert_eq!(report.description.as_deref(), Some("Bench missing a plank"));
        assert_eq!(report.deadline, Some(now + Duration::days(14)));
    }

    #[test]
    fn test_custom_report_validation() {
        let blank_description = NewReport::custom(CustomFields::default(), Some(BUCHAREST))
            .with_description("   ")
            .with_photo(vec![9])
            .into_report(Utc::now());
        assert!(matches!(blank_description, Err(AppError::Validation(_))));

        let no_photo = NewReport::custom(CustomFields::default(), Some(BUCHAREST))
            .with_description("Broken bench")
            .into_report(Utc::now());
        assert!(matches!(no_photo, Err(AppError::Validation(_))));

        let fields = CustomFields {
            severity: Some(6),
            ..Default::default()
        };
        let too_severe = NewReport::custom(fields, Some(BUCHAREST))
            .with_description("Broken bench")
            .with_photo(vec![9])
            .into_report(Utc::now());
        assert!(matches!(too_severe, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_custom_severity_drives_deadline() {
        let now = Utc::now();
        let fields = CustomFields {
            label: Some("Collapsed wall".to_string()),
            severity: Some(4),
            ..Default::default()
        };
        let report = NewReport::custom(fields, Some(BUCHAREST))
            .with_description("Wall fell on the sidewalk")
            .with_photo(vec![1])
            .into_report(now)
            .unwrap();

        assert_eq!(report.label, "Collapsed wall");
        assert_eq!(report.deadline, Some(now + Duration::days(2)));
    }

    #[test]
    fn test_resolved_timestamp_tracks_flag() {
        let now = Utc::now();
        let mut report = NewReport::catalogue(Category::Pothole, Some(BUCHAREST))
            .into_report(now)
            .unwrap();

        report.set_resolved(true, now);
        assert_eq!(report.resolved_at, Some(now));

        report.set_resolved(true, now + Duration::hours(1));
        assert_eq!(report.resolved_at, Some(now));

        report.set_resolved(false, now);
        assert!(!report.is_resolved);
        assert!(report.resolved_at.is_none());
    }

    #[test]
    fn test_search_covers_label_description_and_reporter() {
        let report = NewReport::catalogue(Category::Pothole, Some(BUCHAREST))
            .with_description("Deep hole near the school")
            .with_reporter(Reporter {
                name: "Ana Popescu".to_string(),
                email: "ana@exemplu.ro".to_string(),
            })
            .into_report(Utc::now())
            .unwrap();

        assert!(report.matches_search("POTHOLE"));
        assert!(report.matches_search("school"));
        assert!(report.matches_search("popescu"));
        assert!(report.matches_search(""));
        assert!(!report.matches_search("flood"));
        assert!(report.is_reported_by("ANA@exemplu.ro"));
    }

    #[test]
    fn test_repair_resolution_pairs_flag_and_timestamp() {
        let mut report = NewReport::catalogue(Category::Pothole, Some(BUCHAREST))
            .into_report(Utc::now())
            .unwrap();
        assert!(!report.repair_resolution());

        report.is_resolved = true;
        assert!(report.repair_resolution());
        assert_eq!(report.resolved_at, Some(report.created_at));

        report.is_resolved = false;
        assert!(report.repair_resolution());
        assert!(report.resolved_at.is_none());
    }

    #[test]
    fn test_legacy_record_without_optional_fields() {
        let json = r#"{
            "id": "6f1c1e2a-3b4c-4d5e-8f90-a1b2c3d4e5f6",
            "location": {"latitude": 45.0, "longitude": 25.0},
            "category": "graffiti",
            "label": "Graffiti",
            "icon": "paintbrush.fill",
            "color": "purple",
            "created_at": "2024-03-01T10:00:00Z",
            "severity": 1
        }"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert!(report.deadline.is_none());
        assert!(!report.is_resolved);
        assert!(report.photo.is_none());
    }
}
