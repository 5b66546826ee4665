use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::reports::models::Report;

/// Time left before a report's deadline, derived on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DeadlineStatus {
    Resolved,
    NoDeadline,
    Overdue,
    Remaining { days: i64, hours: i64 },
}

/// Coarse urgency used for colouring deadline badges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyBand {
    Done,
    None,
    Critical,
    Warning,
    Caution,
    Comfortable,
}

impl DeadlineStatus {
    pub fn of(report: &Report, now: DateTime<Utc>) -> Self {
        if report.is_resolved {
            return DeadlineStatus::Resolved;
        }
        let Some(deadline) = report.deadline else {
            return DeadlineStatus::NoDeadline;
        };
        if now > deadline {
            return DeadlineStatus::Overdue;
        }

        let left = deadline - now;
        DeadlineStatus::Remaining {
            days: left.num_days(),
            hours: left.num_hours() % 24,
        }
    }

    pub fn urgency(self) -> UrgencyBand {
        match self {
            DeadlineStatus::Resolved => UrgencyBand::Done,
            DeadlineStatus::NoDeadline => UrgencyBand::None,
            DeadlineStatus::Overdue => UrgencyBand::Critical,
            DeadlineStatus::Remaining { days, .. } => match days {
                ..=0 => UrgencyBand::Critical,
                1..=2 => UrgencyBand::Warning,
                3..=5 => UrgencyBand::Caution,
                _ => UrgencyBand::Comfortable,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::Category;
    use crate::features::reports::models::{Coordinates, NewReport};
    use chrono::Duration;

    fn report(category: Category, created_at: DateTime<Utc>) -> Report {
        NewReport::catalogue(
            category,
            Some(Coordinates {
                latitude: 46.77,
                longitude: 23.59,
            }),
        )
        .into_report(created_at)
        .unwrap()
    }

    #[test]
    fn test_remaining_splits_days_and_hours() {
        let created = Utc::now();
        let report = report(Category::Pothole, created);

        let status = DeadlineStatus::of(&report, created + Duration::hours(26));
        assert_eq!(status, DeadlineStatus::Remaining { days: 5, hours: 22 });
        assert_eq!(status.urgency(), UrgencyBand::Caution);
    }

    #[test]
    fn test_urgency_bands() {
        let created = Utc::now();
        let graffiti = report(Category::Graffiti, created);

        let band_at = |elapsed: Duration| DeadlineStatus::of(&graffiti, created + elapsed).urgency();
        assert_eq!(band_at(Duration::days(1)), UrgencyBand::Comfortable);
        assert_eq!(band_at(Duration::days(9)), UrgencyBand::Caution);
        assert_eq!(band_at(Duration::days(12)), UrgencyBand::Warning);
        assert_eq!(band_at(Duration::hours(14 * 24 - 3)), UrgencyBand::Critical);
        assert_eq!(band_at(Duration::days(15)), UrgencyBand::Critical);
        assert_eq!(
            DeadlineStatus::of(&graffiti, created + Duration::days(15)),
            DeadlineStatus::Overdue
        );
    }

    #[test]
    fn test_resolved_and_legacy_reports() {
        let now = Utc::now();
        let mut resolved = report(Category::Crime, now);
        resolved.set_resolved(true, now);
        assert_eq!(DeadlineStatus::of(&resolved, now), DeadlineStatus::Resolved);
        assert_eq!(DeadlineStatus::Resolved.urgency(), UrgencyBand::Done);

        let mut legacy = report(Category::Crime, now);
        legacy.deadline = None;
        assert_eq!(DeadlineStatus::of(&legacy, now), DeadlineStatus::NoDeadline);
        assert_eq!(DeadlineStatus::NoDeadline.urgency(), UrgencyBand::None);
    }
}
