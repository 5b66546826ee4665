use tokio::sync::Mutex;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{NewReport, Report, Reporter};
use crate::features::reports::services::visibility::{
    own_reports, policy_for, role_view, ViewFilter, ViewStats,
};
use crate::features::reports::services::ReportStore;
use crate::features::users::models::{Profile, UserRole};

/// Report operations on behalf of an acting profile
pub struct ReportService {
    store: Mutex<ReportStore>,
}

impl ReportService {
    pub fn new(store: ReportStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// File a report attributed to `reporter`
    pub async fn create(&self, reporter: &Profile, new_report: NewReport) -> Result<Report> {
        let new_report = new_report.with_reporter(Reporter::from(reporter));
        self.store.lock().await.create(new_report).await
    }

    /// The viewer's role view, narrowed by `filter`
    pub async fn list_for(&self, viewer: &Profile, filter: &ViewFilter) -> Vec<Report> {
        let store = self.store.lock().await;
        let view = role_view(store.all(), viewer.role, &viewer.email);
        filter.apply(view).into_iter().cloned().collect()
    }

    /// Reports filed by the viewer, whatever their role
    pub async fn list_mine(&self, viewer: &Profile, filter: &ViewFilter) -> Vec<Report> {
        let store = self.store.lock().await;
        let view = own_reports(store.all(), &viewer.email);
        filter.apply(view).into_iter().cloned().collect()
    }

    pub async fn stats_for(&self, viewer: &Profile) -> ViewStats {
        let store = self.store.lock().await;
        ViewStats::of(&role_view(store.all(), viewer.role, &viewer.email))
    }

    /// A report the viewer is allowed to see. Reports outside the viewer's
    /// view are indistinguishable from missing ones.
    pub async fn get_visible(&self, viewer: &Profile, id: Uuid) -> Result<Report> {
        let store = self.store.lock().await;
        let visible = role_view(store.all(), viewer.role, &viewer.email)
            .into_iter()
            .chain(own_reports(store.all(), &viewer.email))
            .find(|report| report.id == id)
            .cloned();

        visible.ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Resolve or reopen a report within the staff member's view
    pub async fn update_status(
        &self,
        actor: &Profile,
        id: Uuid,
        is_resolved: bool,
    ) -> Result<Report> {
        if actor.role == UserRole::Citizen {
            return Err(AppError::Forbidden(
                "Municipality or hospital access required".to_string(),
            ));
        }

        let mut store = self.store.lock().await;
        let in_view = store
            .get(id)
            .is_some_and(|report| policy_for(actor.role).admits(report, &actor.email));
        if !in_view || !store.update_status(id, is_resolved).await? {
            return Err(AppError::NotFound(format!("Report {} not found", id)));
        }

        store
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Report {} vanished after update", id)))
    }

    /// Staff may delete reports in their own view, citizens only reports
    /// they filed. Deleting an unknown id succeeds.
    pub async fn remove(&self, actor: &Profile, id: Uuid) -> Result<()> {
        let mut store = self.store.lock().await;
        if let Some(report) = store.get(id) {
            match actor.role {
                UserRole::Citizen if !report.is_reported_by(&actor.email) => {
                    return Err(AppError::Forbidden(
                        "Only the reporter can delete this report".to_string(),
                    ));
                }
                UserRole::Municipality | UserRole::Hospital
                    if !policy_for(actor.role).admits(report, &actor.email) =>
                {
                    return Err(AppError::NotFound(format!("Report {} not found", id)));
                }
                _ => {}
            }
        }
        store.remove(id).await
    }

    pub async fn remove_all(&self, actor: &Profile) -> Result<()> {
        tracing::warn!("Report wipe requested by {}", actor.id);
        self.store.lock().await.remove_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::Category;
    use crate::features::reports::models::Coordinates;
    use crate::modules::storage::MemoryBlobStore;
    use crate::shared::test_helpers::{citizen_profile, hospital_profile, municipality_profile};
    use std::sync::Arc;

    const IASI: Coordinates = Coordinates {
        latitude: 47.1585,
        longitude: 27.6014,
    };

    async fn service() -> ReportService {
        let store = ReportStore::load(Arc::new(MemoryBlobStore::new())).await;
        ReportService::new(store)
    }

    #[tokio::test]
    async fn test_create_copies_reporter() {
        let service = service().await;
        let citizen = citizen_profile("elena@exemplu.ro");

        let report = service
            .create(&citizen, NewReport::catalogue(Category::Graffiti, Some(IASI)))
            .await
            .unwrap();

        assert_eq!(report.reporter_email.as_deref(), Some("elena@exemplu.ro"));
        assert_eq!(report.reporter_name.as_deref(), Some(citizen.name.as_str()));
    }

    #[tokio::test]
    async fn test_visibility_follows_role() {
        let service = service().await;
        let citizen = citizen_profile("elena@exemplu.ro");
        let emergency = service
            .create(
                &citizen,
                NewReport::catalogue(Category::MedicalEmergency, Some(IASI)),
            )
            .await
            .unwrap();
        let pothole = service
            .create(&citizen, NewReport::catalogue(Category::Pothole, Some(IASI)))
            .await
            .unwrap();

        let municipality = municipality_profile();
        let hospital = hospital_profile();
        let filter = ViewFilter::default();

        let seen: Vec<Uuid> = service
            .list_for(&municipality, &filter)
            .await
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(seen, vec![pothole.id]);

        assert!(service.get_visible(&hospital, emergency.id).await.is_ok());
        assert!(matches!(
            service.get_visible(&hospital, pothole.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(service.list_mine(&citizen, &filter).await.len(), 2);
        assert_eq!(service.stats_for(&citizen).await.total, 2);
    }

    #[tokio::test]
    async fn test_update_unknown_report_is_not_found() {
        let service = service().await;
        let result = service
            .update_status(&municipality_profile(), Uuid::new_v4(), true)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_staff_writes_stay_within_role_view() {
        let service = service().await;
        let citizen = citizen_profile("elena@exemplu.ro");
        let hospital = hospital_profile();
        let municipality = municipality_profile();
        let pothole = service
            .create(&citizen, NewReport::catalogue(Category::Pothole, Some(IASI)))
            .await
            .unwrap();
        let emergency = service
            .create(
                &citizen,
                NewReport::catalogue(Category::MedicalEmergency, Some(IASI)),
            )
            .await
            .unwrap();

        assert!(matches!(
            service.update_status(&hospital, pothole.id, true).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.remove(&hospital, pothole.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.update_status(&municipality, emergency.id, true).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.remove(&municipality, emergency.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.update_status(&citizen, pothole.id, true).await,
            Err(AppError::Forbidden(_))
        ));

        let untouched = service.get_visible(&citizen, pothole.id).await.unwrap();
        assert!(!untouched.is_resolved);
        assert_eq!(service.list_mine(&citizen, &ViewFilter::default()).await.len(), 2);

        let resolved = service
            .update_status(&hospital, emergency.id, true)
            .await
            .unwrap();
        assert!(resolved.is_resolved);
        service.remove(&municipality, pothole.id).await.unwrap();
        assert_eq!(service.list_mine(&citizen, &ViewFilter::default()).await.len(), 1);
    }

    #[tokio::test]
    async fn test_citizen_cannot_delete_others_reports() {
        let service = service().await;
        let owner = citizen_profile("owner@exemplu.ro");
        let other = citizen_profile("other@exemplu.ro");
        let report = service
            .create(&owner, NewReport::catalogue(Category::Pothole, Some(IASI)))
            .await
            .unwrap();

        assert!(matches!(
            service.remove(&other, report.id).await,
            Err(AppError::Forbidden(_))
        ));
        service.remove(&owner, report.id).await.unwrap();
        service.remove(&owner, report.id).await.unwrap();
        assert!(service.list_mine(&owner, &ViewFilter::default()).await.is_empty());
    }
}
