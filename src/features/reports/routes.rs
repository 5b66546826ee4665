use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// Create routes for the reports feature
///
/// Every route acts on behalf of the active profile; the caller applies the
/// middleware that resolves it
pub fn routes(service: Arc<ReportService>) -> Router {
    Router::new()
        .route(
            "/api/reports",
            get(handlers::list_reports)
                .post(handlers::create_report)
                .delete(handlers::delete_all_reports),
        )
        .route("/api/reports/custom", post(handlers::create_custom_report))
        .route("/api/reports/mine", get(handlers::list_my_reports))
        .route("/api/reports/stats", get(handlers::get_report_stats))
        .route(
            "/api/reports/{id}",
            get(handlers::get_report).delete(handlers::delete_report),
        )
        .route(
            "/api/reports/{id}/status",
            patch(handlers::update_report_status),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::services::ReportStore;
    use crate::features::users::models::Profile;
    use crate::modules::storage::MemoryBlobStore;
    use crate::shared::test_helpers::{
        citizen_profile, hospital_profile, municipality_profile, with_profile,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    async fn service() -> Arc<ReportService> {
        let store = ReportStore::load(Arc::new(MemoryBlobStore::new())).await;
        Arc::new(ReportService::new(store))
    }

    fn server_as(service: &Arc<ReportService>, profile: Profile) -> TestServer {
        TestServer::new(with_profile(routes(Arc::clone(service)), profile)).unwrap()
    }

    fn location() -> Value {
        json!({"latitude": 44.4268, "longitude": 26.1025})
    }

    #[tokio::test]
    async fn test_citizen_files_and_staff_resolves() {
        let service = service().await;
        let citizen = server_as(&service, citizen_profile("ana@exemplu.ro"));
        let municipality = server_as(&service, municipality_profile());

        let response = citizen
            .post("/api/reports")
            .json(&json!({
                "category": "pothole",
                "location": location(),
                "description": "Groapă adâncă"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: Value = response.json();
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["data"]["severity"], 2);
        assert_eq!(created["data"]["reporter_email"], "ana@exemplu.ro");
        assert_eq!(created["data"]["deadline_status"]["state"], "remaining");

        let listed: Value = municipality.get("/api/reports").await.json();
        assert_eq!(listed["meta"]["total"], 1);

        let resolved: Value = municipality
            .patch(&format!("/api/reports/{}/status", id))
            .json(&json!({"is_resolved": true}))
            .await
            .json();
        assert_eq!(resolved["data"]["is_resolved"], true);
        assert_eq!(resolved["data"]["urgency"], "done");

        let active: Value = municipality.get("/api/reports").await.json();
        assert_eq!(active["meta"]["total"], 0);
        let done: Value = municipality.get("/api/reports?resolved=true").await.json();
        assert_eq!(done["meta"]["total"], 1);

        let stats: Value = citizen.get("/api/reports/stats").await.json();
        assert_eq!(stats["data"]["resolved"], 1);
    }

    #[tokio::test]
    async fn test_role_gating() {
        let service = service().await;
        let hospital = server_as(&service, hospital_profile());
        let citizen = server_as(&service, citizen_profile("ana@exemplu.ro"));

        hospital
            .post("/api/reports")
            .json(&json!({"category": "accident", "location": location()}))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        citizen
            .patch(&format!("/api/reports/{}/status", uuid::Uuid::new_v4()))
            .json(&json!({"is_resolved": true}))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        citizen
            .delete("/api/reports")
            .await
            .assert_status(StatusCode::FORBIDDEN);

        hospital
            .patch(&format!("/api/reports/{}/status", uuid::Uuid::new_v4()))
            .json(&json!({"is_resolved": true}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_hospital_cannot_touch_municipal_reports() {
        let service = service().await;
        let citizen = server_as(&service, citizen_profile("ana@exemplu.ro"));
        let hospital = server_as(&service, hospital_profile());

        let created: Value = citizen
            .post("/api/reports")
            .json(&json!({"category": "pothole", "location": location()}))
            .await
            .json();
        let id = created["data"]["id"].as_str().unwrap().to_string();

        hospital
            .patch(&format!("/api/reports/{}/status", id))
            .json(&json!({"is_resolved": true}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        hospital
            .delete(&format!("/api/reports/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let mine: Value = citizen.get("/api/reports/mine").await.json();
        assert_eq!(mine["meta"]["total"], 1);
        assert_eq!(mine["data"][0]["is_resolved"], false);
    }

    #[tokio::test]
    async fn test_hospital_sees_only_emergencies() {
        let service = service().await;
        let citizen = server_as(&service, citizen_profile("ana@exemplu.ro"));
        let hospital = server_as(&service, hospital_profile());

        for category in ["medical_emergency", "pothole"] {
            citizen
                .post("/api/reports")
                .json(&json!({"category": category, "location": location()}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let body: Value = hospital.get("/api/reports").await.json();
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["category"], "medical_emergency");

        let mine: Value = citizen.get("/api/reports/mine").await.json();
        assert_eq!(mine["meta"]["total"], 2);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let service = service().await;
        let citizen = server_as(&service, citizen_profile("ana@exemplu.ro"));

        citizen
            .post("/api/reports")
            .json(&json!({"category": "pothole"}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        citizen
            .post("/api/reports")
            .json(&json!({"category": "trash", "location": location()}))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        citizen
            .post("/api/reports/custom")
            .json(&json!({
                "location": location(),
                "description": "Bancă ruptă",
                "severity": 9,
                "photo": "/9j/AA=="
            }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let response = citizen
            .post("/api/reports/custom")
            .json(&json!({
                "location": location(),
                "description": "Bancă ruptă",
                "photo": "/9j/AA=="
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["label"], "Custom Problem");
        assert_eq!(body["data"]["photo"], "/9j/AA==");
        assert!(body["data"]["category"].is_null());
    }

    #[tokio::test]
    async fn test_search_and_delete() {
        let service = service().await;
        let citizen = server_as(&service, citizen_profile("ana@exemplu.ro"));

        let created: Value = citizen
            .post("/api/reports")
            .json(&json!({
                "category": "graffiti",
                "location": location(),
                "description": "Tags on the school wall"
            }))
            .await
            .json();
        let id = created["data"]["id"].as_str().unwrap().to_string();

        let hits: Value = citizen.get("/api/reports?search=SCHOOL").await.json();
        assert_eq!(hits["meta"]["total"], 1);
        let misses: Value = citizen.get("/api/reports?search=bridge").await.json();
        assert_eq!(misses["meta"]["total"], 0);

        let other = server_as(&service, citizen_profile("ion@exemplu.ro"));
        other
            .get(&format!("/api/reports/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        other
            .delete(&format!("/api/reports/{}", id))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        citizen
            .delete(&format!("/api/reports/{}", id))
            .await
            .assert_status(StatusCode::NO_CONTENT);
        citizen
            .get(&format!("/api/reports/{}", id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
