use axum::{routing::get, Router};

use crate::features::categories::handlers;

/// Create routes for the categories feature
///
/// Note: This feature is public (no active profile required)
pub fn routes() -> Router {
    Router::new()
        .route("/api/categories", get(handlers::list_categories))
        .route("/api/categories/{slug}", get(handlers::get_category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::dtos::CategoryResponseDto;
    use crate::shared::types::ApiResponse;
    use axum::http::StatusCode;
    use axum_test::TestServer;

    #[tokio::test]
    async fn test_list_categories() {
        let server = TestServer::new(routes()).unwrap();

        let response = server.get("/api/categories").await;
        response.assert_status_ok();

        let body: ApiResponse<Vec<CategoryResponseDto>> = response.json();
        let categories = body.data.unwrap();
        assert_eq!(categories.len(), 28);
        assert_eq!(body.meta.unwrap().total, 28);
    }

    #[tokio::test]
    async fn test_get_category_by_slug() {
        let server = TestServer::new(routes()).unwrap();

        let response = server.get("/api/categories/pothole").await;
        response.assert_status_ok();
        let body: ApiResponse<CategoryResponseDto> = response.json();
        let pothole = body.data.unwrap();
        assert_eq!(pothole.severity, 2);
        assert_eq!(pothole.deadline_days, 7);

        server
            .get("/api/categories/volcano")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
