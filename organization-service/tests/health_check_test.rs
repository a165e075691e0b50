//! Health and OpenAPI document endpoints.

mod common;

use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn health_check_returns_200() {
    let app = TestApp::spawn().await;

    let res = app.get("/health", None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.body["service"], "organization-service-test");
    assert_eq!(res.body["checks"]["store"], "up");
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let app = TestApp::spawn().await;

    let res = app.get("/.well-known/openapi.json", None).await;

    assert_eq!(res.status, StatusCode::OK);
    let paths = &res.body["paths"];
    assert!(paths["/auth/signup"].is_object());
    assert!(paths["/api/organization/{organization_id}"].is_object());
    assert!(res.body["components"]["securitySchemes"]["bearer_auth"].is_object());
}
