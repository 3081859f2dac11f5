//! Authentication and role checks on the router.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn test_health_is_public() {
    let app = TestApp::spawn().await;
    let (status, body) = app.send(Method::GET, "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_missing_token_rejected() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .send(Method::GET, "/api/v1/context/data-categories", None, None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_garbage_token_rejected() {
    let app = TestApp::spawn().await;
    let (status, _) = app
        .send(
            Method::GET,
            "/api/v1/context/vendors",
            Some("not-a-jwt"),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_viewer_can_read_but_not_write() {
    let app = TestApp::spawn().await;
    let token = app.token("viewer");

    let (status, body) = app
        .send(Method::GET, "/api/v1/context/vendors", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 0);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/context/vendors",
            Some(&token),
            Some(json!({ "name": "Acme Payroll", "vendor_role": "processor" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_unknown_role_forbidden() {
    let app = TestApp::spawn().await;
    let token = app.token("auditor");

    let (status, _) = app
        .send(Method::GET, "/api/v1/context/vendors", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_workspaces_are_isolated() {
    let app = TestApp::spawn().await;
    let (status, created) = app
        .as_editor(
            Method::POST,
            "/api/v1/context/data-categories",
            Some(json!({ "name": "Contact details", "category_type": "personal" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = common::id_of(&created);

    let other = TestApp {
        workspace_id: uuid::Uuid::new_v4(),
        ..app
    };
    let (status, _) = other
        .as_editor(
            Method::GET,
            &format!("/api/v1/context/data-categories/{id}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
