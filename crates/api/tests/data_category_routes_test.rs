//! Data category routes, including the guarded delete.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::{TestApp, id_of};

const CATEGORIES: &str = "/api/v1/context/data-categories";

async fn create_category(app: &TestApp, body: serde_json::Value) -> String {
    let (status, created) = app.as_editor(Method::POST, CATEGORIES, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    id_of(&created)
}

#[tokio::test]
async fn test_delete_missing_category_is_404() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .as_editor(
            Method::DELETE,
            &format!("{CATEGORIES}/{}", Uuid::new_v4()),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_delete_unused_category_is_204() {
    let app = TestApp::spawn().await;
    let id = create_category(&app, json!({ "name": "Email", "category_type": "personal" })).await;

    let (status, body) = app
        .as_editor(Method::DELETE, &format!("{CATEGORIES}/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app
        .as_editor(Method::GET, &format!("{CATEGORIES}/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_parent_with_children_is_409() {
    let app = TestApp::spawn().await;
    let parent = create_category(&app, json!({ "name": "Identity", "category_type": "personal" })).await;
    create_category(
        &app,
        json!({ "name": "Passport number", "category_type": "personal", "parent_id": parent }),
    )
    .await;

    let (status, body) = app
        .as_editor(Method::DELETE, &format!("{CATEGORIES}/{parent}"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, usage) = app
        .as_editor(Method::GET, &format!("{CATEGORIES}/{parent}/usage"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usage["child_categories"], 1);
}

#[tokio::test]
async fn test_delete_category_used_by_activity_is_409() {
    let app = TestApp::spawn().await;
    let category = create_category(
        &app,
        json!({
            "name": "Health records",
            "category_type": "special",
            "special_category_basis": "health_social_care",
        }),
    )
    .await;

    let (status, activity) = app
        .as_editor(
            Method::POST,
            "/api/v1/context/processing-activities",
            Some(json!({
                "name": "Occupational health",
                "purpose": "Fitness-for-work checks",
                "lawful_basis": "legal_obligation",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let activity = id_of(&activity);

    let (status, _) = app
        .as_editor(
            Method::POST,
            &format!("/api/v1/context/processing-activities/{activity}/data-categories"),
            Some(json!({ "data_category_id": category, "justification": "Art. 9(2)(h)" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .as_editor(Method::DELETE, &format!("{CATEGORIES}/{category}"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .as_editor(
            Method::DELETE,
            &format!(
                "/api/v1/context/processing-activities/{activity}/data-categories/{category}"
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .as_editor(Method::DELETE, &format!("{CATEGORIES}/{category}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_special_category_requires_basis() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .as_editor(
            Method::POST,
            CATEGORIES,
            Some(json!({ "name": "Biometrics", "category_type": "special" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_blank_name_rejected_by_extractor() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .as_editor(
            Method::POST,
            CATEGORIES,
            Some(json!({ "name": "", "category_type": "personal" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn test_unknown_filter_value_rejected() {
    let app = TestApp::spawn().await;
    let (status, _) = app
        .as_editor(
            Method::GET,
            &format!("{CATEGORIES}?category_type=secret"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
