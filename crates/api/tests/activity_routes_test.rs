//! Processing activity routes and the compliance summary.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, id_of};

const ACTIVITIES: &str = "/api/v1/context/processing-activities";

#[tokio::test]
async fn test_empty_workspace_scores_full_marks() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .as_editor(Method::GET, &format!("{ACTIVITIES}/compliance"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_activities"], 0);
    assert_eq!(body["score"], 100);
    assert_eq!(body["rating"], "good");
}

#[tokio::test]
async fn test_compliance_findings_lower_the_score() {
    let app = TestApp::spawn().await;

    let (status, created) = app
        .as_editor(
            Method::POST,
            ACTIVITIES,
            Some(json!({
                "name": "Sick leave tracking",
                "purpose": "Manage absences",
                "lawful_basis": "legal_obligation",
                "dpo_review_required": true,
                "next_review_date": "2020-01-01",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    let activity = id_of(&created);

    let (status, category) = app
        .as_editor(
            Method::POST,
            "/api/v1/context/data-categories",
            Some(json!({
                "name": "Medical certificates",
                "category_type": "special",
                "special_category_basis": "employment_social_security",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, details) = app
        .as_editor(
            Method::POST,
            &format!("{ACTIVITIES}/{activity}/data-categories"),
            Some(json!({ "data_category_id": category["id"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(details["data_categories"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .as_editor(Method::GET, &format!("{ACTIVITIES}/compliance"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_activities"], 1);
    assert_eq!(body["overdue_reviews"], 1);
    assert_eq!(body["missing_dpo_reviews"], 1);
    assert_eq!(body["unjustified_special_category"], 1);
    // 100 - 10 - 15 - 20
    assert_eq!(body["score"], 55);
    assert_eq!(body["rating"], "fair");
}

#[tokio::test]
async fn test_legitimate_interests_needs_assessment() {
    let app = TestApp::spawn().await;
    let (status, body) = app
        .as_editor(
            Method::POST,
            ACTIVITIES,
            Some(json!({
                "name": "Fraud monitoring",
                "purpose": "Detect payment fraud",
                "lawful_basis": "legitimate_interests",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_link_errors() {
    let app = TestApp::spawn().await;
    let (_, created) = app
        .as_editor(
            Method::POST,
            ACTIVITIES,
            Some(json!({
                "name": "Payroll",
                "purpose": "Pay employees",
                "lawful_basis": "contract",
            })),
        )
        .await;
    let activity = id_of(&created);

    let (status, system) = app
        .as_editor(
            Method::POST,
            "/api/v1/context/systems",
            Some(json!({ "name": "HRIS", "system_type": "saas" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{system}");
    let link = json!({ "system_id": system["id"] });

    let (status, _) = app
        .as_editor(
            Method::POST,
            &format!("{ACTIVITIES}/{activity}/systems"),
            Some(link.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .as_editor(
            Method::POST,
            &format!("{ACTIVITIES}/{activity}/systems"),
            Some(link),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .as_editor(
            Method::POST,
            &format!("{ACTIVITIES}/{activity}/vendors"),
            Some(json!({ "vendor_id": uuid::Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, details) = app
        .as_editor(Method::GET, &format!("{ACTIVITIES}/{activity}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["systems"].as_array().unwrap().len(), 1);
    assert_eq!(details["vendors"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_patch_clears_optional_field() {
    let app = TestApp::spawn().await;
    let (_, created) = app
        .as_editor(
            Method::POST,
            ACTIVITIES,
            Some(json!({
                "name": "Newsletter",
                "description": "Monthly product news",
                "purpose": "Marketing",
                "lawful_basis": "consent",
            })),
        )
        .await;
    let activity = id_of(&created);

    let (status, updated) = app
        .as_editor(
            Method::PATCH,
            &format!("{ACTIVITIES}/{activity}"),
            Some(json!({ "description": null, "status": "active" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(updated["description"].is_null());
    assert_eq!(updated["status"], "active");
    assert_eq!(updated["purpose"], "Marketing");
}
