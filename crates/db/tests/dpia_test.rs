//! Integration tests for the DPIA wizard persistence.

mod common;

use serde_json::{Value, json};
use uuid::Uuid;

use common::{random_scope, setup_db};
use dataguard_core::dpia::DpiaError;
use dataguard_core::gdpr::DpiaStatus;
use dataguard_db::repositories::{
    CreateActivityInput, CreateDpiaInput, DpiaFilter, DpiaRepoError,
};
use dataguard_db::{DpiaRepository, ProcessingActivityRepository};
use dataguard_shared::types::PageRequest;

fn sections() -> Vec<(&'static str, Value)> {
    vec![
        (
            "processing_description",
            json!({
                "processing_nature": "Video surveillance of the warehouse",
                "processing_scope": "All warehouse staff and visitors",
                "processing_purposes": "Theft prevention",
                "data_subjects": ["employees", "other"],
                "estimated_subjects": 250,
            }),
        ),
        (
            "necessity_proportionality",
            json!({
                "lawful_basis": "legitimate_interests",
                "necessity_justification": "Repeated thefts despite access control",
                "data_minimisation": true,
                "data_subject_rights": "Requests handled by HR within 30 days",
            }),
        ),
        (
            "risk_assessment",
            json!({
                "risk_sources": ["unauthorised_access", "profiling"],
                "likelihood": "possible",
                "severity": "significant",
                "risk_description": "Footage could be misused to monitor performance",
            }),
        ),
        (
            "mitigation_measures",
            json!({
                "technical_measures": "Encrypted storage, 72 hour retention",
                "organisational_measures": "Access limited to security lead",
                "residual_risk": "low",
                "dpo_consulted": true,
            }),
        ),
    ]
}

async fn start(repo: &DpiaRepository) -> Uuid {
    repo.create(CreateDpiaInput {
        title: "Warehouse CCTV".to_string(),
        processing_activity_id: None,
    })
    .await
    .expect("Failed to create DPIA")
    .id
}

#[tokio::test]
async fn test_create_starts_at_first_section() {
    let db = setup_db().await;
    let repo = DpiaRepository::new(db, random_scope());
    let id = start(&repo).await;

    let assessment = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(assessment.status, "draft");
    assert_eq!(assessment.current_section, "processing_description");
    assert_eq!(assessment.completed_sections, json!([]));
    assert!(assessment.completed_at.is_none());
}

#[tokio::test]
async fn test_create_requires_live_activity() {
    let db = setup_db().await;
    let scope = random_scope();
    let repo = DpiaRepository::new(db.clone(), scope);

    let missing = Uuid::new_v4();
    assert!(matches!(
        repo.create(CreateDpiaInput {
            title: "Orphan".to_string(),
            processing_activity_id: Some(missing),
        })
        .await,
        Err(DpiaRepoError::ActivityNotFound(id)) if id == missing
    ));

    let activity = ProcessingActivityRepository::new(db, scope)
        .create(CreateActivityInput {
            name: "CCTV".to_string(),
            description: None,
            purpose: "Security".to_string(),
            lawful_basis: "legitimate_interests".to_string(),
            legitimate_interest_assessment: Some("Documented".to_string()),
            data_subject_types: vec!["employees".to_string()],
            status: "active".to_string(),
            requires_dpia: true,
            dpo_review_required: false,
            dpo_reviewed_at: None,
            last_reviewed_at: None,
            next_review_date: None,
        })
        .await
        .unwrap();
    let dpia = repo
        .create(CreateDpiaInput {
            title: "CCTV".to_string(),
            processing_activity_id: Some(activity.id),
        })
        .await
        .unwrap();

    let listed = repo
        .list(
            DpiaFilter {
                processing_activity_id: Some(activity.id),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(listed.data.len(), 1);
    assert_eq!(listed.data[0].id, dpia.id);
}

#[tokio::test]
async fn test_full_walkthrough_completes() {
    let db = setup_db().await;
    let repo = DpiaRepository::new(db, random_scope());
    let id = start(&repo).await;

    let mut last = None;
    for (section, answers) in sections() {
        let view = repo.save_section(id, section, &answers).await.unwrap();
        last = Some(view);
    }

    let view = last.unwrap();
    assert_eq!(view.progress_percent, 100);
    assert_eq!(view.assessment.status, "completed");
    assert!(view.assessment.completed_at.is_some());
    assert_eq!(
        view.assessment.section_data["processing_description"]["data_subjects"],
        json!(["employees", "other"])
    );

    let completed = repo
        .list(
            DpiaFilter {
                status: Some(DpiaStatus::Completed),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(completed.meta.total, 1);
}

#[tokio::test]
async fn test_resubmit_keeps_completion_time() {
    let db = setup_db().await;
    let repo = DpiaRepository::new(db, random_scope());
    let id = start(&repo).await;
    for (section, answers) in sections() {
        repo.save_section(id, section, &answers).await.unwrap();
    }
    let first = repo.find_by_id(id).await.unwrap().unwrap().completed_at;

    let (section, mut answers) = sections().swap_remove(3);
    answers["residual_risk"] = json!("medium");
    let view = repo.save_section(id, section, &answers).await.unwrap();

    assert_eq!(view.assessment.completed_at, first);
    assert_eq!(
        view.assessment.section_data["mitigation_measures"]["residual_risk"],
        json!("medium")
    );
}

#[tokio::test]
async fn test_locked_section_rejected() {
    let db = setup_db().await;
    let repo = DpiaRepository::new(db, random_scope());
    let id = start(&repo).await;

    let (_, answers) = sections().swap_remove(2);
    assert!(matches!(
        repo.save_section(id, "risk_assessment", &answers).await,
        Err(DpiaRepoError::Wizard(DpiaError::SectionLocked(_)))
    ));
    assert!(matches!(
        repo.go_to_section(id, "mitigation_measures").await,
        Err(DpiaRepoError::Wizard(DpiaError::SectionLocked(_)))
    ));
    assert!(matches!(
        repo.go_to_section(id, "appendix").await,
        Err(DpiaRepoError::Wizard(DpiaError::UnknownSection(_)))
    ));
}

#[tokio::test]
async fn test_invalid_answers_not_saved() {
    let db = setup_db().await;
    let repo = DpiaRepository::new(db, random_scope());
    let id = start(&repo).await;

    let result = repo
        .save_section(
            id,
            "processing_description",
            &json!({ "processing_nature": "CCTV" }),
        )
        .await;
    match result {
        Err(DpiaRepoError::Wizard(DpiaError::InvalidAnswers { section, errors })) => {
            assert_eq!(section, "processing_description");
            assert!(errors.iter().any(|e| e.field == "processing_scope"));
        }
        other => panic!("expected invalid answers, got {other:?}"),
    }

    let assessment = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(assessment.status, "draft");
    assert_eq!(assessment.section_data, json!({}));
}

#[tokio::test]
async fn test_go_back_to_completed_section() {
    let db = setup_db().await;
    let repo = DpiaRepository::new(db, random_scope());
    let id = start(&repo).await;
    for (section, answers) in sections().into_iter().take(2) {
        repo.save_section(id, section, &answers).await.unwrap();
    }

    let view = repo.go_to_section(id, "processing_description").await.unwrap();
    assert_eq!(view.assessment.current_section, "processing_description");
    assert_eq!(view.assessment.status, "in_progress");
    assert_eq!(view.progress_percent, 50);

    let view = repo.go_to_section(id, "risk_assessment").await.unwrap();
    assert_eq!(view.assessment.current_section, "risk_assessment");
}

#[tokio::test]
async fn test_soft_delete_and_isolation() {
    let db = setup_db().await;
    let repo = DpiaRepository::new(db.clone(), random_scope());
    let id = start(&repo).await;

    let other = DpiaRepository::new(db, random_scope());
    assert!(other.find_by_id(id).await.unwrap().is_none());
    assert!(matches!(
        other.soft_delete(id).await,
        Err(DpiaRepoError::NotFound(_))
    ));

    repo.soft_delete(id).await.unwrap();
    assert!(repo.find_by_id(id).await.unwrap().is_none());
}
