//! Integration tests for the data category repository: the special-basis
//! rule, cycle-checked parent moves and the usage-aware delete.

mod common;

use uuid::Uuid;

use common::{random_scope, setup_db};
use dataguard_core::category::CategoryError;
use dataguard_db::reference::DATA_CATEGORIES;
use dataguard_db::repositories::{
    CreateActivityInput, CreateDataCategoryInput, CreateDataFlowInput, CreateEdgeInput,
    DataCategoryError, DataCategoryFilter, LinkKind, NewActivityLink, UpdateDataCategoryInput,
};
use dataguard_db::{DataCategoryRepository, DataFlowRepository, ProcessingActivityRepository};
use dataguard_core::flow::EdgeEndpoints;
use dataguard_shared::AppError;
use dataguard_shared::types::PageRequest;

fn personal(name: &str, parent_id: Option<Uuid>) -> CreateDataCategoryInput {
    CreateDataCategoryInput {
        name: name.to_string(),
        description: None,
        category_type: "personal".to_string(),
        sensitivity_level: "medium".to_string(),
        parent_id,
        special_category_basis: None,
    }
}

fn activity(name: &str) -> CreateActivityInput {
    CreateActivityInput {
        name: name.to_string(),
        description: None,
        purpose: "Run payroll".to_string(),
        lawful_basis: "contract".to_string(),
        legitimate_interest_assessment: None,
        data_subject_types: vec!["employees".to_string()],
        status: "active".to_string(),
        requires_dpia: false,
        dpo_review_required: false,
        dpo_reviewed_at: None,
        last_reviewed_at: None,
        next_review_date: None,
    }
}

#[tokio::test]
async fn test_special_category_requires_basis() {
    let db = setup_db().await;
    let repo = DataCategoryRepository::new(db, random_scope());

    let result = repo
        .create(CreateDataCategoryInput {
            category_type: "special".to_string(),
            ..personal("Health records", None)
        })
        .await;
    assert!(matches!(
        result,
        Err(DataCategoryError::Rule(CategoryError::MissingSpecialBasis))
    ));

    let created = repo
        .create(CreateDataCategoryInput {
            category_type: "special".to_string(),
            special_category_basis: Some("health_social_care".to_string()),
            ..personal("Health records", None)
        })
        .await
        .expect("special category with basis");
    assert_eq!(
        created.special_category_basis.as_deref(),
        Some("health_social_care")
    );
}

#[tokio::test]
async fn test_changing_type_away_from_special_must_clear_basis() {
    let db = setup_db().await;
    let repo = DataCategoryRepository::new(db, random_scope());
    let category = repo
        .create(CreateDataCategoryInput {
            category_type: "special".to_string(),
            special_category_basis: Some("explicit_consent".to_string()),
            ..personal("Biometrics", None)
        })
        .await
        .unwrap();

    let result = repo
        .update(
            category.id,
            UpdateDataCategoryInput {
                category_type: Some("personal".to_string()),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(DataCategoryError::Rule(CategoryError::UnexpectedSpecialBasis(_)))
    ));

    let updated = repo
        .update(
            category.id,
            UpdateDataCategoryInput {
                category_type: Some("personal".to_string()),
                special_category_basis: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.category_type, "personal");
    assert!(updated.special_category_basis.is_none());
}

#[tokio::test]
async fn test_duplicate_name_rejected_until_deleted() {
    let db = setup_db().await;
    let repo = DataCategoryRepository::new(db, random_scope());
    let first = repo.create(personal("Contact details", None)).await.unwrap();

    assert!(matches!(
        repo.create(personal("Contact details", None)).await,
        Err(DataCategoryError::DuplicateName(_))
    ));

    repo.soft_delete(first.id).await.unwrap();
    assert!(repo.create(personal("Contact details", None)).await.is_ok());
}

#[tokio::test]
async fn test_move_under_descendant_rejected() {
    let db = setup_db().await;
    let repo = DataCategoryRepository::new(db, random_scope());
    let root = repo.create(personal("Identity", None)).await.unwrap();
    let child = repo.create(personal("Names", Some(root.id))).await.unwrap();
    let grandchild = repo.create(personal("Nicknames", Some(child.id))).await.unwrap();

    let result = repo
        .update(
            root.id,
            UpdateDataCategoryInput {
                parent_id: Some(Some(grandchild.id)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(DataCategoryError::Rule(CategoryError::CircularHierarchy { .. }))
    ));

    let result = repo
        .update(
            child.id,
            UpdateDataCategoryInput {
                parent_id: Some(Some(child.id)),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(DataCategoryError::Rule(CategoryError::SelfParent))
    ));

    let moved = repo
        .update(
            grandchild.id,
            UpdateDataCategoryInput {
                parent_id: Some(Some(root.id)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.parent_id, Some(root.id));
}

#[tokio::test]
async fn test_parent_must_be_live() {
    let db = setup_db().await;
    let repo = DataCategoryRepository::new(db, random_scope());
    let missing = Uuid::new_v4();

    assert!(matches!(
        repo.create(personal("Orphan", Some(missing))).await,
        Err(DataCategoryError::ParentNotFound(id)) if id == missing
    ));
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let db = setup_db().await;
    let repo = DataCategoryRepository::new(db, random_scope());
    let id = Uuid::new_v4();

    let err = repo.soft_delete(id).await.unwrap_err();
    assert!(matches!(err, DataCategoryError::NotFound(_)));
    assert_eq!(AppError::from(err).status_code(), 404);
}

#[tokio::test]
async fn test_delete_blocked_while_linked_to_activity() {
    let db = setup_db().await;
    let scope = random_scope();
    let categories = DataCategoryRepository::new(db.clone(), scope);
    let activities = ProcessingActivityRepository::new(db, scope);

    let category = categories.create(personal("Bank details", None)).await.unwrap();
    let payroll = activities.create(activity("Payroll")).await.unwrap();
    activities
        .link(
            payroll.id,
            NewActivityLink::DataCategory {
                data_category_id: category.id,
                justification: Some("Salary payments".to_string()),
            },
        )
        .await
        .unwrap();

    let err = categories.soft_delete(category.id).await.unwrap_err();
    match &err {
        DataCategoryError::InUse(usage) => {
            assert_eq!(usage.processing_activities, 1);
            assert_eq!(usage.data_flow_edges, 0);
            assert_eq!(usage.child_categories, 0);
        }
        other => panic!("expected InUse, got {other:?}"),
    }
    assert_eq!(AppError::from(err).status_code(), 409);

    activities
        .unlink(payroll.id, LinkKind::DataCategory, category.id)
        .await
        .unwrap();
    categories.soft_delete(category.id).await.unwrap();
    assert!(categories.find_by_id(category.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_links_from_deleted_activities_do_not_block() {
    let db = setup_db().await;
    let scope = random_scope();
    let categories = DataCategoryRepository::new(db.clone(), scope);
    let activities = ProcessingActivityRepository::new(db, scope);

    let category = categories.create(personal("Email address", None)).await.unwrap();
    let newsletter = activities.create(activity("Newsletter")).await.unwrap();
    activities
        .link(
            newsletter.id,
            NewActivityLink::DataCategory {
                data_category_id: category.id,
                justification: None,
            },
        )
        .await
        .unwrap();
    activities.soft_delete(newsletter.id).await.unwrap();

    assert_eq!(categories.usage(category.id).await.unwrap().processing_activities, 0);
    categories.soft_delete(category.id).await.unwrap();
}

#[tokio::test]
async fn test_delete_blocked_by_children_and_flow_edges() {
    let db = setup_db().await;
    let scope = random_scope();
    let categories = DataCategoryRepository::new(db.clone(), scope);
    let flows = DataFlowRepository::new(db.clone(), scope);

    let parent = categories.create(personal("Location data", None)).await.unwrap();
    categories
        .create(personal("GPS traces", Some(parent.id)))
        .await
        .unwrap();
    let carried = categories.create(personal("Device IDs", None)).await.unwrap();

    let usage = categories.usage(parent.id).await.unwrap();
    assert_eq!(usage.child_categories, 1);
    assert!(matches!(
        categories.soft_delete(parent.id).await,
        Err(DataCategoryError::InUse(_))
    ));

    let crm = common::create_system(&db, scope, "CRM").await;
    let vendor = common::create_vendor(&db, scope, "Mailer Inc").await;
    let flow = flows
        .create(CreateDataFlowInput {
            name: "Marketing export".to_string(),
            description: None,
            status: "active".to_string(),
        })
        .await
        .unwrap();
    flows
        .add_edge(
            flow.id,
            CreateEdgeInput {
                endpoints: EdgeEndpoints {
                    source_system_id: Some(crm),
                    destination_vendor_id: Some(vendor),
                    ..Default::default()
                },
                data_category_ids: vec![carried.id],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(categories.usage(carried.id).await.unwrap().data_flow_edges, 1);
    assert!(matches!(
        categories.soft_delete(carried.id).await,
        Err(DataCategoryError::InUse(_))
    ));

    flows.soft_delete(flow.id).await.unwrap();
    categories.soft_delete(carried.id).await.unwrap();
}

#[tokio::test]
async fn test_list_filters_by_parent() {
    let db = setup_db().await;
    let repo = DataCategoryRepository::new(db, random_scope());
    let root = repo.create(personal("Identity", None)).await.unwrap();
    repo.create(personal("Names", Some(root.id))).await.unwrap();
    repo.create(personal("Passport numbers", Some(root.id))).await.unwrap();

    let roots = repo
        .list(
            DataCategoryFilter {
                parent_id: Some(None),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(roots.data.len(), 1);

    let children = repo
        .list(
            DataCategoryFilter {
                parent_id: Some(Some(root.id)),
                ..Default::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    let names: Vec<&str> = children.data.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Names", "Passport numbers"]);
}

#[tokio::test]
async fn test_statistics_and_seeding() {
    let db = setup_db().await;
    let repo = DataCategoryRepository::new(db, random_scope());

    let inserted = repo.seed_defaults(DATA_CATEGORIES).await.unwrap();
    assert_eq!(inserted, DATA_CATEGORIES.len());
    assert_eq!(repo.seed_defaults(DATA_CATEGORIES).await.unwrap(), 0);

    let stats = repo.statistics().await.unwrap();
    assert_eq!(stats.total, DATA_CATEGORIES.len() as u64);
    let special_seeds = DATA_CATEGORIES
        .iter()
        .filter(|seed| seed.category_type == "special")
        .count() as u64;
    assert_eq!(stats.special, special_seeds);
    let root_seeds = DATA_CATEGORIES.iter().filter(|seed| seed.parent.is_none()).count() as u64;
    assert_eq!(stats.root_categories, root_seeds);
}

#[tokio::test]
async fn test_workspaces_are_isolated() {
    let db = setup_db().await;
    let ours = DataCategoryRepository::new(db.clone(), random_scope());
    let theirs = DataCategoryRepository::new(db, random_scope());

    let category = ours.create(personal("Contact details", None)).await.unwrap();
    assert!(theirs.find_by_id(category.id).await.unwrap().is_none());
    assert!(theirs.create(personal("Contact details", None)).await.is_ok());
    assert!(matches!(
        theirs.soft_delete(category.id).await,
        Err(DataCategoryError::NotFound(_))
    ));
}
