//! Integration tests for data flows, edges and cross-border transfers.

mod common;

use uuid::Uuid;

use common::{create_system, create_vendor, random_scope, setup_db, setup_db_with_jurisdictions};
use dataguard_core::flow::{EdgeEndpoints, EdgeSide, FlowError};
use dataguard_db::repositories::{
    CreateDataFlowInput, CreateEdgeInput, DataFlowError, TransferInput, UpdateEdgeInput,
};
use dataguard_db::{DataFlowRepository, JurisdictionRepository};
use dataguard_shared::TenantScope;
use sea_orm::DatabaseConnection;

async fn flow(repo: &DataFlowRepository, name: &str) -> Uuid {
    repo.create(CreateDataFlowInput {
        name: name.to_string(),
        description: Some("Nightly sync".to_string()),
        status: "active".to_string(),
    })
    .await
    .expect("Failed to create flow")
    .id
}

fn system_to_vendor(system: Uuid, vendor: Uuid) -> EdgeEndpoints {
    EdgeEndpoints {
        source_system_id: Some(system),
        destination_vendor_id: Some(vendor),
        ..Default::default()
    }
}

async fn fixture(db: &DatabaseConnection, scope: TenantScope) -> (DataFlowRepository, Uuid, Uuid, Uuid) {
    let repo = DataFlowRepository::new(db.clone(), scope);
    let system = create_system(db, scope, "HRIS").await;
    let vendor = create_vendor(db, scope, "Payroll GmbH").await;
    let flow_id = flow(&repo, "Payroll export").await;
    (repo, flow_id, system, vendor)
}

#[tokio::test]
async fn test_edge_needs_exactly_one_source_and_destination() {
    let db = setup_db().await;
    let scope = random_scope();
    let (repo, flow_id, system, vendor) = fixture(&db, scope).await;

    let two_sources = EdgeEndpoints {
        source_system_id: Some(system),
        source_vendor_id: Some(vendor),
        destination_vendor_id: Some(vendor),
        destination_system_id: None,
    };
    let result = repo
        .add_edge(
            flow_id,
            CreateEdgeInput {
                endpoints: two_sources,
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(DataFlowError::Rule(FlowError::EndpointCount(EdgeSide::Source)))
    ));

    let no_destination = EdgeEndpoints {
        source_system_id: Some(system),
        ..Default::default()
    };
    let result = repo
        .add_edge(
            flow_id,
            CreateEdgeInput {
                endpoints: no_destination,
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(DataFlowError::Rule(FlowError::EndpointCount(EdgeSide::Destination)))
    ));
}

#[tokio::test]
async fn test_endpoints_must_exist_in_workspace() {
    let db = setup_db().await;
    let scope = random_scope();
    let (repo, flow_id, system, _) = fixture(&db, scope).await;
    let foreign_vendor = create_vendor(&db, random_scope(), "Elsewhere Ltd").await;

    let result = repo
        .add_edge(
            flow_id,
            CreateEdgeInput {
                endpoints: system_to_vendor(system, foreign_vendor),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(DataFlowError::EndpointNotFound {
            side: EdgeSide::Destination,
            id
        }) if id == foreign_vendor
    ));
}

#[tokio::test]
async fn test_sequences_are_assigned_and_unique() {
    let db = setup_db().await;
    let scope = random_scope();
    let (repo, flow_id, system, vendor) = fixture(&db, scope).await;

    let first = repo
        .add_edge(
            flow_id,
            CreateEdgeInput {
                endpoints: system_to_vendor(system, vendor),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(first.sequence, 0);

    let explicit = repo
        .add_edge(
            flow_id,
            CreateEdgeInput {
                sequence: Some(5),
                endpoints: EdgeEndpoints {
                    source_vendor_id: Some(vendor),
                    destination_system_id: Some(system),
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(explicit.sequence, 5);

    let next = repo
        .add_edge(
            flow_id,
            CreateEdgeInput {
                endpoints: system_to_vendor(system, vendor),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(next.sequence, 6);

    let duplicate = repo
        .add_edge(
            flow_id,
            CreateEdgeInput {
                sequence: Some(5),
                endpoints: system_to_vendor(system, vendor),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(
        duplicate,
        Err(DataFlowError::Rule(FlowError::DuplicateSequence(5)))
    ));

    let moved = repo
        .update_edge(
            flow_id,
            first.id,
            UpdateEdgeInput {
                sequence: Some(10),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(moved.sequence, 10);

    let details = repo.find_with_edges(flow_id).await.unwrap().unwrap();
    let order: Vec<i32> = details.edges.iter().map(|e| e.edge.sequence).collect();
    assert_eq!(order, vec![5, 6, 10]);
}

#[tokio::test]
async fn test_update_edge_keeps_endpoint_rule() {
    let db = setup_db().await;
    let scope = random_scope();
    let (repo, flow_id, system, vendor) = fixture(&db, scope).await;
    let edge = repo
        .add_edge(
            flow_id,
            CreateEdgeInput {
                endpoints: system_to_vendor(system, vendor),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let result = repo
        .update_edge(
            flow_id,
            edge.id,
            UpdateEdgeInput {
                endpoints: Some(EdgeEndpoints {
                    source_system_id: Some(system),
                    destination_system_id: Some(system),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(DataFlowError::Rule(FlowError::SelfLoop))));
}

#[tokio::test]
async fn test_transfer_rules_and_cascade_on_edge_delete() {
    let db = setup_db_with_jurisdictions().await;
    let scope = random_scope();
    let (repo, flow_id, system, vendor) = fixture(&db, scope).await;
    let jurisdictions = JurisdictionRepository::new(db.clone());
    let de = jurisdictions.find_by_code("de").await.unwrap().unwrap();
    let us = jurisdictions.find_by_code("US").await.unwrap().unwrap();

    let edge = repo
        .add_edge(
            flow_id,
            CreateEdgeInput {
                endpoints: system_to_vendor(system, vendor),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let transfer = |mechanism: &str, importer: Uuid| TransferInput {
        exporter_jurisdiction_id: de.id,
        importer_jurisdiction_id: importer,
        transfer_mechanism: mechanism.to_string(),
        safeguards: Some("Encryption in transit and at rest".to_string()),
        tia_completed: true,
    };

    let result = repo
        .set_transfer(flow_id, edge.id, transfer("adequacy_decision", us.id))
        .await;
    assert!(matches!(
        result,
        Err(DataFlowError::Rule(FlowError::AdequacyNotAvailable))
    ));

    let result = repo
        .set_transfer(flow_id, edge.id, transfer("standard_contractual_clauses", de.id))
        .await;
    assert!(matches!(
        result,
        Err(DataFlowError::Rule(FlowError::SameJurisdiction))
    ));

    let record = repo
        .set_transfer(flow_id, edge.id, transfer("standard_contractual_clauses", us.id))
        .await
        .unwrap();
    assert!(record.assessment.requires_safeguards);
    assert_eq!(record.transfer.importer_jurisdiction_id, us.id);

    let replaced = repo
        .set_transfer(flow_id, edge.id, transfer("binding_corporate_rules", us.id))
        .await
        .unwrap();
    assert_eq!(replaced.transfer.id, record.transfer.id);
    assert_eq!(replaced.transfer.transfer_mechanism, "binding_corporate_rules");

    let details = repo.find_with_edges(flow_id).await.unwrap().unwrap();
    assert!(details.edges[0].transfer.is_some());

    repo.delete_edge(flow_id, edge.id).await.unwrap();
    let details = repo.find_with_edges(flow_id).await.unwrap().unwrap();
    assert!(details.edges.is_empty());
    assert!(matches!(
        repo.remove_transfer(flow_id, edge.id).await,
        Err(DataFlowError::EdgeNotFound(_))
    ));
}

#[tokio::test]
async fn test_edge_categories_are_replaced() {
    use dataguard_db::DataCategoryRepository;
    use dataguard_db::repositories::CreateDataCategoryInput;

    let db = setup_db().await;
    let scope = random_scope();
    let (repo, flow_id, system, vendor) = fixture(&db, scope).await;
    let categories = DataCategoryRepository::new(db.clone(), scope);
    let mut ids = Vec::new();
    for name in ["Names", "Salaries"] {
        let category = categories
            .create(CreateDataCategoryInput {
                name: name.to_string(),
                description: None,
                category_type: "personal".to_string(),
                sensitivity_level: "high".to_string(),
                parent_id: None,
                special_category_basis: None,
            })
            .await
            .unwrap();
        ids.push(category.id);
    }

    let edge = repo
        .add_edge(
            flow_id,
            CreateEdgeInput {
                endpoints: system_to_vendor(system, vendor),
                data_category_ids: vec![ids[0], ids[0]],
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let set = repo
        .set_edge_categories(flow_id, edge.id, vec![ids[1]])
        .await
        .unwrap();
    assert_eq!(set, vec![ids[1]]);

    let missing = Uuid::new_v4();
    assert!(matches!(
        repo.set_edge_categories(flow_id, edge.id, vec![ids[0], missing]).await,
        Err(DataFlowError::CategoryNotFound(id)) if id == missing
    ));

    let details = repo.find_with_edges(flow_id).await.unwrap().unwrap();
    assert_eq!(details.edges[0].data_category_ids, vec![ids[1]]);
}
