//! Integration tests for jurisdictions, locations, vendors, systems and
//! retention policies.

mod common;

use chrono::NaiveDate;
use uuid::Uuid;

use common::{create_system, create_vendor, random_scope, setup_db, setup_db_with_jurisdictions};
use dataguard_core::context::ContextError;
use dataguard_db::repositories::{
    CreateContractInput, CreateEndpointInput, CreateLocationInput, CreateRetentionPolicyInput,
    CreateVendorInput, JurisdictionError, JurisdictionFilter, LocationError,
    RetentionPolicyError, SystemError, UpdateContractInput, UpdateRetentionPolicyInput,
    UpdateVendorInput, VendorError,
};
use dataguard_db::{
    JurisdictionRepository, LocationRepository, RetentionPolicyRepository, SystemRepository,
    VendorRepository,
};
use dataguard_shared::TenantScope;
use sea_orm::DatabaseConnection;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn jurisdiction_id(db: &DatabaseConnection, code: &str) -> Uuid {
    JurisdictionRepository::new(db.clone())
        .find_by_code(code)
        .await
        .unwrap()
        .expect("Jurisdiction not seeded")
        .id
}

async fn location(db: &DatabaseConnection, scope: TenantScope, name: &str, code: &str) -> Uuid {
    let jurisdiction_id = jurisdiction_id(db, code).await;
    LocationRepository::new(db.clone(), scope)
        .create(CreateLocationInput {
            name: name.to_string(),
            description: None,
            address: None,
            city: None,
            jurisdiction_id,
        })
        .await
        .expect("Failed to create location")
        .id
}

#[tokio::test]
async fn test_jurisdiction_lookup() {
    let db = setup_db_with_jurisdictions().await;
    let repo = JurisdictionRepository::new(db);

    let germany = repo.find_by_code("de").await.unwrap().unwrap();
    assert_eq!(germany.country_code, "DE");
    assert!(germany.is_eu_eea);

    let us = repo.find_by_code("US").await.unwrap().unwrap();
    assert!(!us.gdpr_adequacy);

    assert!(matches!(
        repo.find_by_code("USA").await,
        Err(JurisdictionError::InvalidCode(_))
    ));

    let adequate_third_countries = repo
        .list(JurisdictionFilter {
            is_eu_eea: Some(false),
            gdpr_adequacy: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    let codes: Vec<&str> = adequate_third_countries
        .iter()
        .map(|j| j.country_code.as_str())
        .collect();
    assert!(codes.contains(&"CH"));
    assert!(codes.contains(&"JP"));
    assert!(!codes.contains(&"US"));
    assert!(!codes.contains(&"DE"));
}

#[tokio::test]
async fn test_jurisdiction_seed_is_idempotent() {
    let db = setup_db_with_jurisdictions().await;
    let repo = JurisdictionRepository::new(db);

    let inserted = repo
        .upsert_defaults(dataguard_db::reference::JURISDICTIONS)
        .await
        .unwrap();
    assert_eq!(inserted, 0);
}

#[tokio::test]
async fn test_location_requires_known_jurisdiction() {
    let db = setup_db_with_jurisdictions().await;
    let repo = LocationRepository::new(db.clone(), random_scope());

    let missing = Uuid::new_v4();
    assert!(matches!(
        repo.create(CreateLocationInput {
            name: "Frankfurt DC".to_string(),
            description: None,
            address: None,
            city: Some("Frankfurt".to_string()),
            jurisdiction_id: missing,
        })
        .await,
        Err(LocationError::JurisdictionNotFound(id)) if id == missing
    ));

    let jurisdiction_id = jurisdiction_id(&db, "DE").await;
    let created = repo
        .create(CreateLocationInput {
            name: "Frankfurt DC".to_string(),
            description: None,
            address: None,
            city: Some("  Frankfurt ".to_string()),
            jurisdiction_id,
        })
        .await
        .unwrap();
    assert_eq!(created.city.as_deref(), Some("Frankfurt"));
    assert!(matches!(
        repo.create(CreateLocationInput {
            name: "Frankfurt DC".to_string(),
            description: None,
            address: None,
            city: None,
            jurisdiction_id,
        })
        .await,
        Err(LocationError::DuplicateName(_))
    ));
}

#[tokio::test]
async fn test_vendor_validation_and_duplicates() {
    let db = setup_db().await;
    let repo = VendorRepository::new(db, random_scope());

    assert!(matches!(
        repo.create(CreateVendorInput {
            name: "Mailer".to_string(),
            description: None,
            website: None,
            contact_email: Some("not-an-email".to_string()),
            vendor_role: "processor".to_string(),
            status: "active".to_string(),
        })
        .await,
        Err(VendorError::Invalid(ContextError::Field(_)))
    ));
    assert!(matches!(
        repo.create(CreateVendorInput {
            name: "Mailer".to_string(),
            description: None,
            website: None,
            contact_email: None,
            vendor_role: "supplier".to_string(),
            status: "active".to_string(),
        })
        .await,
        Err(VendorError::Invalid(ContextError::UnknownValue(_)))
    ));

    let mailer = repo
        .create(CreateVendorInput {
            name: "Mailer".to_string(),
            description: None,
            website: Some("https://mailer.example".to_string()),
            contact_email: Some("dpo@mailer.example".to_string()),
            vendor_role: "processor".to_string(),
            status: "active".to_string(),
        })
        .await
        .unwrap();
    let other = repo
        .create(CreateVendorInput {
            name: "Analytics".to_string(),
            description: None,
            website: None,
            contact_email: None,
            vendor_role: "controller".to_string(),
            status: "active".to_string(),
        })
        .await
        .unwrap();

    assert!(matches!(
        repo.update(
            other.id,
            UpdateVendorInput {
                name: Some("Mailer".to_string()),
                ..Default::default()
            },
        )
        .await,
        Err(VendorError::DuplicateName(_))
    ));

    let updated = repo
        .update(
            mailer.id,
            UpdateVendorInput {
                contact_email: Some(None),
                status: Some("under_review".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.contact_email.is_none());
    assert_eq!(updated.website.as_deref(), Some("https://mailer.example"));
    assert_eq!(updated.status, "under_review");
}

#[tokio::test]
async fn test_vendor_contracts() {
    let db = setup_db().await;
    let scope = random_scope();
    let vendor_id = create_vendor(&db, scope, "Payroll GmbH").await;
    let repo = VendorRepository::new(db, scope);

    assert!(matches!(
        repo.add_contract(
            vendor_id,
            CreateContractInput {
                contract_type: "dpa".to_string(),
                title: "DPA".to_string(),
                start_date: date(2026, 1, 1),
                end_date: Some(date(2025, 12, 31)),
                review_date: None,
            },
        )
        .await,
        Err(VendorError::Invalid(ContextError::ContractDatesOutOfOrder { .. }))
    ));

    let dpa = repo
        .add_contract(
            vendor_id,
            CreateContractInput {
                contract_type: "dpa".to_string(),
                title: "DPA".to_string(),
                start_date: date(2025, 1, 1),
                end_date: None,
                review_date: Some(date(2026, 1, 1)),
            },
        )
        .await
        .unwrap();
    repo.add_contract(
        vendor_id,
        CreateContractInput {
            contract_type: "scc".to_string(),
            title: "SCC module 2".to_string(),
            start_date: date(2026, 3, 1),
            end_date: None,
            review_date: None,
        },
    )
    .await
    .unwrap();

    let contracts = repo.list_contracts(vendor_id).await.unwrap();
    let titles: Vec<&str> = contracts.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["SCC module 2", "DPA"]);

    let updated = repo
        .update_contract(
            vendor_id,
            dpa.id,
            UpdateContractInput {
                end_date: Some(Some(date(2027, 12, 31))),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.end_date, Some(date(2027, 12, 31)));
    assert_eq!(updated.review_date, Some(date(2026, 1, 1)));

    repo.delete_contract(vendor_id, dpa.id).await.unwrap();
    assert!(matches!(
        repo.delete_contract(vendor_id, dpa.id).await,
        Err(VendorError::ContractNotFound(_))
    ));

    let details = repo.find_with_details(vendor_id).await.unwrap().unwrap();
    assert_eq!(details.contracts.len(), 1);
}

#[tokio::test]
async fn test_vendor_locations_replaced() {
    let db = setup_db_with_jurisdictions().await;
    let scope = random_scope();
    let vendor_id = create_vendor(&db, scope, "Hosting AG").await;
    let zurich = location(&db, scope, "Zurich DC", "CH").await;
    let virginia = location(&db, scope, "Virginia DC", "US").await;
    let repo = VendorRepository::new(db.clone(), scope);

    let set = repo
        .set_locations(vendor_id, vec![zurich, virginia, zurich])
        .await
        .unwrap();
    assert_eq!(set, vec![zurich, virginia]);

    let foreign = location(&db, random_scope(), "Elsewhere", "DE").await;
    assert!(matches!(
        repo.set_locations(vendor_id, vec![zurich, foreign]).await,
        Err(VendorError::LocationNotFound(id)) if id == foreign
    ));
    let details = repo.find_with_details(vendor_id).await.unwrap().unwrap();
    assert_eq!(details.locations.len(), 2);

    repo.set_locations(vendor_id, vec![virginia]).await.unwrap();
    let details = repo.find_with_details(vendor_id).await.unwrap().unwrap();
    assert_eq!(details.locations.len(), 1);
    assert_eq!(details.locations[0].id, virginia);

    LocationRepository::new(db, scope)
        .soft_delete(virginia)
        .await
        .unwrap();
    let details = repo.find_with_details(vendor_id).await.unwrap().unwrap();
    assert!(details.locations.is_empty());
}

#[tokio::test]
async fn test_system_endpoints_and_locations() {
    let db = setup_db_with_jurisdictions().await;
    let scope = random_scope();
    let system_id = create_system(&db, scope, "HRIS").await;
    let berlin = location(&db, scope, "Berlin office", "DE").await;
    let repo = SystemRepository::new(db, scope);

    assert!(matches!(
        repo.add_endpoint(
            system_id,
            CreateEndpointInput {
                name: "Carrier pigeon".to_string(),
                endpoint_type: "bird".to_string(),
                url: None,
            },
        )
        .await,
        Err(SystemError::Invalid(ContextError::UnknownValue(_)))
    ));

    let api = repo
        .add_endpoint(
            system_id,
            CreateEndpointInput {
                name: "REST API".to_string(),
                endpoint_type: "api".to_string(),
                url: Some("https://hris.example/api".to_string()),
            },
        )
        .await
        .unwrap();
    repo.add_endpoint(
        system_id,
        CreateEndpointInput {
            name: "Nightly export".to_string(),
            endpoint_type: "file_transfer".to_string(),
            url: None,
        },
    )
    .await
    .unwrap();
    repo.set_locations(system_id, vec![berlin]).await.unwrap();

    let details = repo.find_with_details(system_id).await.unwrap().unwrap();
    let names: Vec<&str> = details.endpoints.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Nightly export", "REST API"]);
    assert_eq!(details.locations.len(), 1);

    repo.delete_endpoint(system_id, api.id).await.unwrap();
    assert!(matches!(
        repo.delete_endpoint(system_id, api.id).await,
        Err(SystemError::EndpointNotFound(_))
    ));
    assert_eq!(repo.list_endpoints(system_id).await.unwrap().len(), 1);

    assert!(matches!(
        repo.add_endpoint(
            Uuid::new_v4(),
            CreateEndpointInput {
                name: "Orphan".to_string(),
                endpoint_type: "api".to_string(),
                url: None,
            },
        )
        .await,
        Err(SystemError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_retention_policy_rules() {
    let db = setup_db().await;
    let repo = RetentionPolicyRepository::new(db, random_scope());

    let base = CreateRetentionPolicyInput {
        name: "Payroll records".to_string(),
        description: None,
        retention_period_days: None,
        retention_criteria: None,
        deletion_method: "delete".to_string(),
        legal_reference: Some("HGB §257".to_string()),
    };

    assert!(matches!(
        repo.create(base.clone()).await,
        Err(RetentionPolicyError::Invalid(ContextError::RetentionUndefined))
    ));
    assert!(matches!(
        repo.create(CreateRetentionPolicyInput {
            retention_period_days: Some(0),
            ..base.clone()
        })
        .await,
        Err(RetentionPolicyError::Invalid(ContextError::NonPositivePeriod(0)))
    ));

    let policy = repo
        .create(CreateRetentionPolicyInput {
            retention_period_days: Some(3650),
            ..base.clone()
        })
        .await
        .unwrap();

    // Switching from a period to criteria keeps the policy defined.
    let updated = repo
        .update(
            policy.id,
            UpdateRetentionPolicyInput {
                retention_period_days: Some(None),
                retention_criteria: Some(Some("Until employment ends plus 3 years".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.retention_period_days.is_none());

    assert!(matches!(
        repo.update(
            policy.id,
            UpdateRetentionPolicyInput {
                retention_criteria: Some(None),
                ..Default::default()
            },
        )
        .await,
        Err(RetentionPolicyError::Invalid(ContextError::RetentionUndefined))
    ));

    repo.soft_delete(policy.id).await.unwrap();
    assert!(matches!(
        repo.soft_delete(policy.id).await,
        Err(RetentionPolicyError::NotFound(_))
    ));
}
