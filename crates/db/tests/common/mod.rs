//! Shared setup for repository tests: a migrated in-memory SQLite database.

#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use dataguard_db::migration::Migrator;
use dataguard_db::reference::JURISDICTIONS;
use dataguard_db::{JurisdictionRepository, SystemRepository, VendorRepository};
use dataguard_db::repositories::{CreateSystemInput, CreateVendorInput};
use dataguard_shared::TenantScope;

/// Connects to a fresh in-memory database and applies every migration.
///
/// The pool holds a single connection so all queries see the same database.
pub async fn setup_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

/// Same as `setup_db`, with the reference jurisdictions loaded.
pub async fn setup_db_with_jurisdictions() -> DatabaseConnection {
    let db = setup_db().await;
    JurisdictionRepository::new(db.clone())
        .upsert_defaults(JURISDICTIONS)
        .await
        .expect("Failed to seed jurisdictions");
    db
}

/// A scope for a random tenant, workspace and user.
pub fn random_scope() -> TenantScope {
    TenantScope::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
}

/// Creates an active SaaS system.
pub async fn create_system(db: &DatabaseConnection, scope: TenantScope, name: &str) -> Uuid {
    SystemRepository::new(db.clone(), scope)
        .create(CreateSystemInput {
            name: name.to_string(),
            description: None,
            system_type: "saas".to_string(),
            owner: None,
            criticality: "medium".to_string(),
            status: "active".to_string(),
        })
        .await
        .expect("Failed to create system")
        .id
}

/// Creates an active processor vendor.
pub async fn create_vendor(db: &DatabaseConnection, scope: TenantScope, name: &str) -> Uuid {
    VendorRepository::new(db.clone(), scope)
        .create(CreateVendorInput {
            name: name.to_string(),
            description: None,
            website: None,
            contact_email: None,
            vendor_role: "processor".to_string(),
            status: "active".to_string(),
        })
        .await
        .expect("Failed to create vendor")
        .id
}
