//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Tenant and workspace scoped repositories
//! - Portable database migrations
//! - Reference data (jurisdictions, default data categories)

pub mod entities;
pub mod migration;
pub mod reference;
pub mod repositories;

pub use repositories::{
    DataCategoryRepository, DataFlowRepository, DpiaRepository, JurisdictionRepository,
    LocationRepository, ProcessingActivityRepository, RetentionPolicyRepository,
    SystemRepository, VendorRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
