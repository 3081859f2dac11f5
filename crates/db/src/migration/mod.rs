//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and written with the schema
//! builder so they run on both `PostgreSQL` and `SQLite`.

pub use sea_orm_migration::prelude::*;

mod common;
mod m20261001_000001_create_jurisdictions;
mod m20261001_000002_create_context_registers;
mod m20261001_000003_create_data_categories;
mod m20261001_000004_create_retention_and_flows;
mod m20261001_000005_create_processing_activities;
mod m20261001_000006_create_dpia_assessments;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_jurisdictions::Migration),
            Box::new(m20261001_000002_create_context_registers::Migration),
            Box::new(m20261001_000003_create_data_categories::Migration),
            Box::new(m20261001_000004_create_retention_and_flows::Migration),
            Box::new(m20261001_000005_create_processing_activities::Migration),
            Box::new(m20261001_000006_create_dpia_assessments::Migration),
        ]
    }
}
