//! Database seeder for DataGuard development and testing.
//!
//! Loads the reference jurisdictions, seeds the default data categories
//! into a fixed development workspace and prints an access token for it.
//! Safe to run repeatedly.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use uuid::Uuid;

use dataguard_db::reference::{DATA_CATEGORIES, JURISDICTIONS};
use dataguard_db::{DataCategoryRepository, JurisdictionRepository};
use dataguard_shared::{AppConfig, JwtConfig, JwtService, TenantScope};

/// Development tenant (consistent for all seeds)
const DEV_TENANT_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);
/// Development workspace
const DEV_WORKSPACE_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0002);
/// Development user
const DEV_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0003);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    println!("Connecting to database...");
    let db = dataguard_db::connect(&config.database.url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding jurisdictions...");
    let inserted = JurisdictionRepository::new(db.clone())
        .upsert_defaults(JURISDICTIONS)
        .await?;
    println!(
        "  {inserted} new, {} already present",
        JURISDICTIONS.len() - inserted
    );

    println!("Seeding default data categories...");
    let scope = TenantScope::new(DEV_TENANT_ID, DEV_WORKSPACE_ID, DEV_USER_ID);
    let inserted = DataCategoryRepository::new(db, scope)
        .seed_defaults(DATA_CATEGORIES)
        .await?;
    println!("  {inserted} new categories in workspace {DEV_WORKSPACE_ID}");

    let jwt = JwtService::new(JwtConfig {
        secret: config.jwt.secret,
        access_token_expires_minutes: 24 * 60,
    });
    let token = jwt
        .issue_token(DEV_USER_ID, DEV_TENANT_ID, DEV_WORKSPACE_ID, "owner")
        .context("Failed to issue development token")?;

    println!("Seeding complete!");
    println!("Development token (owner, valid 24h):\n{token}");
    Ok(())
}
