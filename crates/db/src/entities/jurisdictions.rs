//! `SeaORM` Entity for jurisdictions table (global reference data).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jurisdictions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// ISO 3166-1 alpha-2, upper case.
    #[sea_orm(unique)]
    pub country_code: String,
    pub name_en: String,
    pub name_local: String,
    pub is_eu_eea: bool,
    pub gdpr_adequacy: bool,
    pub supervisory_authority: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::physical_locations::Entity")]
    PhysicalLocations,
}

impl Related<super::physical_locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhysicalLocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
