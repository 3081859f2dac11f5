//! `SeaORM` Entity for physical_locations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "physical_locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub jurisdiction_id: Uuid,
    pub created_at: DateTimeUtc,
    pub created_by: Uuid,
    pub updated_at: DateTimeUtc,
    pub updated_by: Uuid,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::jurisdictions::Entity",
        from = "Column::JurisdictionId",
        to = "super::jurisdictions::Column::Id"
    )]
    Jurisdictions,
}

impl Related<super::jurisdictions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Jurisdictions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
