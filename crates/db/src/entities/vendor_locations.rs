//! `SeaORM` Entity for vendor_locations join table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vendor_locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub vendor_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub location_id: Uuid,
    pub tenant_id: Uuid,
    pub workspace_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::physical_locations::Entity",
        from = "Column::LocationId",
        to = "super::physical_locations::Column::Id"
    )]
    PhysicalLocations,
}

impl Related<super::physical_locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhysicalLocations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
