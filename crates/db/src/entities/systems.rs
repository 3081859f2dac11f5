//! `SeaORM` Entity for systems table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "systems")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub system_type: String,
    pub owner: Option<String>,
    pub criticality: String,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub created_by: Uuid,
    pub updated_at: DateTimeUtc,
    pub updated_by: Uuid,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::system_endpoints::Entity")]
    SystemEndpoints,
}

impl Related<super::system_endpoints::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SystemEndpoints.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
