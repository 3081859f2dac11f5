//! `SeaORM` Entity for activity_retention_policies join table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_retention_policies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub activity_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub retention_policy_id: Uuid,
    pub tenant_id: Uuid,
    pub workspace_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::retention_policies::Entity",
        from = "Column::RetentionPolicyId",
        to = "super::retention_policies::Column::Id"
    )]
    RetentionPolicies,
}

impl Related<super::retention_policies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RetentionPolicies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
