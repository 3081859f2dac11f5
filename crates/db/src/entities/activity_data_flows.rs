//! `SeaORM` Entity for activity_data_flows join table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_data_flows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub activity_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub data_flow_id: Uuid,
    pub tenant_id: Uuid,
    pub workspace_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::data_flows::Entity",
        from = "Column::DataFlowId",
        to = "super::data_flows::Column::Id"
    )]
    DataFlows,
}

impl Related<super::data_flows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataFlows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
