//! `SeaORM` Entity for data_flow_edges table.
//!
//! Exactly one source column and one destination column are non-null.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "data_flow_edges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub workspace_id: Uuid,
    pub data_flow_id: Uuid,
    pub sequence: i32,
    pub source_system_id: Option<Uuid>,
    pub source_vendor_id: Option<Uuid>,
    pub destination_system_id: Option<Uuid>,
    pub destination_vendor_id: Option<Uuid>,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
    pub created_by: Uuid,
    pub updated_at: DateTimeUtc,
    pub updated_by: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::data_flows::Entity",
        from = "Column::DataFlowId",
        to = "super::data_flows::Column::Id"
    )]
    DataFlows,
    #[sea_orm(has_one = "super::cross_border_transfers::Entity")]
    CrossBorderTransfers,
}

impl Related<super::data_flows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataFlows.def()
    }
}

impl Related<super::cross_border_transfers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CrossBorderTransfers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
