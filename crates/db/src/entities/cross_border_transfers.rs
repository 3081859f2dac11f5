//! `SeaORM` Entity for cross_border_transfers table (at most one per edge).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cross_border_transfers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub workspace_id: Uuid,
    #[sea_orm(unique)]
    pub edge_id: Uuid,
    pub exporter_jurisdiction_id: Uuid,
    pub importer_jurisdiction_id: Uuid,
    pub transfer_mechanism: String,
    pub safeguards: Option<String>,
    /// Transfer impact assessment done.
    pub tia_completed: bool,
    pub created_at: DateTimeUtc,
    pub created_by: Uuid,
    pub updated_at: DateTimeUtc,
    pub updated_by: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::data_flow_edges::Entity",
        from = "Column::EdgeId",
        to = "super::data_flow_edges::Column::Id"
    )]
    DataFlowEdges,
}

impl Related<super::data_flow_edges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataFlowEdges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
