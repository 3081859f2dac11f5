//! `SeaORM` Entity for data_flow_edge_categories join table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "data_flow_edge_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub edge_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub data_category_id: Uuid,
    pub tenant_id: Uuid,
    pub workspace_id: Uuid,
    pub created_at: DateTimeUtc,
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
