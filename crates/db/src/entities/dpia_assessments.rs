//! `SeaORM` Entity for dpia_assessments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dpia_assessments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub workspace_id: Uuid,
    pub title: String,
    pub processing_activity_id: Option<Uuid>,
    pub status: String,
    pub current_section: String,
    /// JSON array of section ids.
    pub completed_sections: Json,
    /// JSON object keyed by section id.
    pub section_data: Json,
    pub completed_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub created_by: Uuid,
    pub updated_at: DateTimeUtc,
    pub updated_by: Uuid,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::processing_activities::Entity",
        from = "Column::ProcessingActivityId",
        to = "super::processing_activities::Column::Id"
    )]
    ProcessingActivities,
}

impl Related<super::processing_activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProcessingActivities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
