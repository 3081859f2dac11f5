//! `SeaORM` Entity for activity_data_categories join table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_data_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub activity_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub data_category_id: Uuid,
    pub tenant_id: Uuid,
    pub workspace_id: Uuid,
    /// Why this category is needed for the activity.
    pub justification: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::data_categories::Entity",
        from = "Column::DataCategoryId",
        to = "super::data_categories::Column::Id"
    )]
    DataCategories,
}

impl Related<super::data_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DataCategories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
