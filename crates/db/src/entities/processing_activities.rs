//! `SeaORM` Entity for processing_activities table (Art. 30 records).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "processing_activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub workspace_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub purpose: String,
    pub lawful_basis: String,
    pub legitimate_interest_assessment: Option<String>,
    /// JSON array of strings.
    pub data_subject_types: Json,
    pub status: String,
    pub requires_dpia: bool,
    pub dpo_review_required: bool,
    pub dpo_reviewed_at: Option<DateTimeUtc>,
    pub last_reviewed_at: Option<Date>,
    pub next_review_date: Option<Date>,
    pub created_at: DateTimeUtc,
    pub created_by: Uuid,
    pub updated_at: DateTimeUtc,
    pub updated_by: Uuid,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
