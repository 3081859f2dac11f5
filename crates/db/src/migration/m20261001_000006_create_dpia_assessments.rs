//! Create the dpia_assessments table.

use sea_orm_migration::prelude::*;

use super::common::{Audit, name_col, scope_columns, uuid_pk};
use super::m20261001_000005_create_processing_activities::ProcessingActivities;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(DpiaAssessments::Table)
            .if_not_exists()
            .col(uuid_pk(DpiaAssessments::Id))
            .col(name_col(DpiaAssessments::Title))
            .col(
                ColumnDef::new(DpiaAssessments::ProcessingActivityId)
                    .uuid()
                    .null(),
            )
            .col(name_col(DpiaAssessments::Status))
            .col(name_col(DpiaAssessments::CurrentSection))
            .col(
                ColumnDef::new(DpiaAssessments::CompletedSections)
                    .json_binary()
                    .not_null(),
            )
            .col(
                ColumnDef::new(DpiaAssessments::SectionData)
                    .json_binary()
                    .not_null(),
            )
            .col(
                ColumnDef::new(DpiaAssessments::CompletedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_dpia_assessments_activity")
                    .from(DpiaAssessments::Table, DpiaAssessments::ProcessingActivityId)
                    .to(ProcessingActivities::Table, ProcessingActivities::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            );
        scope_columns(&mut table, Audit::SoftDelete);
        manager.create_table(table.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DpiaAssessments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DpiaAssessments {
    Table,
    Id,
    Title,
    ProcessingActivityId,
    Status,
    CurrentSection,
    CompletedSections,
    SectionData,
    CompletedAt,
}
