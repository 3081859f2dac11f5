//! Create the data_categories table.

use sea_orm_migration::prelude::*;

use super::common::{Audit, name_col, scope_columns, text_col, uuid_pk, workspace_name_index};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(DataCategories::Table)
            .if_not_exists()
            .col(uuid_pk(DataCategories::Id))
            .col(name_col(DataCategories::Name))
            .col(text_col(DataCategories::Description))
            .col(name_col(DataCategories::CategoryType))
            .col(name_col(DataCategories::SensitivityLevel))
            .col(ColumnDef::new(DataCategories::ParentId).uuid().null())
            .col(
                ColumnDef::new(DataCategories::SpecialCategoryBasis)
                    .string_len(255)
                    .null(),
            )
            .col(
                ColumnDef::new(DataCategories::IsSystem)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_data_categories_parent")
                    .from(DataCategories::Table, DataCategories::ParentId)
                    .to(DataCategories::Table, DataCategories::Id)
                    .on_delete(ForeignKeyAction::SetNull),
            );
        scope_columns(&mut table, Audit::SoftDelete);
        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(workspace_name_index(
                DataCategories::Table,
                "idx_data_categories_workspace_name",
            ))
            .await?;

        // children lookups for the hierarchy walk
        manager
            .create_index(
                Index::create()
                    .name("idx_data_categories_parent_id")
                    .table(DataCategories::Table)
                    .col(DataCategories::ParentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DataCategories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum DataCategories {
    Table,
    Id,
    Name,
    Description,
    CategoryType,
    SensitivityLevel,
    ParentId,
    SpecialCategoryBasis,
    IsSystem,
}
