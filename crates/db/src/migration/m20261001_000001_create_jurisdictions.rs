//! Create the global jurisdictions table.

use sea_orm_migration::prelude::*;

use super::common::{name_col, uuid_pk};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Jurisdictions::Table)
                    .if_not_exists()
                    .col(uuid_pk(Jurisdictions::Id))
                    .col(
                        ColumnDef::new(Jurisdictions::CountryCode)
                            .string_len(2)
                            .not_null()
                            .unique_key(),
                    )
                    .col(name_col(Jurisdictions::NameEn))
                    .col(name_col(Jurisdictions::NameLocal))
                    .col(
                        ColumnDef::new(Jurisdictions::IsEuEea)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Jurisdictions::GdprAdequacy)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Jurisdictions::SupervisoryAuthority).text().null())
                    .col(
                        ColumnDef::new(Jurisdictions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Jurisdictions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Jurisdictions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Jurisdictions {
    Table,
    Id,
    CountryCode,
    NameEn,
    NameLocal,
    IsEuEea,
    GdprAdequacy,
    SupervisoryAuthority,
    CreatedAt,
    UpdatedAt,
}
