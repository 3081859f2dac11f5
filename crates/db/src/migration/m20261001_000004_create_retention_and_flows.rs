//! Create retention policies and data flows with edges and transfers.

use sea_orm_migration::prelude::*;

use super::common::{
    Audit, cascade_fk, name_col, restrict_fk, scope_columns, text_col, uuid_col, uuid_pk,
    workspace_name_index,
};
use super::m20261001_000001_create_jurisdictions::Jurisdictions;
use super::m20261001_000003_create_data_categories::DataCategories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // retention_policies
        let mut table = Table::create();
        table
            .table(RetentionPolicies::Table)
            .if_not_exists()
            .col(uuid_pk(RetentionPolicies::Id))
            .col(name_col(RetentionPolicies::Name))
            .col(text_col(RetentionPolicies::Description))
            .col(
                ColumnDef::new(RetentionPolicies::RetentionPeriodDays)
                    .integer()
                    .null(),
            )
            .col(text_col(RetentionPolicies::RetentionCriteria))
            .col(name_col(RetentionPolicies::DeletionMethod))
            .col(text_col(RetentionPolicies::LegalReference));
        scope_columns(&mut table, Audit::SoftDelete);
        manager.create_table(table.to_owned()).await?;
        manager
            .create_index(workspace_name_index(
                RetentionPolicies::Table,
                "idx_retention_policies_workspace_name",
            ))
            .await?;

        // data_flows
        let mut table = Table::create();
        table
            .table(DataFlows::Table)
            .if_not_exists()
            .col(uuid_pk(DataFlows::Id))
            .col(name_col(DataFlows::Name))
            .col(text_col(DataFlows::Description))
            .col(name_col(DataFlows::Status));
        scope_columns(&mut table, Audit::SoftDelete);
        manager.create_table(table.to_owned()).await?;
        manager
            .create_index(workspace_name_index(
                DataFlows::Table,
                "idx_data_flows_workspace_name",
            ))
            .await?;

        // data_flow_edges; endpoints are checked by the repository
        let mut table = Table::create();
        table
            .table(DataFlowEdges::Table)
            .if_not_exists()
            .col(uuid_pk(DataFlowEdges::Id))
            .col(uuid_col(DataFlowEdges::DataFlowId))
            .col(ColumnDef::new(DataFlowEdges::Sequence).integer().not_null())
            .col(ColumnDef::new(DataFlowEdges::SourceSystemId).uuid().null())
            .col(ColumnDef::new(DataFlowEdges::SourceVendorId).uuid().null())
            .col(ColumnDef::new(DataFlowEdges::DestinationSystemId).uuid().null())
            .col(ColumnDef::new(DataFlowEdges::DestinationVendorId).uuid().null())
            .col(text_col(DataFlowEdges::Description))
            .foreign_key(&mut cascade_fk(
                "fk_data_flow_edges_flow",
                DataFlowEdges::Table,
                DataFlowEdges::DataFlowId,
                DataFlows::Table,
                DataFlows::Id,
            ));
        scope_columns(&mut table, Audit::Updatable);
        manager.create_table(table.to_owned()).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_data_flow_edges_flow_sequence")
                    .table(DataFlowEdges::Table)
                    .col(DataFlowEdges::DataFlowId)
                    .col(DataFlowEdges::Sequence)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // data_flow_edge_categories
        let mut table = Table::create();
        table
            .table(DataFlowEdgeCategories::Table)
            .if_not_exists()
            .col(uuid_col(DataFlowEdgeCategories::EdgeId))
            .col(uuid_col(DataFlowEdgeCategories::DataCategoryId))
            .primary_key(
                Index::create()
                    .col(DataFlowEdgeCategories::EdgeId)
                    .col(DataFlowEdgeCategories::DataCategoryId),
            )
            .foreign_key(&mut cascade_fk(
                "fk_edge_categories_edge",
                DataFlowEdgeCategories::Table,
                DataFlowEdgeCategories::EdgeId,
                DataFlowEdges::Table,
                DataFlowEdges::Id,
            ))
            .foreign_key(&mut restrict_fk(
                "fk_edge_categories_category",
                DataFlowEdgeCategories::Table,
                DataFlowEdgeCategories::DataCategoryId,
                DataCategories::Table,
                DataCategories::Id,
            ));
        scope_columns(&mut table, Audit::CreatedOnly);
        manager.create_table(table.to_owned()).await?;

        // cross_border_transfers
        let mut table = Table::create();
        table
            .table(CrossBorderTransfers::Table)
            .if_not_exists()
            .col(uuid_pk(CrossBorderTransfers::Id))
            .col(uuid_col(CrossBorderTransfers::EdgeId).unique_key())
            .col(uuid_col(CrossBorderTransfers::ExporterJurisdictionId))
            .col(uuid_col(CrossBorderTransfers::ImporterJurisdictionId))
            .col(name_col(CrossBorderTransfers::TransferMechanism))
            .col(text_col(CrossBorderTransfers::Safeguards))
            .col(
                ColumnDef::new(CrossBorderTransfers::TiaCompleted)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .foreign_key(&mut cascade_fk(
                "fk_transfers_edge",
                CrossBorderTransfers::Table,
                CrossBorderTransfers::EdgeId,
                DataFlowEdges::Table,
                DataFlowEdges::Id,
            ))
            .foreign_key(&mut restrict_fk(
                "fk_transfers_exporter",
                CrossBorderTransfers::Table,
                CrossBorderTransfers::ExporterJurisdictionId,
                Jurisdictions::Table,
                Jurisdictions::Id,
            ))
            .foreign_key(&mut restrict_fk(
                "fk_transfers_importer",
                CrossBorderTransfers::Table,
                CrossBorderTransfers::ImporterJurisdictionId,
                Jurisdictions::Table,
                Jurisdictions::Id,
            ));
        scope_columns(&mut table, Audit::Updatable);
        manager.create_table(table.to_owned()).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CrossBorderTransfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DataFlowEdgeCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DataFlowEdges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DataFlows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RetentionPolicies::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum RetentionPolicies {
    Table,
    Id,
    Name,
    Description,
    RetentionPeriodDays,
    RetentionCriteria,
    DeletionMethod,
    LegalReference,
}

#[derive(DeriveIden)]
pub enum DataFlows {
    Table,
    Id,
    Name,
    Description,
    Status,
}

#[derive(DeriveIden)]
enum DataFlowEdges {
    Table,
    Id,
    DataFlowId,
    Sequence,
    SourceSystemId,
    SourceVendorId,
    DestinationSystemId,
    DestinationVendorId,
    Description,
}

#[derive(DeriveIden)]
enum DataFlowEdgeCategories {
    Table,
    EdgeId,
    DataCategoryId,
}

#[derive(DeriveIden)]
enum CrossBorderTransfers {
    Table,
    Id,
    EdgeId,
    ExporterJurisdictionId,
    ImporterJurisdictionId,
    TransferMechanism,
    Safeguards,
    TiaCompleted,
}
