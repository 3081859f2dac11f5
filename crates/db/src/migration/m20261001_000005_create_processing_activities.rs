//! Create processing activities and their link tables.

use sea_orm_migration::prelude::*;

use super::common::{
    Audit, cascade_fk, name_col, restrict_fk, scope_columns, text_col, uuid_col, uuid_pk,
    workspace_name_index,
};
use super::m20261001_000002_create_context_registers::{Systems, Vendors};
use super::m20261001_000003_create_data_categories::DataCategories;
use super::m20261001_000004_create_retention_and_flows::{DataFlows, RetentionPolicies};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut table = Table::create();
        table
            .table(ProcessingActivities::Table)
            .if_not_exists()
            .col(uuid_pk(ProcessingActivities::Id))
            .col(name_col(ProcessingActivities::Name))
            .col(text_col(ProcessingActivities::Description))
            .col(
                ColumnDef::new(ProcessingActivities::Purpose)
                    .text()
                    .not_null(),
            )
            .col(name_col(ProcessingActivities::LawfulBasis))
            .col(text_col(ProcessingActivities::LegitimateInterestAssessment))
            .col(
                ColumnDef::new(ProcessingActivities::DataSubjectTypes)
                    .json_binary()
                    .not_null(),
            )
            .col(name_col(ProcessingActivities::Status))
            .col(
                ColumnDef::new(ProcessingActivities::RequiresDpia)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(ProcessingActivities::DpoReviewRequired)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(ProcessingActivities::DpoReviewedAt)
                    .timestamp_with_time_zone()
                    .null(),
            )
            .col(
                ColumnDef::new(ProcessingActivities::LastReviewedAt)
                    .date()
                    .null(),
            )
            .col(
                ColumnDef::new(ProcessingActivities::NextReviewDate)
                    .date()
                    .null(),
            );
        scope_columns(&mut table, Audit::SoftDelete);
        manager.create_table(table.to_owned()).await?;
        manager
            .create_index(workspace_name_index(
                ProcessingActivities::Table,
                "idx_processing_activities_workspace_name",
            ))
            .await?;

        // activity_systems
        let mut table = Table::create();
        table
            .table(ActivitySystems::Table)
            .if_not_exists()
            .col(uuid_col(ActivitySystems::ActivityId))
            .col(uuid_col(ActivitySystems::SystemId))
            .col(name_col(ActivitySystems::Role))
            .primary_key(
                Index::create()
                    .col(ActivitySystems::ActivityId)
                    .col(ActivitySystems::SystemId),
            )
            .foreign_key(&mut cascade_fk(
                "fk_activity_systems_activity",
                ActivitySystems::Table,
                ActivitySystems::ActivityId,
                ProcessingActivities::Table,
                ProcessingActivities::Id,
            ))
            .foreign_key(&mut cascade_fk(
                "fk_activity_systems_system",
                ActivitySystems::Table,
                ActivitySystems::SystemId,
                Systems::Table,
                Systems::Id,
            ));
        scope_columns(&mut table, Audit::CreatedOnly);
        manager.create_table(table.to_owned()).await?;

        // activity_data_categories
        let mut table = Table::create();
        table
            .table(ActivityDataCategories::Table)
            .if_not_exists()
            .col(uuid_col(ActivityDataCategories::ActivityId))
            .col(uuid_col(ActivityDataCategories::DataCategoryId))
            .col(text_col(ActivityDataCategories::Justification))
            .primary_key(
                Index::create()
                    .col(ActivityDataCategories::ActivityId)
                    .col(ActivityDataCategories::DataCategoryId),
            )
            .foreign_key(&mut cascade_fk(
                "fk_activity_categories_activity",
                ActivityDataCategories::Table,
                ActivityDataCategories::ActivityId,
                ProcessingActivities::Table,
                ProcessingActivities::Id,
            ))
            .foreign_key(&mut restrict_fk(
                "fk_activity_categories_category",
                ActivityDataCategories::Table,
                ActivityDataCategories::DataCategoryId,
                DataCategories::Table,
                DataCategories::Id,
            ));
        scope_columns(&mut table, Audit::CreatedOnly);
        manager.create_table(table.to_owned()).await?;

        // usage counts look categories up by id
        manager
            .create_index(
                Index::create()
                    .name("idx_activity_data_categories_category")
                    .table(ActivityDataCategories::Table)
                    .col(ActivityDataCategories::DataCategoryId)
                    .to_owned(),
            )
            .await?;

        // activity_vendors
        let mut table = Table::create();
        table
            .table(ActivityVendors::Table)
            .if_not_exists()
            .col(uuid_col(ActivityVendors::ActivityId))
            .col(uuid_col(ActivityVendors::VendorId))
            .col(name_col(ActivityVendors::Role))
            .col(
                ColumnDef::new(ActivityVendors::ContractRequired)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .primary_key(
                Index::create()
                    .col(ActivityVendors::ActivityId)
                    .col(ActivityVendors::VendorId),
            )
            .foreign_key(&mut cascade_fk(
                "fk_activity_vendors_activity",
                ActivityVendors::Table,
                ActivityVendors::ActivityId,
                ProcessingActivities::Table,
                ProcessingActivities::Id,
            ))
            .foreign_key(&mut cascade_fk(
                "fk_activity_vendors_vendor",
                ActivityVendors::Table,
                ActivityVendors::VendorId,
                Vendors::Table,
                Vendors::Id,
            ));
        scope_columns(&mut table, Audit::CreatedOnly);
        manager.create_table(table.to_owned()).await?;

        // activity_retention_policies
        let mut table = Table::create();
        table
            .table(ActivityRetentionPolicies::Table)
            .if_not_exists()
            .col(uuid_col(ActivityRetentionPolicies::ActivityId))
            .col(uuid_col(ActivityRetentionPolicies::RetentionPolicyId))
            .primary_key(
                Index::create()
                    .col(ActivityRetentionPolicies::ActivityId)
                    .col(ActivityRetentionPolicies::RetentionPolicyId),
            )
            .foreign_key(&mut cascade_fk(
                "fk_activity_retention_activity",
                ActivityRetentionPolicies::Table,
                ActivityRetentionPolicies::ActivityId,
                ProcessingActivities::Table,
                ProcessingActivities::Id,
            ))
            .foreign_key(&mut cascade_fk(
                "fk_activity_retention_policy",
                ActivityRetentionPolicies::Table,
                ActivityRetentionPolicies::RetentionPolicyId,
                RetentionPolicies::Table,
                RetentionPolicies::Id,
            ));
        scope_columns(&mut table, Audit::CreatedOnly);
        manager.create_table(table.to_owned()).await?;

        // activity_data_flows
        let mut table = Table::create();
        table
            .table(ActivityDataFlows::Table)
            .if_not_exists()
            .col(uuid_col(ActivityDataFlows::ActivityId))
            .col(uuid_col(ActivityDataFlows::DataFlowId))
            .primary_key(
                Index::create()
                    .col(ActivityDataFlows::ActivityId)
                    .col(ActivityDataFlows::DataFlowId),
            )
            .foreign_key(&mut cascade_fk(
                "fk_activity_flows_activity",
                ActivityDataFlows::Table,
                ActivityDataFlows::ActivityId,
                ProcessingActivities::Table,
                ProcessingActivities::Id,
            ))
            .foreign_key(&mut cascade_fk(
                "fk_activity_flows_flow",
                ActivityDataFlows::Table,
                ActivityDataFlows::DataFlowId,
                DataFlows::Table,
                DataFlows::Id,
            ));
        scope_columns(&mut table, Audit::CreatedOnly);
        manager.create_table(table.to_owned()).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityDataFlows::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ActivityRetentionPolicies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ActivityVendors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ActivityDataCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ActivitySystems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProcessingActivities::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ProcessingActivities {
    Table,
    Id,
    Name,
    Description,
    Purpose,
    LawfulBasis,
    LegitimateInterestAssessment,
    DataSubjectTypes,
    Status,
    RequiresDpia,
    DpoReviewRequired,
    DpoReviewedAt,
    LastReviewedAt,
    NextReviewDate,
}

#[derive(DeriveIden)]
enum ActivitySystems {
    Table,
    ActivityId,
    SystemId,
    Role,
}

#[derive(DeriveIden)]
enum ActivityDataCategories {
    Table,
    ActivityId,
    DataCategoryId,
    Justification,
}

#[derive(DeriveIden)]
enum ActivityVendors {
    Table,
    ActivityId,
    VendorId,
    Role,
    ContractRequired,
}

#[derive(DeriveIden)]
enum ActivityRetentionPolicies {
    Table,
    ActivityId,
    RetentionPolicyId,
}

#[derive(DeriveIden)]
enum ActivityDataFlows {
    Table,
    ActivityId,
    DataFlowId,
}
