//! Create physical locations, vendors and systems with their child tables.

use sea_orm_migration::prelude::*;

use super::common::{
    Audit, cascade_fk, name_col, restrict_fk, scope_columns, text_col, uuid_col, uuid_pk,
    workspace_name_index,
};
use super::m20261001_000001_create_jurisdictions::Jurisdictions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // physical_locations
        let mut table = Table::create();
        table
            .table(PhysicalLocations::Table)
            .if_not_exists()
            .col(uuid_pk(PhysicalLocations::Id))
            .col(name_col(PhysicalLocations::Name))
            .col(text_col(PhysicalLocations::Description))
            .col(text_col(PhysicalLocations::Address))
            .col(ColumnDef::new(PhysicalLocations::City).string_len(255).null())
            .col(uuid_col(PhysicalLocations::JurisdictionId))
            .foreign_key(&mut restrict_fk(
                "fk_physical_locations_jurisdiction",
                PhysicalLocations::Table,
                PhysicalLocations::JurisdictionId,
                Jurisdictions::Table,
                Jurisdictions::Id,
            ));
        scope_columns(&mut table, Audit::SoftDelete);
        manager.create_table(table.to_owned()).await?;
        manager
            .create_index(workspace_name_index(
                PhysicalLocations::Table,
                "idx_physical_locations_workspace_name",
            ))
            .await?;

        // vendors
        let mut table = Table::create();
        table
            .table(Vendors::Table)
            .if_not_exists()
            .col(uuid_pk(Vendors::Id))
            .col(name_col(Vendors::Name))
            .col(text_col(Vendors::Description))
            .col(ColumnDef::new(Vendors::Website).string_len(255).null())
            .col(ColumnDef::new(Vendors::ContactEmail).string_len(255).null())
            .col(name_col(Vendors::VendorRole))
            .col(name_col(Vendors::Status));
        scope_columns(&mut table, Audit::SoftDelete);
        manager.create_table(table.to_owned()).await?;
        manager
            .create_index(workspace_name_index(
                Vendors::Table,
                "idx_vendors_workspace_name",
            ))
            .await?;

        // vendor_contracts
        let mut table = Table::create();
        table
            .table(VendorContracts::Table)
            .if_not_exists()
            .col(uuid_pk(VendorContracts::Id))
            .col(uuid_col(VendorContracts::VendorId))
            .col(name_col(VendorContracts::ContractType))
            .col(name_col(VendorContracts::Title))
            .col(ColumnDef::new(VendorContracts::StartDate).date().not_null())
            .col(ColumnDef::new(VendorContracts::EndDate).date().null())
            .col(ColumnDef::new(VendorContracts::ReviewDate).date().null())
            .foreign_key(&mut cascade_fk(
                "fk_vendor_contracts_vendor",
                VendorContracts::Table,
                VendorContracts::VendorId,
                Vendors::Table,
                Vendors::Id,
            ));
        scope_columns(&mut table, Audit::Updatable);
        manager.create_table(table.to_owned()).await?;

        // vendor_locations
        let mut table = Table::create();
        table
            .table(VendorLocations::Table)
            .if_not_exists()
            .col(uuid_col(VendorLocations::VendorId))
            .col(uuid_col(VendorLocations::LocationId))
            .primary_key(
                Index::create()
                    .col(VendorLocations::VendorId)
                    .col(VendorLocations::LocationId),
            )
            .foreign_key(&mut cascade_fk(
                "fk_vendor_locations_vendor",
                VendorLocations::Table,
                VendorLocations::VendorId,
                Vendors::Table,
                Vendors::Id,
            ))
            .foreign_key(&mut cascade_fk(
                "fk_vendor_locations_location",
                VendorLocations::Table,
                VendorLocations::LocationId,
                PhysicalLocations::Table,
                PhysicalLocations::Id,
            ));
        scope_columns(&mut table, Audit::CreatedOnly);
        manager.create_table(table.to_owned()).await?;

        // systems
        let mut table = Table::create();
        table
            .table(Systems::Table)
            .if_not_exists()
            .col(uuid_pk(Systems::Id))
            .col(name_col(Systems::Name))
            .col(text_col(Systems::Description))
            .col(name_col(Systems::SystemType))
            .col(ColumnDef::new(Systems::Owner).string_len(255).null())
            .col(name_col(Systems::Criticality))
            .col(name_col(Systems::Status));
        scope_columns(&mut table, Audit::SoftDelete);
        manager.create_table(table.to_owned()).await?;
        manager
            .create_index(workspace_name_index(
                Systems::Table,
                "idx_systems_workspace_name",
            ))
            .await?;

        // system_endpoints
        let mut table = Table::create();
        table
            .table(SystemEndpoints::Table)
            .if_not_exists()
            .col(uuid_pk(SystemEndpoints::Id))
            .col(uuid_col(SystemEndpoints::SystemId))
            .col(name_col(SystemEndpoints::Name))
            .col(name_col(SystemEndpoints::EndpointType))
            .col(text_col(SystemEndpoints::Url))
            .col(uuid_col(SystemEndpoints::CreatedBy))
            .foreign_key(&mut cascade_fk(
                "fk_system_endpoints_system",
                SystemEndpoints::Table,
                SystemEndpoints::SystemId,
                Systems::Table,
                Systems::Id,
            ));
        scope_columns(&mut table, Audit::CreatedOnly);
        manager.create_table(table.to_owned()).await?;

        // system_locations
        let mut table = Table::create();
        table
            .table(SystemLocations::Table)
            .if_not_exists()
            .col(uuid_col(SystemLocations::SystemId))
            .col(uuid_col(SystemLocations::LocationId))
            .primary_key(
                Index::create()
                    .col(SystemLocations::SystemId)
                    .col(SystemLocations::LocationId),
            )
            .foreign_key(&mut cascade_fk(
                "fk_system_locations_system",
                SystemLocations::Table,
                SystemLocations::SystemId,
                Systems::Table,
                Systems::Id,
            ))
            .foreign_key(&mut cascade_fk(
                "fk_system_locations_location",
                SystemLocations::Table,
                SystemLocations::LocationId,
                PhysicalLocations::Table,
                PhysicalLocations::Id,
            ));
        scope_columns(&mut table, Audit::CreatedOnly);
        manager.create_table(table.to_owned()).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SystemLocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SystemEndpoints::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Systems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VendorLocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VendorContracts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PhysicalLocations::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PhysicalLocations {
    Table,
    Id,
    Name,
    Description,
    Address,
    City,
    JurisdictionId,
}

#[derive(DeriveIden)]
pub enum Vendors {
    Table,
    Id,
    Name,
    Description,
    Website,
    ContactEmail,
    VendorRole,
    Status,
}

#[derive(DeriveIden)]
enum VendorContracts {
    Table,
    Id,
    VendorId,
    ContractType,
    Title,
    StartDate,
    EndDate,
    ReviewDate,
}

#[derive(DeriveIden)]
enum VendorLocations {
    Table,
    VendorId,
    LocationId,
}

#[derive(DeriveIden)]
pub enum Systems {
    Table,
    Id,
    Name,
    Description,
    SystemType,
    Owner,
    Criticality,
    Status,
}

#[derive(DeriveIden)]
enum SystemEndpoints {
    Table,
    Id,
    SystemId,
    Name,
    EndpointType,
    Url,
    CreatedBy,
}

#[derive(DeriveIden)]
enum SystemLocations {
    Table,
    SystemId,
    LocationId,
}
