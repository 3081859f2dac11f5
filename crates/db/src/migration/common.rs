//! Column helpers shared by the migrations.

use sea_orm_migration::prelude::*;

/// Ownership and audit columns of tenant-scoped tables.
#[derive(DeriveIden)]
pub enum Scoped {
    TenantId,
    WorkspaceId,
    CreatedAt,
    CreatedBy,
    UpdatedAt,
    UpdatedBy,
    DeletedAt,
}

/// Which audit columns a scoped table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audit {
    /// Created/updated stamps plus `deleted_at`.
    SoftDelete,
    /// Created/updated stamps, hard delete.
    Updatable,
    /// Only `created_at` (join rows).
    CreatedOnly,
}

/// UUID primary key column.
pub fn uuid_pk<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).uuid().not_null().primary_key().to_owned()
}

/// Non-null UUID column.
pub fn uuid_col<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).uuid().not_null().to_owned()
}

/// Non-null bounded string column.
pub fn name_col<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).string_len(255).not_null().to_owned()
}

/// Nullable text column.
pub fn text_col<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name).text().null().to_owned()
}

/// Adds `tenant_id`, `workspace_id` and the audit columns.
pub fn scope_columns(table: &mut TableCreateStatement, audit: Audit) -> &mut TableCreateStatement {
    table
        .col(uuid_col(Scoped::TenantId))
        .col(uuid_col(Scoped::WorkspaceId))
        .col(
            ColumnDef::new(Scoped::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        );

    if audit != Audit::CreatedOnly {
        table
            .col(uuid_col(Scoped::CreatedBy))
            .col(
                ColumnDef::new(Scoped::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(uuid_col(Scoped::UpdatedBy));
    }
    if audit == Audit::SoftDelete {
        table.col(
            ColumnDef::new(Scoped::DeletedAt)
                .timestamp_with_time_zone()
                .null(),
        );
    }
    table
}

/// Index on `(workspace_id, name)` for scoped lookups by name.
pub fn workspace_name_index<T>(table: T, name: &str) -> IndexCreateStatement
where
    T: IntoIden + 'static,
{
    Index::create()
        .name(name)
        .table(table)
        .col(Scoped::WorkspaceId)
        .col(Alias::new("name"))
        .to_owned()
}

/// Foreign key that deletes children with their parent.
pub fn cascade_fk<T, C, R, P>(name: &str, table: T, column: C, parent: R, parent_column: P) -> ForeignKeyCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden,
    R: IntoIden + 'static,
    P: IntoIden,
{
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(parent, parent_column)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

/// Foreign key that blocks deleting a referenced row.
pub fn restrict_fk<T, C, R, P>(name: &str, table: T, column: C, parent: R, parent_column: P) -> ForeignKeyCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden,
    R: IntoIden + 'static,
    P: IntoIden,
{
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(parent, parent_column)
        .on_delete(ForeignKeyAction::Restrict)
        .to_owned()
}
