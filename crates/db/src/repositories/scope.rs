//! Tenant, workspace and soft-delete filters shared by the repositories.

use std::collections::HashSet;

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, DeleteMany, EntityTrait, PaginatorTrait, QueryFilter,
    Select,
};

use crate::entities::{
    activity_data_categories, activity_data_flows, activity_retention_policies, activity_systems,
    activity_vendors, cross_border_transfers, data_categories, data_flow_edge_categories,
    data_flow_edges, data_flows, dpia_assessments, physical_locations, processing_activities,
    retention_policies, system_endpoints, system_locations, systems, vendor_contracts,
    vendor_locations, vendors,
};
use dataguard_shared::TenantScope;
use uuid::Uuid;
use dataguard_shared::types::{PageRequest, PageResponse};

/// Entity owned by a tenant workspace.
pub trait Scoped: EntityTrait {
    /// `tenant_id` column.
    const TENANT_ID: Self::Column;
    /// `workspace_id` column.
    const WORKSPACE_ID: Self::Column;

    /// Rows of the scope's workspace.
    fn in_scope(scope: &TenantScope) -> Select<Self> {
        Self::find()
            .filter(Self::TENANT_ID.eq(scope.tenant()))
            .filter(Self::WORKSPACE_ID.eq(scope.workspace()))
    }

    /// Hard delete restricted to the scope's workspace.
    fn delete_in_scope(scope: &TenantScope) -> DeleteMany<Self> {
        Self::delete_many()
            .filter(Self::TENANT_ID.eq(scope.tenant()))
            .filter(Self::WORKSPACE_ID.eq(scope.workspace()))
    }
}

/// Scoped entity with a `deleted_at` column.
pub trait SoftDeletable: Scoped {
    /// `deleted_at` column.
    const DELETED_AT: Self::Column;

    /// Live rows of the scope's workspace.
    fn live(scope: &TenantScope) -> Select<Self> {
        Self::in_scope(scope).filter(Self::DELETED_AT.is_null())
    }
}

macro_rules! scoped {
    ($($module:ident),+ $(,)?) => {
        $(
            impl Scoped for $module::Entity {
                const TENANT_ID: $module::Column = $module::Column::TenantId;
                const WORKSPACE_ID: $module::Column = $module::Column::WorkspaceId;
            }
        )+
    };
}

macro_rules! soft_deletable {
    ($($module:ident),+ $(,)?) => {
        $(
            impl SoftDeletable for $module::Entity {
                const DELETED_AT: $module::Column = $module::Column::DeletedAt;
            }
        )+
    };
}

scoped!(
    physical_locations,
    vendors,
    vendor_contracts,
    vendor_locations,
    systems,
    system_endpoints,
    system_locations,
    data_categories,
    processing_activities,
    activity_systems,
    activity_data_categories,
    activity_vendors,
    activity_retention_policies,
    activity_data_flows,
    data_flows,
    data_flow_edges,
    data_flow_edge_categories,
    cross_border_transfers,
    retention_policies,
    dpia_assessments,
);

soft_deletable!(
    physical_locations,
    vendors,
    systems,
    data_categories,
    processing_activities,
    data_flows,
    retention_policies,
    dpia_assessments,
);

/// Runs a list query one page at a time.
pub async fn fetch_page<E>(
    query: Select<E>,
    db: &DatabaseConnection,
    page: PageRequest,
) -> Result<PageResponse<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    let page = page.normalized();
    let paginator = query.paginate(db, page.limit());
    let total = paginator.num_items().await?;
    let data = paginator.fetch_page(u64::from(page.page - 1)).await?;
    Ok(PageResponse::new(data, page.page, page.per_page, total))
}

/// Drops repeated IDs, keeping first-seen order.
pub fn unique_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
