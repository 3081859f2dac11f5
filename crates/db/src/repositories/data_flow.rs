//! Data flow repository: flows, ordered edges, carried categories and
//! cross-border transfers.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::jurisdiction::transfer_facts;
use super::scope::{Scoped, SoftDeletable, fetch_page, unique_ids};
use crate::entities::{
    cross_border_transfers, data_categories, data_flow_edge_categories, data_flow_edges,
    data_flows, jurisdictions, systems, vendors,
};
use dataguard_core::flow::{
    EdgeEndpoint, EdgeEndpoints, EdgeSide, FlowError, TransferAssessment, next_sequence,
    validate_edge_sequence, validate_flow, validate_transfer,
};
use dataguard_core::gdpr::{DataFlowStatus, TransferMechanism};
use dataguard_core::validation::{MAX_TEXT_LEN, optional_text};
use dataguard_shared::types::{PageRequest, PageResponse};
use dataguard_shared::{AppError, TenantScope};

/// Error types for data flow operations.
#[derive(Debug, thiserror::Error)]
pub enum DataFlowError {
    /// A flow rule was violated.
    #[error(transparent)]
    Rule(#[from] FlowError),

    /// Another live flow in the workspace has this name.
    #[error("Data flow '{0}' already exists")]
    DuplicateName(String),

    /// Flow not found.
    #[error("Data flow not found: {0}")]
    NotFound(Uuid),

    /// Edge not found in this flow.
    #[error("Data flow edge not found: {0}")]
    EdgeNotFound(Uuid),

    /// An edge endpoint is not a live system or vendor of the workspace.
    #[error("Edge {side} not found: {id}")]
    EndpointNotFound {
        /// Which end.
        side: EdgeSide,
        /// Missing system or vendor.
        id: Uuid,
    },

    /// A carried category is not live in the workspace.
    #[error("Data category not found: {0}")]
    CategoryNotFound(Uuid),

    /// Jurisdiction not found.
    #[error("Jurisdiction not found: {0}")]
    JurisdictionNotFound(Uuid),

    /// The edge has no transfer.
    #[error("Edge {0} has no cross-border transfer")]
    TransferNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DataFlowError> for AppError {
    fn from(err: DataFlowError) -> Self {
        match err {
            DataFlowError::Rule(e @ FlowError::DuplicateSequence(_)) => Self::Conflict(e.to_string()),
            DataFlowError::Rule(e) => Self::Validation(e.to_string()),
            e @ (DataFlowError::EndpointNotFound { .. }
            | DataFlowError::CategoryNotFound(_)
            | DataFlowError::JurisdictionNotFound(_)) => Self::Validation(e.to_string()),
            e @ DataFlowError::DuplicateName(_) => Self::Conflict(e.to_string()),
            e @ (DataFlowError::NotFound(_)
            | DataFlowError::EdgeNotFound(_)
            | DataFlowError::TransferNotFound(_)) => Self::NotFound(e.to_string()),
            DataFlowError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a data flow.
#[derive(Debug, Clone)]
pub struct CreateDataFlowInput {
    /// Flow name (unique within the workspace).
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: String,
}

/// Input for updating a data flow.
#[derive(Debug, Clone, Default)]
pub struct UpdateDataFlowInput {
    /// Flow name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<Option<String>>,
    /// Lifecycle status.
    pub status: Option<String>,
}

/// Filter options for listing flows.
#[derive(Debug, Clone, Default)]
pub struct DataFlowFilter {
    /// Name substring.
    pub search: Option<String>,
    /// Only this status.
    pub status: Option<DataFlowStatus>,
}

/// Input for adding an edge.
#[derive(Debug, Clone, Default)]
pub struct CreateEdgeInput {
    /// Position in the flow; the next free number when absent.
    pub sequence: Option<i32>,
    /// Source and destination columns.
    pub endpoints: EdgeEndpoints,
    /// Description.
    pub description: Option<String>,
    /// Data categories carried by the edge.
    pub data_category_ids: Vec<Uuid>,
}

/// Input for updating an edge.
///
/// Endpoint columns are replaced as a set when `endpoints` is present.
#[derive(Debug, Clone, Default)]
pub struct UpdateEdgeInput {
    /// New position.
    pub sequence: Option<i32>,
    /// New source and destination columns.
    pub endpoints: Option<EdgeEndpoints>,
    /// Description.
    pub description: Option<Option<String>>,
}

/// Input for setting an edge's transfer.
#[derive(Debug, Clone)]
pub struct TransferInput {
    /// Jurisdiction the data leaves.
    pub exporter_jurisdiction_id: Uuid,
    /// Jurisdiction the data enters.
    pub importer_jurisdiction_id: Uuid,
    /// Chapter V mechanism.
    pub transfer_mechanism: String,
    /// Supplementary measures.
    pub safeguards: Option<String>,
    /// A transfer impact assessment was done.
    pub tia_completed: bool,
}

/// A stored transfer with its assessment.
#[derive(Debug, Clone, Serialize)]
pub struct TransferRecord {
    /// The transfer row.
    #[serde(flatten)]
    pub transfer: cross_border_transfers::Model,
    /// Outcome of the transfer rules.
    pub assessment: TransferAssessment,
}

/// An edge with the categories it carries and its transfer.
#[derive(Debug, Clone, Serialize)]
pub struct EdgeDetails {
    /// The edge row.
    #[serde(flatten)]
    pub edge: data_flow_edges::Model,
    /// Carried category IDs.
    pub data_category_ids: Vec<Uuid>,
    /// Cross-border transfer, if any.
    pub transfer: Option<cross_border_transfers::Model>,
}

/// A flow with its edges in sequence order.
#[derive(Debug, Clone, Serialize)]
pub struct DataFlowDetails {
    /// The flow row.
    #[serde(flatten)]
    pub flow: data_flows::Model,
    /// Edges ordered by sequence.
    pub edges: Vec<EdgeDetails>,
}

/// Data flow repository.
#[derive(Debug, Clone)]
pub struct DataFlowRepository {
    db: DatabaseConnection,
    scope: TenantScope,
}

impl DataFlowRepository {
    /// Creates a new data flow repository for a workspace.
    #[must_use]
    pub const fn new(db: DatabaseConnection, scope: TenantScope) -> Self {
        Self { db, scope }
    }

    /// Creates a data flow.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the name is taken.
    pub async fn create(
        &self,
        input: CreateDataFlowInput,
    ) -> Result<data_flows::Model, DataFlowError> {
        let (name, description, status) =
            validate_flow(&input.name, input.description.as_deref(), &input.status)?;
        self.ensure_unique_name(&name, None).await?;

        let now = chrono::Utc::now();
        let flow = data_flows::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(self.scope.tenant()),
            workspace_id: Set(self.scope.workspace()),
            name: Set(name),
            description: Set(description),
            status: Set(status.as_str().to_string()),
            created_at: Set(now),
            created_by: Set(self.scope.user()),
            updated_at: Set(now),
            updated_by: Set(self.scope.user()),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        info!(flow_id = %flow.id, name = %flow.name, "Data flow created");
        Ok(flow)
    }

    /// Lists live flows, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: DataFlowFilter,
        page: PageRequest,
    ) -> Result<PageResponse<data_flows::Model>, DataFlowError> {
        let mut query = data_flows::Entity::live(&self.scope).order_by_asc(data_flows::Column::Name);

        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(data_flows::Column::Name.contains(search));
        }
        if let Some(status) = filter.status {
            query = query.filter(data_flows::Column::Status.eq(status.as_str()));
        }

        Ok(fetch_page(query, &self.db, page).await?)
    }

    /// Finds a live flow by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<data_flows::Model>, DataFlowError> {
        Ok(data_flows::Entity::live(&self.scope)
            .filter(data_flows::Column::Id.eq(id))
            .one(&self.db)
            .await?)
    }

    /// Finds a flow with its edges in sequence order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_edges(
        &self,
        id: Uuid,
    ) -> Result<Option<DataFlowDetails>, DataFlowError> {
        let Some(flow) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let edges_with_transfers = data_flow_edges::Entity::in_scope(&self.scope)
            .filter(data_flow_edges::Column::DataFlowId.eq(id))
            .order_by_asc(data_flow_edges::Column::Sequence)
            .find_also_related(cross_border_transfers::Entity)
            .all(&self.db)
            .await?;

        let edge_ids: Vec<Uuid> = edges_with_transfers.iter().map(|(edge, _)| edge.id).collect();
        let mut categories: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in data_flow_edge_categories::Entity::in_scope(&self.scope)
            .filter(data_flow_edge_categories::Column::EdgeId.is_in(edge_ids))
            .all(&self.db)
            .await?
        {
            categories
                .entry(link.edge_id)
                .or_default()
                .push(link.data_category_id);
        }

        let edges = edges_with_transfers
            .into_iter()
            .map(|(edge, transfer)| EdgeDetails {
                data_category_ids: categories.remove(&edge.id).unwrap_or_default(),
                edge,
                transfer,
            })
            .collect();

        Ok(Some(DataFlowDetails { flow, edges }))
    }

    /// Updates a flow.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is missing, the merged fields fail
    /// validation or the new name is taken.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateDataFlowInput,
    ) -> Result<data_flows::Model, DataFlowError> {
        let flow = self.find_by_id(id).await?.ok_or(DataFlowError::NotFound(id))?;

        let name = input.name.unwrap_or_else(|| flow.name.clone());
        let description = input.description.unwrap_or_else(|| flow.description.clone());
        let status = input.status.unwrap_or_else(|| flow.status.clone());

        let (name, description, status) = validate_flow(&name, description.as_deref(), &status)?;
        if name != flow.name {
            self.ensure_unique_name(&name, Some(id)).await?;
        }

        let mut active: data_flows::ActiveModel = flow.into();
        active.name = Set(name);
        active.description = Set(description);
        active.status = Set(status.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now());
        active.updated_by = Set(self.scope.user());

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes a flow. Its edges stay attached to the deleted flow.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no live flow with this ID.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), DataFlowError> {
        let flow = self.find_by_id(id).await?.ok_or(DataFlowError::NotFound(id))?;

        let now = chrono::Utc::now();
        let mut active: data_flows::ActiveModel = flow.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.updated_by = Set(self.scope.user());
        active.update(&self.db).await?;

        info!(flow_id = %id, "Data flow deleted");
        Ok(())
    }

    // ========================================================================
    // Edges
    // ========================================================================

    /// Adds an edge and the categories it carries.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is missing, the endpoints are not exactly
    /// one source and one destination, an endpoint or category does not
    /// exist, or the sequence is negative or taken.
    pub async fn add_edge(
        &self,
        flow_id: Uuid,
        input: CreateEdgeInput,
    ) -> Result<data_flow_edges::Model, DataFlowError> {
        self.find_by_id(flow_id)
            .await?
            .ok_or(DataFlowError::NotFound(flow_id))?;

        let (source, destination) = input.endpoints.resolve()?;
        self.ensure_endpoint(EdgeSide::Source, source).await?;
        self.ensure_endpoint(EdgeSide::Destination, destination).await?;
        let description = optional_text("description", input.description.as_deref(), MAX_TEXT_LEN)
            .map_err(FlowError::from)?;

        let used = self.used_sequences(flow_id, None).await?;
        let sequence = match input.sequence {
            Some(sequence) => {
                validate_edge_sequence(&used, sequence)?;
                sequence
            }
            None => next_sequence(&used),
        };

        let category_ids = unique_ids(input.data_category_ids);
        self.ensure_categories(&category_ids).await?;

        let now = chrono::Utc::now();
        let txn = self.db.begin().await?;
        let edge = data_flow_edges::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(self.scope.tenant()),
            workspace_id: Set(self.scope.workspace()),
            data_flow_id: Set(flow_id),
            sequence: Set(sequence),
            source_system_id: Set(input.endpoints.source_system_id),
            source_vendor_id: Set(input.endpoints.source_vendor_id),
            destination_system_id: Set(input.endpoints.destination_system_id),
            destination_vendor_id: Set(input.endpoints.destination_vendor_id),
            description: Set(description),
            created_at: Set(now),
            created_by: Set(self.scope.user()),
            updated_at: Set(now),
            updated_by: Set(self.scope.user()),
        }
        .insert(&txn)
        .await?;
        self.insert_edge_categories(&txn, edge.id, &category_ids).await?;
        txn.commit().await?;

        info!(
            flow_id = %flow_id,
            edge_id = %edge.id,
            sequence,
            categories = category_ids.len(),
            "Data flow edge added"
        );
        Ok(edge)
    }

    /// Updates an edge's position, endpoints or description.
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound` or any rule `add_edge` enforces.
    pub async fn update_edge(
        &self,
        flow_id: Uuid,
        edge_id: Uuid,
        input: UpdateEdgeInput,
    ) -> Result<data_flow_edges::Model, DataFlowError> {
        let edge = self.find_edge(flow_id, edge_id).await?;

        let endpoints = input.endpoints.unwrap_or(EdgeEndpoints {
            source_system_id: edge.source_system_id,
            source_vendor_id: edge.source_vendor_id,
            destination_system_id: edge.destination_system_id,
            destination_vendor_id: edge.destination_vendor_id,
        });
        let (source, destination) = endpoints.resolve()?;
        if input.endpoints.is_some() {
            self.ensure_endpoint(EdgeSide::Source, source).await?;
            self.ensure_endpoint(EdgeSide::Destination, destination).await?;
        }

        if let Some(sequence) = input.sequence
            && sequence != edge.sequence
        {
            let used = self.used_sequences(flow_id, Some(edge_id)).await?;
            validate_edge_sequence(&used, sequence)?;
        }

        let description = match input.description {
            Some(description) => optional_text("description", description.as_deref(), MAX_TEXT_LEN)
                .map_err(FlowError::from)?,
            None => edge.description.clone(),
        };

        let mut active: data_flow_edges::ActiveModel = edge.into();
        if let Some(sequence) = input.sequence {
            active.sequence = Set(sequence);
        }
        active.source_system_id = Set(endpoints.source_system_id);
        active.source_vendor_id = Set(endpoints.source_vendor_id);
        active.destination_system_id = Set(endpoints.destination_system_id);
        active.destination_vendor_id = Set(endpoints.destination_vendor_id);
        active.description = Set(description);
        active.updated_at = Set(chrono::Utc::now());
        active.updated_by = Set(self.scope.user());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an edge with its transfer and carried categories.
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound` if the flow has no such edge.
    pub async fn delete_edge(&self, flow_id: Uuid, edge_id: Uuid) -> Result<(), DataFlowError> {
        self.find_edge(flow_id, edge_id).await?;

        let txn = self.db.begin().await?;
        cross_border_transfers::Entity::delete_in_scope(&self.scope)
            .filter(cross_border_transfers::Column::EdgeId.eq(edge_id))
            .exec(&txn)
            .await?;
        data_flow_edge_categories::Entity::delete_in_scope(&self.scope)
            .filter(data_flow_edge_categories::Column::EdgeId.eq(edge_id))
            .exec(&txn)
            .await?;
        data_flow_edges::Entity::delete_in_scope(&self.scope)
            .filter(data_flow_edges::Column::Id.eq(edge_id))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!(flow_id = %flow_id, edge_id = %edge_id, "Data flow edge deleted");
        Ok(())
    }

    /// Replaces the categories an edge carries.
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound` or `CategoryNotFound`. Nothing changes on error.
    pub async fn set_edge_categories(
        &self,
        flow_id: Uuid,
        edge_id: Uuid,
        data_category_ids: Vec<Uuid>,
    ) -> Result<Vec<Uuid>, DataFlowError> {
        self.find_edge(flow_id, edge_id).await?;
        let category_ids = unique_ids(data_category_ids);
        self.ensure_categories(&category_ids).await?;

        let txn = self.db.begin().await?;
        data_flow_edge_categories::Entity::delete_in_scope(&self.scope)
            .filter(data_flow_edge_categories::Column::EdgeId.eq(edge_id))
            .exec(&txn)
            .await?;
        self.insert_edge_categories(&txn, edge_id, &category_ids).await?;
        txn.commit().await?;

        info!(edge_id = %edge_id, count = category_ids.len(), "Edge categories set");
        Ok(category_ids)
    }

    // ========================================================================
    // Cross-border transfers
    // ========================================================================

    /// Creates or replaces the transfer recorded on an edge.
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound`, `JurisdictionNotFound`, or a rule error when
    /// the jurisdictions are equal or adequacy is claimed for an importer
    /// without it.
    pub async fn set_transfer(
        &self,
        flow_id: Uuid,
        edge_id: Uuid,
        input: TransferInput,
    ) -> Result<TransferRecord, DataFlowError> {
        self.find_edge(flow_id, edge_id).await?;

        let mechanism: TransferMechanism =
            input.transfer_mechanism.trim().parse().map_err(FlowError::from)?;
        let exporter = self.jurisdiction(input.exporter_jurisdiction_id).await?;
        let importer = self.jurisdiction(input.importer_jurisdiction_id).await?;
        let assessment =
            validate_transfer(&transfer_facts(&exporter), &transfer_facts(&importer), mechanism)?;
        let safeguards = optional_text("safeguards", input.safeguards.as_deref(), MAX_TEXT_LEN)
            .map_err(FlowError::from)?;

        let now = chrono::Utc::now();
        let existing = cross_border_transfers::Entity::in_scope(&self.scope)
            .filter(cross_border_transfers::Column::EdgeId.eq(edge_id))
            .one(&self.db)
            .await?;

        let transfer = match existing {
            Some(existing) => {
                let mut active: cross_border_transfers::ActiveModel = existing.into();
                active.exporter_jurisdiction_id = Set(exporter.id);
                active.importer_jurisdiction_id = Set(importer.id);
                active.transfer_mechanism = Set(mechanism.as_str().to_string());
                active.safeguards = Set(safeguards);
                active.tia_completed = Set(input.tia_completed);
                active.updated_at = Set(now);
                active.updated_by = Set(self.scope.user());
                active.update(&self.db).await?
            }
            None => {
                cross_border_transfers::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    tenant_id: Set(self.scope.tenant()),
                    workspace_id: Set(self.scope.workspace()),
                    edge_id: Set(edge_id),
                    exporter_jurisdiction_id: Set(exporter.id),
                    importer_jurisdiction_id: Set(importer.id),
                    transfer_mechanism: Set(mechanism.as_str().to_string()),
                    safeguards: Set(safeguards),
                    tia_completed: Set(input.tia_completed),
                    created_at: Set(now),
                    created_by: Set(self.scope.user()),
                    updated_at: Set(now),
                    updated_by: Set(self.scope.user()),
                }
                .insert(&self.db)
                .await?
            }
        };

        info!(
            edge_id = %edge_id,
            exporter = %exporter.country_code,
            importer = %importer.country_code,
            mechanism = %mechanism,
            requires_safeguards = assessment.requires_safeguards,
            "Cross-border transfer recorded"
        );
        Ok(TransferRecord {
            transfer,
            assessment,
        })
    }

    /// Removes the transfer recorded on an edge.
    ///
    /// # Errors
    ///
    /// Returns `EdgeNotFound` or `TransferNotFound`.
    pub async fn remove_transfer(&self, flow_id: Uuid, edge_id: Uuid) -> Result<(), DataFlowError> {
        self.find_edge(flow_id, edge_id).await?;
        let result = cross_border_transfers::Entity::delete_in_scope(&self.scope)
            .filter(cross_border_transfers::Column::EdgeId.eq(edge_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(DataFlowError::TransferNotFound(edge_id));
        }

        info!(edge_id = %edge_id, "Cross-border transfer removed");
        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn find_edge(
        &self,
        flow_id: Uuid,
        edge_id: Uuid,
    ) -> Result<data_flow_edges::Model, DataFlowError> {
        self.find_by_id(flow_id)
            .await?
            .ok_or(DataFlowError::NotFound(flow_id))?;
        data_flow_edges::Entity::in_scope(&self.scope)
            .filter(data_flow_edges::Column::DataFlowId.eq(flow_id))
            .filter(data_flow_edges::Column::Id.eq(edge_id))
            .one(&self.db)
            .await?
            .ok_or(DataFlowError::EdgeNotFound(edge_id))
    }

    async fn used_sequences(&self, flow_id: Uuid, exclude: Option<Uuid>) -> Result<Vec<i32>, DbErr> {
        let mut query = data_flow_edges::Entity::in_scope(&self.scope)
            .select_only()
            .column(data_flow_edges::Column::Sequence)
            .filter(data_flow_edges::Column::DataFlowId.eq(flow_id));
        if let Some(edge_id) = exclude {
            query = query.filter(data_flow_edges::Column::Id.ne(edge_id));
        }
        query.into_tuple::<i32>().all(&self.db).await
    }

    async fn ensure_endpoint(&self, side: EdgeSide, endpoint: EdgeEndpoint) -> Result<(), DataFlowError> {
        let (id, found) = match endpoint {
            EdgeEndpoint::System(id) => {
                let id = id.into_inner();
                let found = systems::Entity::live(&self.scope)
                    .filter(systems::Column::Id.eq(id))
                    .count(&self.db)
                    .await?;
                (id, found)
            }
            EdgeEndpoint::Vendor(id) => {
                let id = id.into_inner();
                let found = vendors::Entity::live(&self.scope)
                    .filter(vendors::Column::Id.eq(id))
                    .count(&self.db)
                    .await?;
                (id, found)
            }
        };
        if found == 0 {
            return Err(DataFlowError::EndpointNotFound { side, id });
        }
        Ok(())
    }

    async fn ensure_categories(&self, ids: &[Uuid]) -> Result<(), DataFlowError> {
        if ids.is_empty() {
            return Ok(());
        }
        let found: Vec<Uuid> = data_categories::Entity::live(&self.scope)
            .select_only()
            .column(data_categories::Column::Id)
            .filter(data_categories::Column::Id.is_in(ids.iter().copied()))
            .into_tuple()
            .all(&self.db)
            .await?;
        match ids.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(DataFlowError::CategoryNotFound(*missing)),
            None => Ok(()),
        }
    }

    async fn insert_edge_categories<C: ConnectionTrait>(
        &self,
        conn: &C,
        edge_id: Uuid,
        category_ids: &[Uuid],
    ) -> Result<(), DbErr> {
        let now = chrono::Utc::now();
        for category_id in category_ids {
            data_flow_edge_categories::ActiveModel {
                edge_id: Set(edge_id),
                data_category_id: Set(*category_id),
                tenant_id: Set(self.scope.tenant()),
                workspace_id: Set(self.scope.workspace()),
                created_at: Set(now),
            }
            .insert(conn)
            .await?;
        }
        Ok(())
    }

    async fn jurisdiction(&self, id: Uuid) -> Result<jurisdictions::Model, DataFlowError> {
        jurisdictions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(DataFlowError::JurisdictionNotFound(id))
    }

    async fn ensure_unique_name(&self, name: &str, exclude: Option<Uuid>) -> Result<(), DataFlowError> {
        let mut query =
            data_flows::Entity::live(&self.scope).filter(data_flows::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(data_flows::Column::Id.ne(id));
        }
        if query.count(&self.db).await? > 0 {
            return Err(DataFlowError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}
