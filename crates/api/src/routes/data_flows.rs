//! Data flow routes: flows, ordered edges and cross-border transfers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post, put},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{not_found, parse_filter};
use crate::{ApiResult, AppState, extractors::ValidatedJson, middleware::AuthUser};
use dataguard_core::flow::EdgeEndpoints;
use dataguard_db::DataFlowRepository;
use dataguard_db::entities::{data_flow_edges, data_flows};
use dataguard_db::repositories::{
    CreateDataFlowInput, CreateEdgeInput, DataFlowDetails, DataFlowFilter, TransferInput,
    TransferRecord, UpdateDataFlowInput, UpdateEdgeInput,
};
use dataguard_shared::types::{PageRequest, PageResponse};

/// Creates the data flow routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/context/data-flows", get(list_flows).post(create_flow))
        .route(
            "/context/data-flows/{id}",
            get(get_flow).patch(update_flow).delete(delete_flow),
        )
        .route("/context/data-flows/{id}/edges", post(add_edge))
        .route(
            "/context/data-flows/{id}/edges/{edge_id}",
            patch(update_edge).delete(delete_edge),
        )
        .route(
            "/context/data-flows/{id}/edges/{edge_id}/categories",
            put(set_edge_categories),
        )
        .route(
            "/context/data-flows/{id}/edges/{edge_id}/transfer",
            put(set_transfer).delete(remove_transfer),
        )
}

/// Query parameters for listing flows.
#[derive(Debug, Deserialize)]
pub struct ListFlowsQuery {
    /// Substring of the flow name.
    pub search: Option<String>,
    /// Only this status.
    pub status: Option<String>,
}

/// Request body for creating a flow.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFlowRequest {
    /// Flow name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Lifecycle status (default: draft).
    pub status: Option<String>,
}

/// Request body for updating a flow.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFlowRequest {
    /// Flow name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Description; `null` clears it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    /// Lifecycle status.
    pub status: Option<String>,
}

/// Endpoint columns of an edge; exactly one source and one destination.
#[derive(Debug, Default, Deserialize)]
pub struct EdgeEndpointsRequest {
    /// Source system.
    pub source_system_id: Option<Uuid>,
    /// Source vendor.
    pub source_vendor_id: Option<Uuid>,
    /// Destination system.
    pub destination_system_id: Option<Uuid>,
    /// Destination vendor.
    pub destination_vendor_id: Option<Uuid>,
}

impl EdgeEndpointsRequest {
    const fn is_empty(&self) -> bool {
        self.source_system_id.is_none()
            && self.source_vendor_id.is_none()
            && self.destination_system_id.is_none()
            && self.destination_vendor_id.is_none()
    }
}

impl From<EdgeEndpointsRequest> for EdgeEndpoints {
    fn from(req: EdgeEndpointsRequest) -> Self {
        Self {
            source_system_id: req.source_system_id,
            source_vendor_id: req.source_vendor_id,
            destination_system_id: req.destination_system_id,
            destination_vendor_id: req.destination_vendor_id,
        }
    }
}

/// Request body for adding an edge.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEdgeRequest {
    /// Position in the flow; the next free one when omitted.
    #[validate(range(min = 0))]
    pub sequence: Option<i32>,
    /// Source and destination.
    #[serde(flatten)]
    pub endpoints: EdgeEndpointsRequest,
    /// Description.
    pub description: Option<String>,
    /// Categories carried along the edge.
    #[serde(default)]
    pub data_category_ids: Vec<Uuid>,
}

/// Request body for updating an edge.
///
/// Endpoint columns replace all four stored ones when any is present.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEdgeRequest {
    /// New position.
    #[validate(range(min = 0))]
    pub sequence: Option<i32>,
    /// New endpoints.
    #[serde(flatten)]
    pub endpoints: EdgeEndpointsRequest,
    /// Description; `null` clears it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
}

/// Request body for replacing edge categories.
#[derive(Debug, Deserialize, Validate)]
pub struct SetEdgeCategoriesRequest {
    /// Categories carried along the edge.
    pub data_category_ids: Vec<Uuid>,
}

/// Request body for recording a cross-border transfer.
#[derive(Debug, Deserialize, Validate)]
pub struct TransferRequest {
    /// Jurisdiction the data leaves.
    pub exporter_jurisdiction_id: Uuid,
    /// Jurisdiction the data enters.
    pub importer_jurisdiction_id: Uuid,
    /// Chapter V mechanism.
    pub transfer_mechanism: String,
    /// Supplementary safeguards.
    pub safeguards: Option<String>,
    /// A transfer impact assessment was done.
    #[serde(default)]
    pub tia_completed: bool,
}

/// GET `/context/data-flows`.
async fn list_flows(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
    Query(query): Query<ListFlowsQuery>,
) -> ApiResult<Json<PageResponse<data_flows::Model>>> {
    let filter = DataFlowFilter {
        search: query.search,
        status: parse_filter(query.status.as_deref())?,
    };
    let flows = DataFlowRepository::new(state.db(), auth.scope())
        .list(filter, page)
        .await?;
    Ok(Json(flows))
}

/// POST `/context/data-flows`.
async fn create_flow(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateFlowRequest>,
) -> ApiResult<(StatusCode, Json<data_flows::Model>)> {
    let flow = DataFlowRepository::new(state.db(), auth.scope())
        .create(CreateDataFlowInput {
            name: payload.name,
            description: payload.description,
            status: payload.status.unwrap_or_else(|| "draft".to_string()),
        })
        .await?;

    info!(user_id = %auth.user_id(), flow_id = %flow.id, "Data flow created via API");
    Ok((StatusCode::CREATED, Json(flow)))
}

/// GET `/context/data-flows/{id}` - Flow with its edges in order.
async fn get_flow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DataFlowDetails>> {
    DataFlowRepository::new(state.db(), auth.scope())
        .find_with_edges(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Data flow", id))
}

/// PATCH `/context/data-flows/{id}`.
async fn update_flow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateFlowRequest>,
) -> ApiResult<Json<data_flows::Model>> {
    let flow = DataFlowRepository::new(state.db(), auth.scope())
        .update(
            id,
            UpdateDataFlowInput {
                name: payload.name,
                description: payload.description,
                status: payload.status,
            },
        )
        .await?;
    Ok(Json(flow))
}

/// DELETE `/context/data-flows/{id}`.
async fn delete_flow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    DataFlowRepository::new(state.db(), auth.scope())
        .soft_delete(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/context/data-flows/{id}/edges`.
async fn add_edge(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateEdgeRequest>,
) -> ApiResult<(StatusCode, Json<data_flow_edges::Model>)> {
    let edge = DataFlowRepository::new(state.db(), auth.scope())
        .add_edge(
            id,
            CreateEdgeInput {
                sequence: payload.sequence,
                endpoints: payload.endpoints.into(),
                description: payload.description,
                data_category_ids: payload.data_category_ids,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(edge)))
}

/// PATCH `/context/data-flows/{id}/edges/{edge_id}`.
async fn update_edge(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, edge_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<UpdateEdgeRequest>,
) -> ApiResult<Json<data_flow_edges::Model>> {
    let endpoints = (!payload.endpoints.is_empty()).then(|| payload.endpoints.into());
    let edge = DataFlowRepository::new(state.db(), auth.scope())
        .update_edge(
            id,
            edge_id,
            UpdateEdgeInput {
                sequence: payload.sequence,
                endpoints,
                description: payload.description,
            },
        )
        .await?;
    Ok(Json(edge))
}

/// DELETE `/context/data-flows/{id}/edges/{edge_id}`.
async fn delete_edge(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, edge_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    DataFlowRepository::new(state.db(), auth.scope())
        .delete_edge(id, edge_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/context/data-flows/{id}/edges/{edge_id}/categories`.
async fn set_edge_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, edge_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<SetEdgeCategoriesRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let ids = DataFlowRepository::new(state.db(), auth.scope())
        .set_edge_categories(id, edge_id, payload.data_category_ids)
        .await?;
    Ok(Json(json!({ "data_category_ids": ids })))
}

/// PUT `/context/data-flows/{id}/edges/{edge_id}/transfer` - Create or replace.
async fn set_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, edge_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<TransferRequest>,
) -> ApiResult<Json<TransferRecord>> {
    let record = DataFlowRepository::new(state.db(), auth.scope())
        .set_transfer(
            id,
            edge_id,
            TransferInput {
                exporter_jurisdiction_id: payload.exporter_jurisdiction_id,
                importer_jurisdiction_id: payload.importer_jurisdiction_id,
                transfer_mechanism: payload.transfer_mechanism,
                safeguards: payload.safeguards,
                tia_completed: payload.tia_completed,
            },
        )
        .await?;

    info!(
        edge_id = %edge_id,
        requires_safeguards = record.assessment.requires_safeguards,
        "Cross-border transfer recorded via API"
    );
    Ok(Json(record))
}

/// DELETE `/context/data-flows/{id}/edges/{edge_id}/transfer`.
async fn remove_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, edge_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    DataFlowRepository::new(state.db(), auth.scope())
        .remove_transfer(id, edge_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
