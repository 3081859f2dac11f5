//! System routes, with endpoints and hosting locations.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::vendors::SetLocationsRequest;
use super::{not_found, parse_filter};
use crate::{ApiResult, AppState, extractors::ValidatedJson, middleware::AuthUser};
use dataguard_db::SystemRepository;
use dataguard_db::entities::{system_endpoints, systems};
use dataguard_db::repositories::{
    CreateEndpointInput, CreateSystemInput, SystemDetails, SystemFilter, UpdateSystemInput,
};
use dataguard_shared::types::{PageRequest, PageResponse};

/// Creates the system routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/context/systems", get(list_systems).post(create_system))
        .route(
            "/context/systems/{id}",
            get(get_system).patch(update_system).delete(delete_system),
        )
        .route(
            "/context/systems/{id}/endpoints",
            get(list_endpoints).post(add_endpoint),
        )
        .route(
            "/context/systems/{id}/endpoints/{endpoint_id}",
            delete(delete_endpoint),
        )
        .route("/context/systems/{id}/locations", put(set_locations))
}

/// Query parameters for listing systems.
#[derive(Debug, Deserialize)]
pub struct ListSystemsQuery {
    /// Name substring.
    pub search: Option<String>,
    /// Only this deployment model.
    pub system_type: Option<String>,
    /// Only this criticality.
    pub criticality: Option<String>,
    /// Only this status.
    pub status: Option<String>,
}

/// Request body for creating a system.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSystemRequest {
    /// System name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Deployment model.
    pub system_type: String,
    /// Owning team or person.
    pub owner: Option<String>,
    /// Business criticality (default: medium).
    pub criticality: Option<String>,
    /// Lifecycle status (default: active).
    pub status: Option<String>,
}

/// Request body for updating a system; `null` clears a field.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSystemRequest {
    /// System name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Description.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    /// Deployment model.
    pub system_type: Option<String>,
    /// Owning team or person.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub owner: Option<Option<String>>,
    /// Business criticality.
    pub criticality: Option<String>,
    /// Lifecycle status.
    pub status: Option<String>,
}

/// Request body for adding an endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEndpointRequest {
    /// Endpoint name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Interface kind.
    pub endpoint_type: String,
    /// Address, if any.
    pub url: Option<String>,
}

/// GET `/context/systems` - List live systems.
async fn list_systems(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
    Query(query): Query<ListSystemsQuery>,
) -> ApiResult<Json<PageResponse<systems::Model>>> {
    let filter = SystemFilter {
        search: query.search,
        system_type: parse_filter(query.system_type.as_deref())?,
        criticality: parse_filter(query.criticality.as_deref())?,
        status: parse_filter(query.status.as_deref())?,
    };
    let systems = SystemRepository::new(state.db(), auth.scope())
        .list(filter, page)
        .await?;
    Ok(Json(systems))
}

/// POST `/context/systems` - Create a system.
async fn create_system(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateSystemRequest>,
) -> ApiResult<(StatusCode, Json<systems::Model>)> {
    let system = SystemRepository::new(state.db(), auth.scope())
        .create(CreateSystemInput {
            name: payload.name,
            description: payload.description,
            system_type: payload.system_type,
            owner: payload.owner,
            criticality: payload.criticality.unwrap_or_else(|| "medium".to_string()),
            status: payload.status.unwrap_or_else(|| "active".to_string()),
        })
        .await?;

    info!(user_id = %auth.user_id(), system_id = %system.id, "System created via API");
    Ok((StatusCode::CREATED, Json(system)))
}

/// GET `/context/systems/{id}` - System with endpoints and locations.
async fn get_system(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SystemDetails>> {
    SystemRepository::new(state.db(), auth.scope())
        .find_with_details(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("System", id))
}

/// PATCH `/context/systems/{id}`.
async fn update_system(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateSystemRequest>,
) -> ApiResult<Json<systems::Model>> {
    let system = SystemRepository::new(state.db(), auth.scope())
        .update(
            id,
            UpdateSystemInput {
                name: payload.name,
                description: payload.description,
                system_type: payload.system_type,
                owner: payload.owner,
                criticality: payload.criticality,
                status: payload.status,
            },
        )
        .await?;
    Ok(Json(system))
}

/// DELETE `/context/systems/{id}` - Soft-delete a system.
async fn delete_system(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    SystemRepository::new(state.db(), auth.scope())
        .soft_delete(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/context/systems/{id}/endpoints`.
async fn list_endpoints(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let repo = SystemRepository::new(state.db(), auth.scope());
    if repo.find_by_id(id).await?.is_none() {
        return Err(not_found("System", id));
    }
    let endpoints = repo.list_endpoints(id).await?;
    Ok(Json(json!({ "data": endpoints })))
}

/// POST `/context/systems/{id}/endpoints`.
async fn add_endpoint(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateEndpointRequest>,
) -> ApiResult<(StatusCode, Json<system_endpoints::Model>)> {
    let endpoint = SystemRepository::new(state.db(), auth.scope())
        .add_endpoint(
            id,
            CreateEndpointInput {
                name: payload.name,
                endpoint_type: payload.endpoint_type,
                url: payload.url,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(endpoint)))
}

/// DELETE `/context/systems/{id}/endpoints/{endpoint_id}`.
async fn delete_endpoint(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, endpoint_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    SystemRepository::new(state.db(), auth.scope())
        .delete_endpoint(id, endpoint_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/context/systems/{id}/locations` - Replace the hosting locations.
async fn set_locations(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SetLocationsRequest>,
) -> ApiResult<Json<Value>> {
    let location_ids = SystemRepository::new(state.db(), auth.scope())
        .set_locations(id, payload.location_ids)
        .await?;
    Ok(Json(json!({ "location_ids": location_ids })))
}
