//! Physical location routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::not_found;
use crate::{ApiResult, AppState, extractors::ValidatedJson, middleware::AuthUser};
use dataguard_db::LocationRepository;
use dataguard_db::entities::physical_locations;
use dataguard_db::repositories::{CreateLocationInput, LocationFilter, UpdateLocationInput};
use dataguard_shared::types::{PageRequest, PageResponse};

/// Creates the location routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/context/locations", get(list_locations).post(create_location))
        .route(
            "/context/locations/{id}",
            get(get_location).patch(update_location).delete(delete_location),
        )
}

/// Query parameters for listing locations.
#[derive(Debug, Deserialize)]
pub struct ListLocationsQuery {
    /// Name substring.
    pub search: Option<String>,
    /// Only locations in this jurisdiction.
    pub jurisdiction_id: Option<Uuid>,
}

/// Request body for creating a location.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLocationRequest {
    /// Location name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Jurisdiction the location is in.
    pub jurisdiction_id: Uuid,
}

/// Request body for updating a location; `null` clears a field.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLocationRequest {
    /// Location name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Description.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    /// Street address.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub address: Option<Option<String>>,
    /// City.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub city: Option<Option<String>>,
    /// Jurisdiction the location is in.
    pub jurisdiction_id: Option<Uuid>,
}

/// GET `/context/locations` - List live locations.
async fn list_locations(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
    Query(query): Query<ListLocationsQuery>,
) -> ApiResult<Json<PageResponse<physical_locations::Model>>> {
    let locations = LocationRepository::new(state.db(), auth.scope())
        .list(
            LocationFilter {
                search: query.search,
                jurisdiction_id: query.jurisdiction_id,
            },
            page,
        )
        .await?;
    Ok(Json(locations))
}

/// POST `/context/locations` - Create a location.
async fn create_location(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateLocationRequest>,
) -> ApiResult<(StatusCode, Json<physical_locations::Model>)> {
    let location = LocationRepository::new(state.db(), auth.scope())
        .create(CreateLocationInput {
            name: payload.name,
            description: payload.description,
            address: payload.address,
            city: payload.city,
            jurisdiction_id: payload.jurisdiction_id,
        })
        .await?;

    info!(user_id = %auth.user_id(), location_id = %location.id, "Location created via API");
    Ok((StatusCode::CREATED, Json(location)))
}

/// GET `/context/locations/{id}`.
async fn get_location(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<physical_locations::Model>> {
    LocationRepository::new(state.db(), auth.scope())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Location", id))
}

/// PATCH `/context/locations/{id}`.
async fn update_location(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateLocationRequest>,
) -> ApiResult<Json<physical_locations::Model>> {
    let location = LocationRepository::new(state.db(), auth.scope())
        .update(
            id,
            UpdateLocationInput {
                name: payload.name,
                description: payload.description,
                address: payload.address,
                city: payload.city,
                jurisdiction_id: payload.jurisdiction_id,
            },
        )
        .await?;
    Ok(Json(location))
}

/// DELETE `/context/locations/{id}` - Soft-delete a location.
async fn delete_location(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    LocationRepository::new(state.db(), auth.scope())
        .soft_delete(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
