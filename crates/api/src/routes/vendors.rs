//! Vendor routes, with contracts and hosting locations.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, put},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{not_found, parse_filter};
use crate::{ApiResult, AppState, extractors::ValidatedJson, middleware::AuthUser};
use dataguard_db::VendorRepository;
use dataguard_db::entities::{vendor_contracts, vendors};
use dataguard_db::repositories::{
    CreateContractInput, CreateVendorInput, UpdateContractInput, UpdateVendorInput,
    VendorDetails, VendorFilter,
};
use dataguard_shared::types::{PageRequest, PageResponse};

/// Creates the vendor routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/context/vendors", get(list_vendors).post(create_vendor))
        .route(
            "/context/vendors/{id}",
            get(get_vendor).patch(update_vendor).delete(delete_vendor),
        )
        .route(
            "/context/vendors/{id}/contracts",
            get(list_contracts).post(add_contract),
        )
        .route(
            "/context/vendors/{id}/contracts/{contract_id}",
            patch(update_contract).delete(delete_contract),
        )
        .route("/context/vendors/{id}/locations", put(set_locations))
}

/// Query parameters for listing vendors.
#[derive(Debug, Deserialize)]
pub struct ListVendorsQuery {
    /// Name substring.
    pub search: Option<String>,
    /// Only this role.
    pub vendor_role: Option<String>,
    /// Only this status.
    pub status: Option<String>,
}

/// Request body for creating a vendor.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVendorRequest {
    /// Vendor name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Website URL.
    pub website: Option<String>,
    /// Privacy contact.
    #[validate(email)]
    pub contact_email: Option<String>,
    /// GDPR role.
    pub vendor_role: String,
    /// Lifecycle status (default: active).
    pub status: Option<String>,
}

/// Request body for updating a vendor; `null` clears a field.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateVendorRequest {
    /// Vendor name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Description.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    /// Website URL.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub website: Option<Option<String>>,
    /// Privacy contact.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub contact_email: Option<Option<String>>,
    /// GDPR role.
    pub vendor_role: Option<String>,
    /// Lifecycle status.
    pub status: Option<String>,
}

/// Request body for adding a contract.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateContractRequest {
    /// Contract kind (dpa, scc, msa, nda, other).
    pub contract_type: String,
    /// Contract title.
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Effective date.
    pub start_date: NaiveDate,
    /// Expiry date.
    pub end_date: Option<NaiveDate>,
    /// Next review date.
    pub review_date: Option<NaiveDate>,
}

/// Request body for updating a contract.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContractRequest {
    /// Contract kind.
    pub contract_type: Option<String>,
    /// Contract title.
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    /// Effective date.
    pub start_date: Option<NaiveDate>,
    /// Expiry date.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub end_date: Option<Option<NaiveDate>>,
    /// Next review date.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub review_date: Option<Option<NaiveDate>>,
}

/// Request body replacing a record's locations.
#[derive(Debug, Deserialize, Validate)]
pub struct SetLocationsRequest {
    /// Complete set of location IDs; empty clears them.
    pub location_ids: Vec<Uuid>,
}

/// GET `/context/vendors` - List live vendors.
async fn list_vendors(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
    Query(query): Query<ListVendorsQuery>,
) -> ApiResult<Json<PageResponse<vendors::Model>>> {
    let filter = VendorFilter {
        search: query.search,
        vendor_role: parse_filter(query.vendor_role.as_deref())?,
        status: parse_filter(query.status.as_deref())?,
    };
    let vendors = VendorRepository::new(state.db(), auth.scope())
        .list(filter, page)
        .await?;
    Ok(Json(vendors))
}

/// POST `/context/vendors` - Create a vendor.
async fn create_vendor(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateVendorRequest>,
) -> ApiResult<(StatusCode, Json<vendors::Model>)> {
    let vendor = VendorRepository::new(state.db(), auth.scope())
        .create(CreateVendorInput {
            name: payload.name,
            description: payload.description,
            website: payload.website,
            contact_email: payload.contact_email,
            vendor_role: payload.vendor_role,
            status: payload.status.unwrap_or_else(|| "active".to_string()),
        })
        .await?;

    info!(user_id = %auth.user_id(), vendor_id = %vendor.id, "Vendor created via API");
    Ok((StatusCode::CREATED, Json(vendor)))
}

/// GET `/context/vendors/{id}` - Vendor with contracts and locations.
async fn get_vendor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<VendorDetails>> {
    VendorRepository::new(state.db(), auth.scope())
        .find_with_details(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Vendor", id))
}

/// PATCH `/context/vendors/{id}`.
async fn update_vendor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateVendorRequest>,
) -> ApiResult<Json<vendors::Model>> {
    let vendor = VendorRepository::new(state.db(), auth.scope())
        .update(
            id,
            UpdateVendorInput {
                name: payload.name,
                description: payload.description,
                website: payload.website,
                contact_email: payload.contact_email,
                vendor_role: payload.vendor_role,
                status: payload.status,
            },
        )
        .await?;
    Ok(Json(vendor))
}

/// DELETE `/context/vendors/{id}` - Soft-delete a vendor.
async fn delete_vendor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    VendorRepository::new(state.db(), auth.scope())
        .soft_delete(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/context/vendors/{id}/contracts`.
async fn list_contracts(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let repo = VendorRepository::new(state.db(), auth.scope());
    if repo.find_by_id(id).await?.is_none() {
        return Err(not_found("Vendor", id));
    }
    let contracts = repo.list_contracts(id).await?;
    Ok(Json(json!({ "data": contracts })))
}

/// POST `/context/vendors/{id}/contracts`.
async fn add_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateContractRequest>,
) -> ApiResult<(StatusCode, Json<vendor_contracts::Model>)> {
    let contract = VendorRepository::new(state.db(), auth.scope())
        .add_contract(
            id,
            CreateContractInput {
                contract_type: payload.contract_type,
                title: payload.title,
                start_date: payload.start_date,
                end_date: payload.end_date,
                review_date: payload.review_date,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(contract)))
}

/// PATCH `/context/vendors/{id}/contracts/{contract_id}`.
async fn update_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, contract_id)): Path<(Uuid, Uuid)>,
    ValidatedJson(payload): ValidatedJson<UpdateContractRequest>,
) -> ApiResult<Json<vendor_contracts::Model>> {
    let contract = VendorRepository::new(state.db(), auth.scope())
        .update_contract(
            id,
            contract_id,
            UpdateContractInput {
                contract_type: payload.contract_type,
                title: payload.title,
                start_date: payload.start_date,
                end_date: payload.end_date,
                review_date: payload.review_date,
            },
        )
        .await?;
    Ok(Json(contract))
}

/// DELETE `/context/vendors/{id}/contracts/{contract_id}`.
async fn delete_contract(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, contract_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    VendorRepository::new(state.db(), auth.scope())
        .delete_contract(id, contract_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/context/vendors/{id}/locations` - Replace the hosting locations.
async fn set_locations(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SetLocationsRequest>,
) -> ApiResult<Json<Value>> {
    let location_ids = VendorRepository::new(state.db(), auth.scope())
        .set_locations(id, payload.location_ids)
        .await?;
    Ok(Json(json!({ "location_ids": location_ids })))
}
