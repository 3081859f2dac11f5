//! Jurisdiction reference routes (global, read-only).

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use super::not_found;
use crate::{ApiResult, AppState, middleware::AuthUser};
use dataguard_db::JurisdictionRepository;
use dataguard_db::entities::jurisdictions;
use dataguard_db::repositories::JurisdictionFilter;

/// Creates the jurisdiction routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/context/jurisdictions", get(list_jurisdictions))
        .route("/context/jurisdictions/{id}", get(get_jurisdiction))
}

/// Query parameters for listing jurisdictions.
#[derive(Debug, Deserialize)]
pub struct ListJurisdictionsQuery {
    /// Code or name substring.
    pub search: Option<String>,
    /// Only EU/EEA members (or only non-members).
    pub is_eu_eea: Option<bool>,
    /// Only jurisdictions with (or without) an adequacy decision.
    pub gdpr_adequacy: Option<bool>,
}

/// GET `/context/jurisdictions` - All jurisdictions, not paged.
async fn list_jurisdictions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListJurisdictionsQuery>,
) -> ApiResult<Json<Value>> {
    let jurisdictions = JurisdictionRepository::new(state.db())
        .list(JurisdictionFilter {
            search: query.search,
            is_eu_eea: query.is_eu_eea,
            gdpr_adequacy: query.gdpr_adequacy,
        })
        .await?;
    Ok(Json(json!({ "data": jurisdictions })))
}

/// GET `/context/jurisdictions/{id}`.
async fn get_jurisdiction(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<jurisdictions::Model>> {
    JurisdictionRepository::new(state.db())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Jurisdiction", id))
}
