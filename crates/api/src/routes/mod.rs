//! API route definitions.

use std::str::FromStr;

use axum::{Router, middleware};
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::auth_middleware};
use dataguard_core::gdpr::UnknownValue;
use dataguard_shared::AppError;

pub mod data_categories;
pub mod data_flows;
pub mod dpia;
pub mod health;
pub mod jurisdictions;
pub mod locations;
pub mod processing_activities;
pub mod retention_policies;
pub mod systems;
pub mod vendors;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(jurisdictions::routes())
        .merge(locations::routes())
        .merge(vendors::routes())
        .merge(systems::routes())
        .merge(data_categories::routes())
        .merge(processing_activities::routes())
        .merge(data_flows::routes())
        .merge(retention_policies::routes())
        .merge(dpia::routes())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new().merge(health::routes()).merge(protected_routes)
}

/// Parses an optional enumerated query parameter.
pub(crate) fn parse_filter<T>(value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = UnknownValue>,
{
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::parse)
        .transpose()
        .map_err(|e: UnknownValue| ApiError(AppError::Validation(e.to_string())))
}

/// `404` for a record missing from the caller's workspace.
pub(crate) fn not_found(kind: &str, id: Uuid) -> ApiError {
    ApiError(AppError::NotFound(format!("{kind} not found: {id}")))
}
