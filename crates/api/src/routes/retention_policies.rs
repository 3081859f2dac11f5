//! Retention policy routes.

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

use super::{not_found, parse_filter};
use crate::{ApiResult, AppState, extractors::ValidatedJson, middleware::AuthUser};
use dataguard_db::RetentionPolicyRepository;
use dataguard_db::entities::retention_policies;
use dataguard_db::repositories::{
    CreateRetentionPolicyInput, RetentionPolicyFilter, UpdateRetentionPolicyInput,
};
use dataguard_shared::types::{PageRequest, PageResponse};

/// Creates the retention policy routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/context/retention-policies",
            get(list_policies).post(create_policy),
        )
        .route(
            "/context/retention-policies/{id}",
            get(get_policy).patch(update_policy).delete(delete_policy),
        )
}

/// Query parameters for listing policies.
#[derive(Debug, Deserialize)]
pub struct ListPoliciesQuery {
    /// Substring of the policy name.
    pub search: Option<String>,
    /// Only this deletion method.
    pub deletion_method: Option<String>,
}

/// Request body for creating a policy. A period or criteria is required.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePolicyRequest {
    /// Policy name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Retention period in days.
    pub retention_period_days: Option<i32>,
    /// Event-based retention criteria.
    pub retention_criteria: Option<String>,
    /// What happens at the end of retention (default: delete).
    pub deletion_method: Option<String>,
    /// Statute or regulation behind the period.
    pub legal_reference: Option<String>,
}

/// Request body for updating a policy; `null` clears a field.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePolicyRequest {
    /// Policy name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Description.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    /// Retention period in days.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub retention_period_days: Option<Option<i32>>,
    /// Event-based retention criteria.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub retention_criteria: Option<Option<String>>,
    /// Deletion method.
    pub deletion_method: Option<String>,
    /// Legal reference.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub legal_reference: Option<Option<String>>,
}

/// GET `/context/retention-policies`.
async fn list_policies(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
    Query(query): Query<ListPoliciesQuery>,
) -> ApiResult<Json<PageResponse<retention_policies::Model>>> {
    let filter = RetentionPolicyFilter {
        search: query.search,
        deletion_method: parse_filter(query.deletion_method.as_deref())?,
    };
    let policies = RetentionPolicyRepository::new(state.db(), auth.scope())
        .list(filter, page)
        .await?;
    Ok(Json(policies))
}

/// POST `/context/retention-policies`.
async fn create_policy(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreatePolicyRequest>,
) -> ApiResult<(StatusCode, Json<retention_policies::Model>)> {
    let policy = RetentionPolicyRepository::new(state.db(), auth.scope())
        .create(CreateRetentionPolicyInput {
            name: payload.name,
            description: payload.description,
            retention_period_days: payload.retention_period_days,
            retention_criteria: payload.retention_criteria,
            deletion_method: payload
                .deletion_method
                .unwrap_or_else(|| "delete".to_string()),
            legal_reference: payload.legal_reference,
        })
        .await?;

    info!(user_id = %auth.user_id(), policy_id = %policy.id, "Retention policy created via API");
    Ok((StatusCode::CREATED, Json(policy)))
}

/// GET `/context/retention-policies/{id}`.
async fn get_policy(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<retention_policies::Model>> {
    RetentionPolicyRepository::new(state.db(), auth.scope())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Retention policy", id))
}

/// PATCH `/context/retention-policies/{id}`.
async fn update_policy(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdatePolicyRequest>,
) -> ApiResult<Json<retention_policies::Model>> {
    let policy = RetentionPolicyRepository::new(state.db(), auth.scope())
        .update(
            id,
            UpdateRetentionPolicyInput {
                name: payload.name,
                description: payload.description,
                retention_period_days: payload.retention_period_days,
                retention_criteria: payload.retention_criteria,
                deletion_method: payload.deletion_method,
                legal_reference: payload.legal_reference,
            },
        )
        .await?;
    Ok(Json(policy))
}

/// DELETE `/context/retention-policies/{id}`.
async fn delete_policy(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    RetentionPolicyRepository::new(state.db(), auth.scope())
        .soft_delete(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
