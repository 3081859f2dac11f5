//! Processing activity routes (Article 30 records), links and compliance.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{not_found, parse_filter};
use crate::{ApiError, ApiResult, AppState, extractors::ValidatedJson, middleware::AuthUser};
use dataguard_core::activity::ComplianceSummary;
use dataguard_db::ProcessingActivityRepository;
use dataguard_db::entities::processing_activities;
use dataguard_db::repositories::{
    ActivityDetails, ActivityFilter, CreateActivityInput, LinkKind, NewActivityLink,
    UpdateActivityInput,
};
use dataguard_shared::AppError;
use dataguard_shared::types::{PageRequest, PageResponse};

const BASE: &str = "/context/processing-activities";

/// Creates the processing activity routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(BASE, get(list_activities).post(create_activity))
        .route(&format!("{BASE}/compliance"), get(get_compliance))
        .route(
            &format!("{BASE}/{{id}}"),
            get(get_activity)
                .patch(update_activity)
                .delete(delete_activity),
        )
        .route(&format!("{BASE}/{{id}}/systems"), post(link_system))
        .route(
            &format!("{BASE}/{{id}}/systems/{{target_id}}"),
            delete(unlink_system),
        )
        .route(&format!("{BASE}/{{id}}/data-categories"), post(link_data_category))
        .route(
            &format!("{BASE}/{{id}}/data-categories/{{target_id}}"),
            delete(unlink_data_category),
        )
        .route(&format!("{BASE}/{{id}}/vendors"), post(link_vendor))
        .route(
            &format!("{BASE}/{{id}}/vendors/{{target_id}}"),
            delete(unlink_vendor),
        )
        .route(
            &format!("{BASE}/{{id}}/retention-policies"),
            post(link_retention_policy),
        )
        .route(
            &format!("{BASE}/{{id}}/retention-policies/{{target_id}}"),
            delete(unlink_retention_policy),
        )
        .route(&format!("{BASE}/{{id}}/data-flows"), post(link_data_flow))
        .route(
            &format!("{BASE}/{{id}}/data-flows/{{target_id}}"),
            delete(unlink_data_flow),
        )
}

/// Query parameters for listing activities.
#[derive(Debug, Deserialize)]
pub struct ListActivitiesQuery {
    /// Substring of the name or purpose.
    pub search: Option<String>,
    /// Only this status.
    pub status: Option<String>,
    /// Only this lawful basis.
    pub lawful_basis: Option<String>,
    /// Comma-separated activity IDs.
    pub ids: Option<String>,
}

/// Request body for creating an activity.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateActivityRequest {
    /// Activity name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Purpose of the processing.
    #[validate(length(min = 1))]
    pub purpose: String,
    /// Article 6 lawful basis.
    pub lawful_basis: String,
    /// Required for legitimate interests.
    pub legitimate_interest_assessment: Option<String>,
    /// Categories of data subjects.
    #[serde(default)]
    pub data_subject_types: Vec<String>,
    /// Lifecycle status (default: draft).
    pub status: Option<String>,
    /// A DPIA is required.
    #[serde(default)]
    pub requires_dpia: bool,
    /// The DPO must review the activity.
    #[serde(default)]
    pub dpo_review_required: bool,
    /// When the DPO reviewed it.
    pub dpo_reviewed_at: Option<DateTime<Utc>>,
    /// Last completed review.
    pub last_reviewed_at: Option<NaiveDate>,
    /// Next scheduled review.
    pub next_review_date: Option<NaiveDate>,
}

/// Request body for updating an activity; `null` clears a field.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateActivityRequest {
    /// Activity name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Description.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    /// Purpose of the processing.
    #[validate(length(min = 1))]
    pub purpose: Option<String>,
    /// Article 6 lawful basis.
    pub lawful_basis: Option<String>,
    /// Legitimate interest assessment.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub legitimate_interest_assessment: Option<Option<String>>,
    /// Categories of data subjects.
    pub data_subject_types: Option<Vec<String>>,
    /// Lifecycle status.
    pub status: Option<String>,
    /// A DPIA is required.
    pub requires_dpia: Option<bool>,
    /// The DPO must review the activity.
    pub dpo_review_required: Option<bool>,
    /// When the DPO reviewed it.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub dpo_reviewed_at: Option<Option<DateTime<Utc>>>,
    /// Last completed review.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub last_reviewed_at: Option<Option<NaiveDate>>,
    /// Next scheduled review.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub next_review_date: Option<Option<NaiveDate>>,
}

/// Request body for linking a system.
#[derive(Debug, Deserialize, Validate)]
pub struct LinkSystemRequest {
    /// System to link.
    pub system_id: Uuid,
    /// primary, supporting or backup (default: primary).
    pub role: Option<String>,
}

/// Request body for linking a data category.
#[derive(Debug, Deserialize, Validate)]
pub struct LinkDataCategoryRequest {
    /// Category to link.
    pub data_category_id: Uuid,
    /// Why the category is needed.
    pub justification: Option<String>,
}

/// Request body for linking a vendor.
#[derive(Debug, Deserialize, Validate)]
pub struct LinkVendorRequest {
    /// Vendor to link.
    pub vendor_id: Uuid,
    /// Vendor role for this activity (default: processor).
    pub role: Option<String>,
    /// A contract (DPA) is required.
    #[serde(default)]
    pub contract_required: bool,
}

/// Request body for linking a retention policy.
#[derive(Debug, Deserialize, Validate)]
pub struct LinkRetentionPolicyRequest {
    /// Policy to link.
    pub retention_policy_id: Uuid,
}

/// Request body for linking a data flow.
#[derive(Debug, Deserialize, Validate)]
pub struct LinkDataFlowRequest {
    /// Flow to link.
    pub data_flow_id: Uuid,
}

fn parse_ids(raw: Option<&str>) -> ApiResult<Option<Vec<Uuid>>> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<Uuid>()
                    .map_err(|_| ApiError(AppError::Validation(format!("Invalid activity id '{s}'"))))
            })
            .collect()
    })
    .transpose()
}

/// GET `/context/processing-activities` - List live activities.
async fn list_activities(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
    Query(query): Query<ListActivitiesQuery>,
) -> ApiResult<Json<PageResponse<processing_activities::Model>>> {
    let filter = ActivityFilter {
        search: query.search,
        status: parse_filter(query.status.as_deref())?,
        lawful_basis: parse_filter(query.lawful_basis.as_deref())?,
        ids: parse_ids(query.ids.as_deref())?,
    };
    let activities = ProcessingActivityRepository::new(state.db(), auth.scope())
        .list(filter, page)
        .await?;
    Ok(Json(activities))
}

/// POST `/context/processing-activities` - Create an activity.
async fn create_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateActivityRequest>,
) -> ApiResult<(StatusCode, Json<processing_activities::Model>)> {
    let activity = ProcessingActivityRepository::new(state.db(), auth.scope())
        .create(CreateActivityInput {
            name: payload.name,
            description: payload.description,
            purpose: payload.purpose,
            lawful_basis: payload.lawful_basis,
            legitimate_interest_assessment: payload.legitimate_interest_assessment,
            data_subject_types: payload.data_subject_types,
            status: payload.status.unwrap_or_else(|| "draft".to_string()),
            requires_dpia: payload.requires_dpia,
            dpo_review_required: payload.dpo_review_required,
            dpo_reviewed_at: payload.dpo_reviewed_at,
            last_reviewed_at: payload.last_reviewed_at,
            next_review_date: payload.next_review_date,
        })
        .await?;

    info!(
        user_id = %auth.user_id(),
        activity_id = %activity.id,
        lawful_basis = %activity.lawful_basis,
        "Processing activity created via API"
    );
    Ok((StatusCode::CREATED, Json(activity)))
}

/// GET `/context/processing-activities/compliance` - Score and findings.
async fn get_compliance(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<ComplianceSummary>> {
    let counts = ProcessingActivityRepository::new(state.db(), auth.scope())
        .compliance_counts(Utc::now().date_naive())
        .await?;
    Ok(Json(ComplianceSummary::compute(
        counts,
        &state.compliance_weights,
    )))
}

/// GET `/context/processing-activities/{id}` - Activity with every live link.
async fn get_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ActivityDetails>> {
    ProcessingActivityRepository::new(state.db(), auth.scope())
        .find_with_links(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Processing activity", id))
}

/// PATCH `/context/processing-activities/{id}`.
async fn update_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateActivityRequest>,
) -> ApiResult<Json<processing_activities::Model>> {
    let activity = ProcessingActivityRepository::new(state.db(), auth.scope())
        .update(
            id,
            UpdateActivityInput {
                name: payload.name,
                description: payload.description,
                purpose: payload.purpose,
                lawful_basis: payload.lawful_basis,
                legitimate_interest_assessment: payload.legitimate_interest_assessment,
                data_subject_types: payload.data_subject_types,
                status: payload.status,
                requires_dpia: payload.requires_dpia,
                dpo_review_required: payload.dpo_review_required,
                dpo_reviewed_at: payload.dpo_reviewed_at,
                last_reviewed_at: payload.last_reviewed_at,
                next_review_date: payload.next_review_date,
            },
        )
        .await?;
    Ok(Json(activity))
}

/// DELETE `/context/processing-activities/{id}` - Soft-delete an activity.
async fn delete_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ProcessingActivityRepository::new(state.db(), auth.scope())
        .soft_delete(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Links
// ============================================================================

async fn link(
    state: &AppState,
    auth: &AuthUser,
    id: Uuid,
    new_link: NewActivityLink,
) -> ApiResult<(StatusCode, Json<ActivityDetails>)> {
    let repo = ProcessingActivityRepository::new(state.db(), auth.scope());
    repo.link(id, new_link).await?;
    let details = repo
        .find_with_links(id)
        .await?
        .ok_or_else(|| not_found("Processing activity", id))?;
    Ok((StatusCode::CREATED, Json(details)))
}

async fn unlink(
    state: &AppState,
    auth: &AuthUser,
    (id, target_id): (Uuid, Uuid),
    kind: LinkKind,
) -> ApiResult<StatusCode> {
    ProcessingActivityRepository::new(state.db(), auth.scope())
        .unlink(id, kind, target_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/context/processing-activities/{id}/systems`.
async fn link_system(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<LinkSystemRequest>,
) -> ApiResult<(StatusCode, Json<ActivityDetails>)> {
    let new_link = NewActivityLink::System {
        system_id: payload.system_id,
        role: payload.role.unwrap_or_else(|| "primary".to_string()),
    };
    link(&state, &auth, id, new_link).await
}

/// DELETE `/context/processing-activities/{id}/systems/{target_id}`.
async fn unlink_system(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(ids): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    unlink(&state, &auth, ids, LinkKind::System).await
}

/// POST `/context/processing-activities/{id}/data-categories`.
async fn link_data_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<LinkDataCategoryRequest>,
) -> ApiResult<(StatusCode, Json<ActivityDetails>)> {
    let new_link = NewActivityLink::DataCategory {
        data_category_id: payload.data_category_id,
        justification: payload.justification,
    };
    link(&state, &auth, id, new_link).await
}

/// DELETE `/context/processing-activities/{id}/data-categories/{target_id}`.
async fn unlink_data_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(ids): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    unlink(&state, &auth, ids, LinkKind::DataCategory).await
}

/// POST `/context/processing-activities/{id}/vendors`.
async fn link_vendor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<LinkVendorRequest>,
) -> ApiResult<(StatusCode, Json<ActivityDetails>)> {
    let new_link = NewActivityLink::Vendor {
        vendor_id: payload.vendor_id,
        role: payload.role.unwrap_or_else(|| "processor".to_string()),
        contract_required: payload.contract_required,
    };
    link(&state, &auth, id, new_link).await
}

/// DELETE `/context/processing-activities/{id}/vendors/{target_id}`.
async fn unlink_vendor(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(ids): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    unlink(&state, &auth, ids, LinkKind::Vendor).await
}

/// POST `/context/processing-activities/{id}/retention-policies`.
async fn link_retention_policy(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<LinkRetentionPolicyRequest>,
) -> ApiResult<(StatusCode, Json<ActivityDetails>)> {
    let new_link = NewActivityLink::RetentionPolicy {
        retention_policy_id: payload.retention_policy_id,
    };
    link(&state, &auth, id, new_link).await
}

/// DELETE `/context/processing-activities/{id}/retention-policies/{target_id}`.
async fn unlink_retention_policy(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(ids): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    unlink(&state, &auth, ids, LinkKind::RetentionPolicy).await
}

/// POST `/context/processing-activities/{id}/data-flows`.
async fn link_data_flow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<LinkDataFlowRequest>,
) -> ApiResult<(StatusCode, Json<ActivityDetails>)> {
    let new_link = NewActivityLink::DataFlow {
        data_flow_id: payload.data_flow_id,
    };
    link(&state, &auth, id, new_link).await
}

/// DELETE `/context/processing-activities/{id}/data-flows/{target_id}`.
async fn unlink_data_flow(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(ids): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    unlink(&state, &auth, ids, LinkKind::DataFlow).await
}
