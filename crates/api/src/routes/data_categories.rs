//! Data category routes.

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
use dataguard_core::category::{CategoryStatistics, CategoryUsage};
use dataguard_db::DataCategoryRepository;
use dataguard_db::entities::data_categories;
use dataguard_db::repositories::{
    CreateDataCategoryInput, DataCategoryFilter, UpdateDataCategoryInput,
};
use dataguard_shared::types::{PageRequest, PageResponse};

/// Creates the data category routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/context/data-categories",
            get(list_categories).post(create_category),
        )
        .route("/context/data-categories/stats", get(get_statistics))
        .route(
            "/context/data-categories/{id}",
            get(get_category)
                .patch(update_category)
                .delete(delete_category),
        )
        .route("/context/data-categories/{id}/usage", get(get_usage))
}

/// Query parameters for listing data categories.
#[derive(Debug, Deserialize)]
pub struct ListCategoriesQuery {
    /// Name substring.
    pub search: Option<String>,
    /// Only this classification.
    pub category_type: Option<String>,
    /// Only this sensitivity.
    pub sensitivity_level: Option<String>,
    /// Only children of this category.
    pub parent_id: Option<Uuid>,
    /// Only top-level categories; ignored when `parent_id` is given.
    #[serde(default)]
    pub roots_only: bool,
}

/// Request body for creating a data category.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    /// Category name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// GDPR classification.
    pub category_type: String,
    /// Sensitivity rating (default: medium).
    pub sensitivity_level: Option<String>,
    /// Parent category.
    pub parent_id: Option<Uuid>,
    /// Article 9 basis; required for special categories.
    pub special_category_basis: Option<String>,
}

/// Request body for updating a data category; `null` clears a field.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    /// Category name.
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    /// Description.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    /// GDPR classification.
    pub category_type: Option<String>,
    /// Sensitivity rating.
    pub sensitivity_level: Option<String>,
    /// Parent category; `null` moves the category to the top level.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub parent_id: Option<Option<Uuid>>,
    /// Article 9 basis.
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub special_category_basis: Option<Option<String>>,
}

/// GET `/context/data-categories` - List live categories.
async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
    Query(query): Query<ListCategoriesQuery>,
) -> ApiResult<Json<PageResponse<data_categories::Model>>> {
    let parent_id = match (query.parent_id, query.roots_only) {
        (Some(id), _) => Some(Some(id)),
        (None, true) => Some(None),
        (None, false) => None,
    };
    let filter = DataCategoryFilter {
        search: query.search,
        category_type: parse_filter(query.category_type.as_deref())?,
        sensitivity_level: parse_filter(query.sensitivity_level.as_deref())?,
        parent_id,
    };
    let categories = DataCategoryRepository::new(state.db(), auth.scope())
        .list(filter, page)
        .await?;
    Ok(Json(categories))
}

/// POST `/context/data-categories` - Create a category.
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<data_categories::Model>)> {
    let category = DataCategoryRepository::new(state.db(), auth.scope())
        .create(CreateDataCategoryInput {
            name: payload.name,
            description: payload.description,
            category_type: payload.category_type,
            sensitivity_level: payload
                .sensitivity_level
                .unwrap_or_else(|| "medium".to_string()),
            parent_id: payload.parent_id,
            special_category_basis: payload.special_category_basis,
        })
        .await?;

    info!(
        user_id = %auth.user_id(),
        category_id = %category.id,
        category_type = %category.category_type,
        "Data category created via API"
    );
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET `/context/data-categories/stats` - Counts by classification.
async fn get_statistics(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CategoryStatistics>> {
    let statistics = DataCategoryRepository::new(state.db(), auth.scope())
        .statistics()
        .await?;
    Ok(Json(statistics))
}

/// GET `/context/data-categories/{id}`.
async fn get_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<data_categories::Model>> {
    DataCategoryRepository::new(state.db(), auth.scope())
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Data category", id))
}

/// PATCH `/context/data-categories/{id}` - Update, including a checked parent move.
async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> ApiResult<Json<data_categories::Model>> {
    let category = DataCategoryRepository::new(state.db(), auth.scope())
        .update(
            id,
            UpdateDataCategoryInput {
                name: payload.name,
                description: payload.description,
                category_type: payload.category_type,
                sensitivity_level: payload.sensitivity_level,
                parent_id: payload.parent_id,
                special_category_basis: payload.special_category_basis,
            },
        )
        .await?;
    Ok(Json(category))
}

/// DELETE `/context/data-categories/{id}`.
///
/// `404` when the category is missing, `409` while activities, flow edges
/// or child categories still use it, `204` once soft-deleted.
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    DataCategoryRepository::new(state.db(), auth.scope())
        .soft_delete(id)
        .await?;

    info!(user_id = %auth.user_id(), category_id = %id, "Data category deleted via API");
    Ok(StatusCode::NO_CONTENT)
}

/// GET `/context/data-categories/{id}/usage` - Reference counts.
async fn get_usage(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<CategoryUsage>> {
    let repo = DataCategoryRepository::new(state.db(), auth.scope());
    if repo.find_by_id(id).await?.is_none() {
        return Err(not_found("Data category", id));
    }
    Ok(Json(repo.usage(id).await?))
}
