//! DPIA routes: the questionnaire template and the assessment wizard.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{not_found, parse_filter};
use crate::{ApiResult, AppState, extractors::ValidatedJson, middleware::AuthUser};
use dataguard_core::dpia::DpiaTemplate;
use dataguard_db::DpiaRepository;
use dataguard_db::repositories::{CreateDpiaInput, DpiaFilter, DpiaRepoError, DpiaView};
use dataguard_shared::types::{PageRequest, PageResponse};

/// Creates the DPIA routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dpia/template", get(get_template))
        .route(
            "/dpia/assessments",
            get(list_assessments).post(create_assessment),
        )
        .route(
            "/dpia/assessments/{id}",
            get(get_assessment).delete(delete_assessment),
        )
        .route(
            "/dpia/assessments/{id}/sections/{section_id}",
            put(save_section),
        )
        .route("/dpia/assessments/{id}/navigate", post(navigate))
}

/// Query parameters for listing assessments.
#[derive(Debug, Deserialize)]
pub struct ListAssessmentsQuery {
    /// Only this status.
    pub status: Option<String>,
    /// Only assessments of this activity.
    pub processing_activity_id: Option<Uuid>,
}

/// Request body for starting an assessment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssessmentRequest {
    /// Assessment title.
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    /// Processing activity being assessed.
    pub processing_activity_id: Option<Uuid>,
}

/// Request body for moving the wizard.
#[derive(Debug, Deserialize, Validate)]
pub struct NavigateRequest {
    /// Target section.
    #[validate(length(min = 1))]
    pub section_id: String,
}

/// GET `/dpia/template` - The questionnaire the wizard walks through.
async fn get_template() -> ApiResult<Json<&'static DpiaTemplate>> {
    let template = DpiaTemplate::embedded().map_err(DpiaRepoError::from)?;
    Ok(Json(template))
}

/// GET `/dpia/assessments` - List assessments with their progress.
async fn list_assessments(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(page): Query<PageRequest>,
    Query(query): Query<ListAssessmentsQuery>,
) -> ApiResult<Json<PageResponse<DpiaView>>> {
    let filter = DpiaFilter {
        status: parse_filter(query.status.as_deref())?,
        processing_activity_id: query.processing_activity_id,
    };
    let assessments = DpiaRepository::new(state.db(), auth.scope())
        .list(filter, page)
        .await?;

    let data = assessments
        .data
        .into_iter()
        .map(DpiaView::from_model)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(PageResponse {
        data,
        meta: assessments.meta,
    }))
}

/// POST `/dpia/assessments` - Start an assessment at the first section.
async fn create_assessment(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateAssessmentRequest>,
) -> ApiResult<(StatusCode, Json<DpiaView>)> {
    let assessment = DpiaRepository::new(state.db(), auth.scope())
        .create(CreateDpiaInput {
            title: payload.title,
            processing_activity_id: payload.processing_activity_id,
        })
        .await?;

    info!(user_id = %auth.user_id(), dpia_id = %assessment.id, "DPIA started via API");
    Ok((StatusCode::CREATED, Json(DpiaView::from_model(assessment)?)))
}

/// GET `/dpia/assessments/{id}`.
async fn get_assessment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DpiaView>> {
    let assessment = DpiaRepository::new(state.db(), auth.scope())
        .find_by_id(id)
        .await?
        .ok_or_else(|| not_found("DPIA assessment", id))?;
    Ok(Json(DpiaView::from_model(assessment)?))
}

/// DELETE `/dpia/assessments/{id}`.
async fn delete_assessment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    DpiaRepository::new(state.db(), auth.scope())
        .soft_delete(id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT `/dpia/assessments/{id}/sections/{section_id}` - Submit answers.
///
/// Invalid answers return 400 and leave the assessment unchanged.
async fn save_section(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, section_id)): Path<(Uuid, String)>,
    Json(answers): Json<Value>,
) -> ApiResult<Json<DpiaView>> {
    let view = DpiaRepository::new(state.db(), auth.scope())
        .save_section(id, &section_id, &answers)
        .await?;

    info!(
        dpia_id = %id,
        section = %section_id,
        progress = view.progress_percent,
        "DPIA section saved via API"
    );
    Ok(Json(view))
}

/// POST `/dpia/assessments/{id}/navigate` - Move to an unlocked section.
async fn navigate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<NavigateRequest>,
) -> ApiResult<Json<DpiaView>> {
    let view = DpiaRepository::new(state.db(), auth.scope())
        .go_to_section(id, &payload.section_id)
        .await?;
    Ok(Json(view))
}
