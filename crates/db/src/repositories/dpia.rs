//! DPIA assessment repository backed by the template-driven wizard.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::scope::{SoftDeletable, fetch_page};
use crate::entities::{dpia_assessments, processing_activities};
use dataguard_core::dpia::{Answers, DpiaError, DpiaTemplate, DpiaWizard};
use dataguard_core::gdpr::DpiaStatus;
use dataguard_core::validation::{FieldError, MAX_NAME_LEN, require_text};
use dataguard_shared::types::{PageRequest, PageResponse};
use dataguard_shared::{AppError, TenantScope};

/// Error types for DPIA operations.
#[derive(Debug, thiserror::Error)]
pub enum DpiaRepoError {
    /// Wizard or answer validation failed.
    #[error(transparent)]
    Wizard(#[from] DpiaError),

    /// Title failed validation.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Assessment not found.
    #[error("DPIA assessment not found: {0}")]
    NotFound(Uuid),

    /// Linked processing activity is not live in the workspace.
    #[error("Processing activity not found: {0}")]
    ActivityNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DpiaRepoError> for AppError {
    fn from(err: DpiaRepoError) -> Self {
        match err {
            DpiaRepoError::Wizard(DpiaError::InvalidAnswers { section, errors }) => {
                let details = errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ");
                Self::Validation(format!("Section '{section}': {details}"))
            }
            DpiaRepoError::Wizard(e @ DpiaError::AnswersNotObject(_)) => {
                Self::Validation(e.to_string())
            }
            DpiaRepoError::Wizard(e @ DpiaError::UnknownSection(_)) => Self::NotFound(e.to_string()),
            DpiaRepoError::Wizard(e @ DpiaError::SectionLocked(_)) => {
                Self::BusinessRule(e.to_string())
            }
            DpiaRepoError::Wizard(e @ DpiaError::Template(_)) => Self::Internal(e.to_string()),
            DpiaRepoError::Field(e) => Self::Validation(e.to_string()),
            e @ DpiaRepoError::ActivityNotFound(_) => Self::Validation(e.to_string()),
            e @ DpiaRepoError::NotFound(_) => Self::NotFound(e.to_string()),
            DpiaRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for starting an assessment.
#[derive(Debug, Clone)]
pub struct CreateDpiaInput {
    /// Assessment title.
    pub title: String,
    /// Processing activity being assessed.
    pub processing_activity_id: Option<Uuid>,
}

/// Filter options for listing assessments.
#[derive(Debug, Clone, Default)]
pub struct DpiaFilter {
    /// Only this status.
    pub status: Option<DpiaStatus>,
    /// Only assessments of this activity.
    pub processing_activity_id: Option<Uuid>,
}

/// An assessment with its wizard progress.
#[derive(Debug, Clone, Serialize)]
pub struct DpiaView {
    /// The assessment row.
    #[serde(flatten)]
    pub assessment: dpia_assessments::Model,
    /// Completed share of sections, 0 to 100.
    pub progress_percent: u8,
}

impl DpiaView {
    /// Computes progress from the stored wizard state.
    ///
    /// # Errors
    ///
    /// Returns `Wizard(Template)` if the embedded template is invalid.
    pub fn from_model(assessment: dpia_assessments::Model) -> Result<Self, DpiaRepoError> {
        let progress_percent = restore(DpiaTemplate::embedded()?, &assessment).progress_percent();
        Ok(Self {
            assessment,
            progress_percent,
        })
    }
}

/// DPIA assessment repository.
#[derive(Debug, Clone)]
pub struct DpiaRepository {
    db: DatabaseConnection,
    scope: TenantScope,
}

impl DpiaRepository {
    /// Creates a new DPIA repository for a workspace.
    #[must_use]
    pub const fn new(db: DatabaseConnection, scope: TenantScope) -> Self {
        Self { db, scope }
    }

    /// Starts an assessment at the first template section.
    ///
    /// # Errors
    ///
    /// Returns an error for a blank title or an unknown activity.
    pub async fn create(
        &self,
        input: CreateDpiaInput,
    ) -> Result<dpia_assessments::Model, DpiaRepoError> {
        let title = require_text("title", &input.title, MAX_NAME_LEN)?;
        if let Some(activity_id) = input.processing_activity_id {
            let found = processing_activities::Entity::live(&self.scope)
                .filter(processing_activities::Column::Id.eq(activity_id))
                .count(&self.db)
                .await?;
            if found == 0 {
                return Err(DpiaRepoError::ActivityNotFound(activity_id));
            }
        }

        let wizard = DpiaWizard::new(DpiaTemplate::embedded()?);
        let now = chrono::Utc::now();
        let assessment = dpia_assessments::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(self.scope.tenant()),
            workspace_id: Set(self.scope.workspace()),
            title: Set(title),
            processing_activity_id: Set(input.processing_activity_id),
            status: Set(wizard.status().as_str().to_string()),
            current_section: Set(wizard.current_section().to_string()),
            completed_sections: Set(Value::from(wizard.completed_sections())),
            section_data: Set(Value::Object(wizard.section_data().clone())),
            completed_at: Set(None),
            created_at: Set(now),
            created_by: Set(self.scope.user()),
            updated_at: Set(now),
            updated_by: Set(self.scope.user()),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        info!(dpia_id = %assessment.id, title = %assessment.title, "DPIA started");
        Ok(assessment)
    }

    /// Lists live assessments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: DpiaFilter,
        page: PageRequest,
    ) -> Result<PageResponse<dpia_assessments::Model>, DpiaRepoError> {
        let mut query = dpia_assessments::Entity::live(&self.scope)
            .order_by_desc(dpia_assessments::Column::CreatedAt);

        if let Some(status) = filter.status {
            query = query.filter(dpia_assessments::Column::Status.eq(status.as_str()));
        }
        if let Some(activity_id) = filter.processing_activity_id {
            query = query.filter(dpia_assessments::Column::ProcessingActivityId.eq(activity_id));
        }

        Ok(fetch_page(query, &self.db, page).await?)
    }

    /// Finds a live assessment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<dpia_assessments::Model>, DpiaRepoError> {
        Ok(dpia_assessments::Entity::live(&self.scope)
            .filter(dpia_assessments::Column::Id.eq(id))
            .one(&self.db)
            .await?)
    }

    /// Validates and saves one section's answers, then advances the wizard.
    ///
    /// The assessment becomes `completed` when every section is done.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or a wizard error when the section is unknown,
    /// locked or its answers are invalid. Nothing is saved on error.
    pub async fn save_section(
        &self,
        id: Uuid,
        section_id: &str,
        answers: &Value,
    ) -> Result<DpiaView, DpiaRepoError> {
        let assessment = self.find_by_id(id).await?.ok_or(DpiaRepoError::NotFound(id))?;
        let mut wizard = restore(DpiaTemplate::embedded()?, &assessment);
        wizard.submit_section(section_id, answers)?;

        let now = chrono::Utc::now();
        let completed_at = match (wizard.is_complete(), assessment.completed_at) {
            (true, Some(at)) => Some(at),
            (true, None) => Some(now),
            (false, _) => None,
        };
        let progress_percent = wizard.progress_percent();

        let mut active: dpia_assessments::ActiveModel = assessment.into();
        active.status = Set(wizard.status().as_str().to_string());
        active.current_section = Set(wizard.current_section().to_string());
        active.completed_sections = Set(Value::from(wizard.completed_sections()));
        active.section_data = Set(Value::Object(wizard.section_data().clone()));
        active.completed_at = Set(completed_at);
        active.updated_at = Set(now);
        active.updated_by = Set(self.scope.user());
        let assessment = active.update(&self.db).await?;

        info!(
            dpia_id = %id,
            section = %section_id,
            status = %assessment.status,
            progress_percent,
            "DPIA section saved"
        );
        Ok(DpiaView {
            assessment,
            progress_percent,
        })
    }

    /// Moves the wizard to a reachable section.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, or a wizard error for an unknown or locked section.
    pub async fn go_to_section(&self, id: Uuid, section_id: &str) -> Result<DpiaView, DpiaRepoError> {
        let assessment = self.find_by_id(id).await?.ok_or(DpiaRepoError::NotFound(id))?;
        let mut wizard = restore(DpiaTemplate::embedded()?, &assessment);
        wizard.go_to(section_id)?;
        let progress_percent = wizard.progress_percent();

        let mut active: dpia_assessments::ActiveModel = assessment.into();
        active.current_section = Set(wizard.current_section().to_string());
        active.updated_at = Set(chrono::Utc::now());
        active.updated_by = Set(self.scope.user());
        let assessment = active.update(&self.db).await?;

        Ok(DpiaView {
            assessment,
            progress_percent,
        })
    }

    /// Soft-deletes an assessment.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no live assessment with this ID.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), DpiaRepoError> {
        let assessment = self.find_by_id(id).await?.ok_or(DpiaRepoError::NotFound(id))?;

        let now = chrono::Utc::now();
        let mut active: dpia_assessments::ActiveModel = assessment.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.updated_by = Set(self.scope.user());
        active.update(&self.db).await?;

        info!(dpia_id = %id, "DPIA deleted");
        Ok(())
    }
}

/// Rebuilds the wizard from a stored row. Malformed JSON columns read as empty.
fn restore<'t>(template: &'t DpiaTemplate, assessment: &dpia_assessments::Model) -> DpiaWizard<'t> {
    let completed: Vec<String> = assessment
        .completed_sections
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    let section_data: Answers = match &assessment.section_data {
        Value::Object(map) => map.clone(),
        _ => Answers::new(),
    };
    DpiaWizard::restore(template, &assessment.current_section, &completed, section_data)
}
