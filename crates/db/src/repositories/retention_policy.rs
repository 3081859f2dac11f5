//! Retention policy repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use super::scope::{SoftDeletable, fetch_page};
use crate::entities::retention_policies;
use dataguard_core::context::{ContextError, RetentionDraft, validate_retention};
use dataguard_core::gdpr::DeletionMethod;
use dataguard_shared::types::{PageRequest, PageResponse};
use dataguard_shared::{AppError, TenantScope};

/// Error types for retention policy operations.
#[derive(Debug, thiserror::Error)]
pub enum RetentionPolicyError {
    /// Field validation failed.
    #[error(transparent)]
    Invalid(#[from] ContextError),

    /// Another live policy in the workspace has this name.
    #[error("Retention policy '{0}' already exists")]
    DuplicateName(String),

    /// Policy not found.
    #[error("Retention policy not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<RetentionPolicyError> for AppError {
    fn from(err: RetentionPolicyError) -> Self {
        match err {
            RetentionPolicyError::Invalid(e) => Self::Validation(e.to_string()),
            e @ RetentionPolicyError::DuplicateName(_) => Self::Conflict(e.to_string()),
            e @ RetentionPolicyError::NotFound(_) => Self::NotFound(e.to_string()),
            RetentionPolicyError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a retention policy.
#[derive(Debug, Clone)]
pub struct CreateRetentionPolicyInput {
    /// Policy name (unique within the workspace).
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Days to keep data.
    pub retention_period_days: Option<i32>,
    /// Event-based criteria.
    pub retention_criteria: Option<String>,
    /// What happens at the end of the period.
    pub deletion_method: String,
    /// Statute or regulation requiring the period.
    pub legal_reference: Option<String>,
}

/// Input for updating a retention policy.
#[derive(Debug, Clone, Default)]
pub struct UpdateRetentionPolicyInput {
    /// Policy name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<Option<String>>,
    /// Days to keep data.
    pub retention_period_days: Option<Option<i32>>,
    /// Event-based criteria.
    pub retention_criteria: Option<Option<String>>,
    /// Deletion method.
    pub deletion_method: Option<String>,
    /// Legal reference.
    pub legal_reference: Option<Option<String>>,
}

/// Filter options for listing policies.
#[derive(Debug, Clone, Default)]
pub struct RetentionPolicyFilter {
    /// Name substring.
    pub search: Option<String>,
    /// Only this deletion method.
    pub deletion_method: Option<DeletionMethod>,
}

/// Retention policy repository.
#[derive(Debug, Clone)]
pub struct RetentionPolicyRepository {
    db: DatabaseConnection,
    scope: TenantScope,
}

impl RetentionPolicyRepository {
    /// Creates a new retention policy repository for a workspace.
    #[must_use]
    pub const fn new(db: DatabaseConnection, scope: TenantScope) -> Self {
        Self { db, scope }
    }

    /// Creates a retention policy.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the name is taken.
    pub async fn create(
        &self,
        input: CreateRetentionPolicyInput,
    ) -> Result<retention_policies::Model, RetentionPolicyError> {
        let validated = validate_retention(&RetentionDraft {
            name: &input.name,
            description: input.description.as_deref(),
            retention_period_days: input.retention_period_days,
            retention_criteria: input.retention_criteria.as_deref(),
            deletion_method: &input.deletion_method,
            legal_reference: input.legal_reference.as_deref(),
        })?;
        self.ensure_unique_name(&validated.name, None).await?;

        let now = chrono::Utc::now();
        let policy = retention_policies::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(self.scope.tenant()),
            workspace_id: Set(self.scope.workspace()),
            name: Set(validated.name),
            description: Set(validated.description),
            retention_period_days: Set(validated.retention_period_days),
            retention_criteria: Set(validated.retention_criteria),
            deletion_method: Set(validated.deletion_method.as_str().to_string()),
            legal_reference: Set(validated.legal_reference),
            created_at: Set(now),
            created_by: Set(self.scope.user()),
            updated_at: Set(now),
            updated_by: Set(self.scope.user()),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        info!(policy_id = %policy.id, name = %policy.name, "Retention policy created");
        Ok(policy)
    }

    /// Lists live policies, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: RetentionPolicyFilter,
        page: PageRequest,
    ) -> Result<PageResponse<retention_policies::Model>, RetentionPolicyError> {
        let mut query = retention_policies::Entity::live(&self.scope)
            .order_by_asc(retention_policies::Column::Name);

        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(retention_policies::Column::Name.contains(search));
        }
        if let Some(method) = filter.deletion_method {
            query = query.filter(retention_policies::Column::DeletionMethod.eq(method.as_str()));
        }

        Ok(fetch_page(query, &self.db, page).await?)
    }

    /// Finds a live policy by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<retention_policies::Model>, RetentionPolicyError> {
        Ok(retention_policies::Entity::live(&self.scope)
            .filter(retention_policies::Column::Id.eq(id))
            .one(&self.db)
            .await?)
    }

    /// Updates a policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy is missing, the merged fields fail
    /// validation or the new name is taken.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateRetentionPolicyInput,
    ) -> Result<retention_policies::Model, RetentionPolicyError> {
        let policy = self
            .find_by_id(id)
            .await?
            .ok_or(RetentionPolicyError::NotFound(id))?;

        let name = input.name.unwrap_or_else(|| policy.name.clone());
        let description = input.description.unwrap_or_else(|| policy.description.clone());
        let period = input
            .retention_period_days
            .unwrap_or(policy.retention_period_days);
        let criteria = input
            .retention_criteria
            .unwrap_or_else(|| policy.retention_criteria.clone());
        let deletion_method = input
            .deletion_method
            .unwrap_or_else(|| policy.deletion_method.clone());
        let legal_reference = input
            .legal_reference
            .unwrap_or_else(|| policy.legal_reference.clone());

        let validated = validate_retention(&RetentionDraft {
            name: &name,
            description: description.as_deref(),
            retention_period_days: period,
            retention_criteria: criteria.as_deref(),
            deletion_method: &deletion_method,
            legal_reference: legal_reference.as_deref(),
        })?;
        if validated.name != policy.name {
            self.ensure_unique_name(&validated.name, Some(id)).await?;
        }

        let mut active: retention_policies::ActiveModel = policy.into();
        active.name = Set(validated.name);
        active.description = Set(validated.description);
        active.retention_period_days = Set(validated.retention_period_days);
        active.retention_criteria = Set(validated.retention_criteria);
        active.deletion_method = Set(validated.deletion_method.as_str().to_string());
        active.legal_reference = Set(validated.legal_reference);
        active.updated_at = Set(chrono::Utc::now());
        active.updated_by = Set(self.scope.user());

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes a policy.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no live policy with this ID.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), RetentionPolicyError> {
        let policy = self
            .find_by_id(id)
            .await?
            .ok_or(RetentionPolicyError::NotFound(id))?;

        let now = chrono::Utc::now();
        let mut active: retention_policies::ActiveModel = policy.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.updated_by = Set(self.scope.user());
        active.update(&self.db).await?;

        info!(policy_id = %id, "Retention policy deleted");
        Ok(())
    }

    async fn ensure_unique_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), RetentionPolicyError> {
        let mut query = retention_policies::Entity::live(&self.scope)
            .filter(retention_policies::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(retention_policies::Column::Id.ne(id));
        }
        if query.count(&self.db).await? > 0 {
            return Err(RetentionPolicyError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}
