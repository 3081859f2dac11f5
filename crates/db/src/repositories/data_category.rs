//! Data category repository.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set,
};
use tracing::info;
use uuid::Uuid;

use super::scope::{Scoped, SoftDeletable, fetch_page};
use crate::entities::{
    activity_data_categories, data_categories, data_flow_edge_categories, data_flow_edges,
    data_flows, processing_activities,
};
use crate::reference::CategorySeed;
use dataguard_core::category::{
    CategoryDraft, CategoryError, CategoryStatistics, CategoryTree, CategoryUsage,
    DataCategoryService,
};
use dataguard_core::gdpr::{DataCategoryType, SensitivityLevel};
use dataguard_shared::types::{DataCategoryId, PageRequest, PageResponse};
use dataguard_shared::{AppError, TenantScope};

/// Error types for data category operations.
#[derive(Debug, thiserror::Error)]
pub enum DataCategoryError {
    /// A category rule was violated.
    #[error(transparent)]
    Rule(#[from] CategoryError),

    /// Another live category in the workspace has this name.
    #[error("Data category '{0}' already exists")]
    DuplicateName(String),

    /// Category not found.
    #[error("Data category not found: {0}")]
    NotFound(Uuid),

    /// Requested parent is not a live category of the workspace.
    #[error("Parent category not found: {0}")]
    ParentNotFound(Uuid),

    /// The category is still referenced.
    #[error(
        "Data category is in use by {} processing activities, {} data flow edges and {} child categories",
        .0.processing_activities,
        .0.data_flow_edges,
        .0.child_categories
    )]
    InUse(CategoryUsage),

    /// Stored category type is not a known value.
    #[error("Stored category type '{0}' is not recognised")]
    CorruptType(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<DataCategoryError> for AppError {
    fn from(err: DataCategoryError) -> Self {
        match err {
            DataCategoryError::Rule(e) => Self::Validation(e.to_string()),
            e @ DataCategoryError::ParentNotFound(_) => Self::Validation(e.to_string()),
            e @ (DataCategoryError::DuplicateName(_) | DataCategoryError::InUse(_)) => {
                Self::Conflict(e.to_string())
            }
            e @ DataCategoryError::NotFound(_) => Self::NotFound(e.to_string()),
            e @ DataCategoryError::CorruptType(_) => Self::Internal(e.to_string()),
            DataCategoryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a data category.
#[derive(Debug, Clone)]
pub struct CreateDataCategoryInput {
    /// Category name (unique within the workspace).
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// GDPR classification.
    pub category_type: String,
    /// Sensitivity rating.
    pub sensitivity_level: String,
    /// Parent category.
    pub parent_id: Option<Uuid>,
    /// Article 9 basis; required for special categories.
    pub special_category_basis: Option<String>,
}

/// Input for updating a data category.
///
/// Outer `None` keeps the stored value; `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateDataCategoryInput {
    /// Category name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<Option<String>>,
    /// GDPR classification.
    pub category_type: Option<String>,
    /// Sensitivity rating.
    pub sensitivity_level: Option<String>,
    /// Parent category.
    pub parent_id: Option<Option<Uuid>>,
    /// Article 9 basis.
    pub special_category_basis: Option<Option<String>>,
}

/// Filter options for listing data categories.
#[derive(Debug, Clone, Default)]
pub struct DataCategoryFilter {
    /// Name substring.
    pub search: Option<String>,
    /// Only this classification.
    pub category_type: Option<DataCategoryType>,
    /// Only this sensitivity.
    pub sensitivity_level: Option<SensitivityLevel>,
    /// `Some(None)` lists root categories, `Some(Some(id))` children of `id`.
    pub parent_id: Option<Option<Uuid>>,
}

/// Data category repository.
#[derive(Debug, Clone)]
pub struct DataCategoryRepository {
    db: DatabaseConnection,
    scope: TenantScope,
}

impl DataCategoryRepository {
    /// Creates a new data category repository for a workspace.
    #[must_use]
    pub const fn new(db: DatabaseConnection, scope: TenantScope) -> Self {
        Self { db, scope }
    }

    /// Creates a data category.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the name is taken or the
    /// parent is not a live category.
    pub async fn create(
        &self,
        input: CreateDataCategoryInput,
    ) -> Result<data_categories::Model, DataCategoryError> {
        let validated = DataCategoryService::validate(&CategoryDraft {
            name: &input.name,
            description: input.description.as_deref(),
            category_type: &input.category_type,
            sensitivity_level: &input.sensitivity_level,
            special_category_basis: input.special_category_basis.as_deref(),
        })?;
        self.ensure_unique_name(&validated.name, None).await?;
        if let Some(parent_id) = input.parent_id {
            self.ensure_parent(parent_id).await?;
        }

        let now = chrono::Utc::now();
        let category = data_categories::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(self.scope.tenant()),
            workspace_id: Set(self.scope.workspace()),
            name: Set(validated.name),
            description: Set(validated.description),
            category_type: Set(validated.category_type.as_str().to_string()),
            sensitivity_level: Set(validated.sensitivity_level.as_str().to_string()),
            parent_id: Set(input.parent_id),
            special_category_basis: Set(validated
                .special_category_basis
                .map(|basis| basis.as_str().to_string())),
            is_system: Set(false),
            created_at: Set(now),
            created_by: Set(self.scope.user()),
            updated_at: Set(now),
            updated_by: Set(self.scope.user()),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        info!(
            category_id = %category.id,
            name = %category.name,
            category_type = %category.category_type,
            "Data category created"
        );
        Ok(category)
    }

    /// Lists live categories, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: DataCategoryFilter,
        page: PageRequest,
    ) -> Result<PageResponse<data_categories::Model>, DataCategoryError> {
        let mut query =
            data_categories::Entity::live(&self.scope).order_by_asc(data_categories::Column::Name);

        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(data_categories::Column::Name.contains(search));
        }
        if let Some(category_type) = filter.category_type {
            query = query.filter(data_categories::Column::CategoryType.eq(category_type.as_str()));
        }
        if let Some(level) = filter.sensitivity_level {
            query = query.filter(data_categories::Column::SensitivityLevel.eq(level.as_str()));
        }
        match filter.parent_id {
            Some(Some(parent_id)) => {
                query = query.filter(data_categories::Column::ParentId.eq(parent_id));
            }
            Some(None) => query = query.filter(data_categories::Column::ParentId.is_null()),
            None => {}
        }

        Ok(fetch_page(query, &self.db, page).await?)
    }

    /// Finds a live category by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<data_categories::Model>, DataCategoryError> {
        Ok(data_categories::Entity::live(&self.scope)
            .filter(data_categories::Column::Id.eq(id))
            .one(&self.db)
            .await?)
    }

    /// Updates a category.
    ///
    /// The special-basis rule is checked against the merged record, and a
    /// parent change is rejected when the new parent is the category itself
    /// or one of its descendants.
    ///
    /// # Errors
    ///
    /// Returns an error if the category is missing, validation fails, the
    /// name is taken or the parent move is invalid.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateDataCategoryInput,
    ) -> Result<data_categories::Model, DataCategoryError> {
        let category = self
            .find_by_id(id)
            .await?
            .ok_or(DataCategoryError::NotFound(id))?;

        let name = input.name.unwrap_or_else(|| category.name.clone());
        let description = input.description.unwrap_or_else(|| category.description.clone());
        let category_type = input
            .category_type
            .unwrap_or_else(|| category.category_type.clone());
        let sensitivity_level = input
            .sensitivity_level
            .unwrap_or_else(|| category.sensitivity_level.clone());
        let special_category_basis = input
            .special_category_basis
            .unwrap_or_else(|| category.special_category_basis.clone());

        let validated = DataCategoryService::validate(&CategoryDraft {
            name: &name,
            description: description.as_deref(),
            category_type: &category_type,
            sensitivity_level: &sensitivity_level,
            special_category_basis: special_category_basis.as_deref(),
        })?;
        if validated.name != category.name {
            self.ensure_unique_name(&validated.name, Some(id)).await?;
        }

        if let Some(new_parent) = input.parent_id
            && new_parent != category.parent_id
        {
            if let Some(parent_id) = new_parent
                && parent_id != id
            {
                self.ensure_parent(parent_id).await?;
            }
            let tree = self.tree().await?;
            tree.validate_parent_change(
                DataCategoryId::from_uuid(id),
                new_parent.map(DataCategoryId::from_uuid),
            )?;
        }

        let mut active: data_categories::ActiveModel = category.into();
        active.name = Set(validated.name);
        active.description = Set(validated.description);
        active.category_type = Set(validated.category_type.as_str().to_string());
        active.sensitivity_level = Set(validated.sensitivity_level.as_str().to_string());
        active.special_category_basis = Set(validated
            .special_category_basis
            .map(|basis| basis.as_str().to_string()));
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(parent_id);
        }
        active.updated_at = Set(chrono::Utc::now());
        active.updated_by = Set(self.scope.user());

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes a category that nothing references.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing category and `InUse` while live
    /// activities, live flows or child categories still reference it.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), DataCategoryError> {
        let category = self
            .find_by_id(id)
            .await?
            .ok_or(DataCategoryError::NotFound(id))?;

        let usage = self.usage(id).await?;
        if usage.is_in_use() {
            return Err(DataCategoryError::InUse(usage));
        }

        let now = chrono::Utc::now();
        let mut active: data_categories::ActiveModel = category.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.updated_by = Set(self.scope.user());
        active.update(&self.db).await?;

        info!(category_id = %id, "Data category deleted");
        Ok(())
    }

    /// Counts references to a category from live records.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the count queries fails.
    pub async fn usage(&self, id: Uuid) -> Result<CategoryUsage, DataCategoryError> {
        let live_activities = processing_activities::Entity::live(&self.scope)
            .select_only()
            .column(processing_activities::Column::Id)
            .into_query();
        let live_flows = data_flows::Entity::live(&self.scope)
            .select_only()
            .column(data_flows::Column::Id)
            .into_query();
        let live_edges = data_flow_edges::Entity::in_scope(&self.scope)
            .select_only()
            .column(data_flow_edges::Column::Id)
            .filter(data_flow_edges::Column::DataFlowId.in_subquery(live_flows))
            .into_query();

        let activities = activity_data_categories::Entity::in_scope(&self.scope)
            .filter(activity_data_categories::Column::DataCategoryId.eq(id))
            .filter(activity_data_categories::Column::ActivityId.in_subquery(live_activities))
            .count(&self.db);
        let edges = data_flow_edge_categories::Entity::in_scope(&self.scope)
            .filter(data_flow_edge_categories::Column::DataCategoryId.eq(id))
            .filter(data_flow_edge_categories::Column::EdgeId.in_subquery(live_edges))
            .count(&self.db);
        let children = data_categories::Entity::live(&self.scope)
            .filter(data_categories::Column::ParentId.eq(id))
            .count(&self.db);

        let (processing_activities, data_flow_edges, child_categories) =
            tokio::try_join!(activities, edges, children)?;

        Ok(CategoryUsage {
            processing_activities,
            data_flow_edges,
            child_categories,
        })
    }

    /// Aggregates the workspace's live categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored type is unknown.
    pub async fn statistics(&self) -> Result<CategoryStatistics, DataCategoryError> {
        let rows: Vec<(String, Option<Uuid>)> = data_categories::Entity::live(&self.scope)
            .select_only()
            .column(data_categories::Column::CategoryType)
            .column(data_categories::Column::ParentId)
            .into_tuple()
            .all(&self.db)
            .await?;

        let categories = rows
            .into_iter()
            .map(|(category_type, parent_id)| {
                category_type
                    .parse::<DataCategoryType>()
                    .map(|parsed| (parsed, parent_id.is_some()))
                    .map_err(|_| DataCategoryError::CorruptType(category_type))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CategoryStatistics::from_categories(categories))
    }

    /// Inserts the default categories that the workspace does not have yet.
    ///
    /// Seeds are matched by name; parents must be listed before children.
    ///
    /// # Errors
    ///
    /// Returns an error if a seed fails validation or an insert fails.
    pub async fn seed_defaults(&self, seeds: &[CategorySeed]) -> Result<usize, DataCategoryError> {
        let mut ids_by_name: HashMap<String, Uuid> = data_categories::Entity::live(&self.scope)
            .select_only()
            .column(data_categories::Column::Name)
            .column(data_categories::Column::Id)
            .into_tuple::<(String, Uuid)>()
            .all(&self.db)
            .await?
            .into_iter()
            .collect();

        let mut inserted = 0;
        for seed in seeds {
            if ids_by_name.contains_key(seed.name) {
                continue;
            }
            let validated = DataCategoryService::validate(&CategoryDraft {
                name: seed.name,
                description: Some(seed.description),
                category_type: seed.category_type,
                sensitivity_level: seed.sensitivity_level,
                special_category_basis: seed.special_category_basis,
            })?;
            let parent_id = seed.parent.and_then(|parent| ids_by_name.get(parent).copied());

            let now = chrono::Utc::now();
            let category = data_categories::ActiveModel {
                id: Set(Uuid::now_v7()),
                tenant_id: Set(self.scope.tenant()),
                workspace_id: Set(self.scope.workspace()),
                name: Set(validated.name),
                description: Set(validated.description),
                category_type: Set(validated.category_type.as_str().to_string()),
                sensitivity_level: Set(validated.sensitivity_level.as_str().to_string()),
                parent_id: Set(parent_id),
                special_category_basis: Set(validated
                    .special_category_basis
                    .map(|basis| basis.as_str().to_string())),
                is_system: Set(true),
                created_at: Set(now),
                created_by: Set(self.scope.user()),
                updated_at: Set(now),
                updated_by: Set(self.scope.user()),
                deleted_at: Set(None),
            }
            .insert(&self.db)
            .await?;

            ids_by_name.insert(category.name, category.id);
            inserted += 1;
        }

        info!(
            workspace_id = %self.scope.workspace(),
            inserted,
            "Default data categories seeded"
        );
        Ok(inserted)
    }

    async fn tree(&self) -> Result<CategoryTree, DataCategoryError> {
        let links: Vec<(Uuid, Option<Uuid>)> = data_categories::Entity::live(&self.scope)
            .select_only()
            .column(data_categories::Column::Id)
            .column(data_categories::Column::ParentId)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(CategoryTree::from_parent_links(links.into_iter().map(
            |(id, parent)| {
                (
                    DataCategoryId::from_uuid(id),
                    parent.map(DataCategoryId::from_uuid),
                )
            },
        )))
    }

    async fn ensure_parent(&self, parent_id: Uuid) -> Result<(), DataCategoryError> {
        self.find_by_id(parent_id)
            .await?
            .map(|_| ())
            .ok_or(DataCategoryError::ParentNotFound(parent_id))
    }

    async fn ensure_unique_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), DataCategoryError> {
        let mut query = data_categories::Entity::live(&self.scope)
            .filter(data_categories::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(data_categories::Column::Id.ne(id));
        }
        if query.count(&self.db).await? > 0 {
            return Err(DataCategoryError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}
