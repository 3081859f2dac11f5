//! Physical location repository.

use std::collections::HashSet;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use tracing::info;
use uuid::Uuid;

use super::scope::{SoftDeletable, fetch_page};
use crate::entities::{jurisdictions, physical_locations};
use dataguard_core::context::{ContextError, LocationDraft, validate_location};
use dataguard_shared::types::{PageRequest, PageResponse};
use dataguard_shared::{AppError, TenantScope};

/// Error types for location operations.
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    /// Field validation failed.
    #[error(transparent)]
    Invalid(#[from] ContextError),

    /// Another live location in the workspace has this name.
    #[error("Location '{0}' already exists")]
    DuplicateName(String),

    /// Location not found.
    #[error("Location not found: {0}")]
    NotFound(Uuid),

    /// Referenced jurisdiction does not exist.
    #[error("Jurisdiction not found: {0}")]
    JurisdictionNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<LocationError> for AppError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::Invalid(e) => Self::Validation(e.to_string()),
            e @ LocationError::JurisdictionNotFound(_) => Self::Validation(e.to_string()),
            e @ LocationError::DuplicateName(_) => Self::Conflict(e.to_string()),
            e @ LocationError::NotFound(_) => Self::NotFound(e.to_string()),
            LocationError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a location.
#[derive(Debug, Clone)]
pub struct CreateLocationInput {
    /// Location name (unique within the workspace).
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Jurisdiction the location is in.
    pub jurisdiction_id: Uuid,
}

/// Input for updating a location.
#[derive(Debug, Clone, Default)]
pub struct UpdateLocationInput {
    /// Location name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<Option<String>>,
    /// Street address.
    pub address: Option<Option<String>>,
    /// City.
    pub city: Option<Option<String>>,
    /// Jurisdiction.
    pub jurisdiction_id: Option<Uuid>,
}

/// Filter options for listing locations.
#[derive(Debug, Clone, Default)]
pub struct LocationFilter {
    /// Name substring.
    pub search: Option<String>,
    /// Only locations in this jurisdiction.
    pub jurisdiction_id: Option<Uuid>,
}

/// Physical location repository.
#[derive(Debug, Clone)]
pub struct LocationRepository {
    db: DatabaseConnection,
    scope: TenantScope,
}

impl LocationRepository {
    /// Creates a new location repository for a workspace.
    #[must_use]
    pub const fn new(db: DatabaseConnection, scope: TenantScope) -> Self {
        Self { db, scope }
    }

    /// Creates a location.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails, the name is taken or the
    /// jurisdiction does not exist.
    pub async fn create(
        &self,
        input: CreateLocationInput,
    ) -> Result<physical_locations::Model, LocationError> {
        let validated = validate_location(&LocationDraft {
            name: &input.name,
            description: input.description.as_deref(),
            address: input.address.as_deref(),
            city: input.city.as_deref(),
        })?;
        self.ensure_unique_name(&validated.name, None).await?;
        self.ensure_jurisdiction(input.jurisdiction_id).await?;

        let now = chrono::Utc::now();
        let location = physical_locations::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(self.scope.tenant()),
            workspace_id: Set(self.scope.workspace()),
            name: Set(validated.name),
            description: Set(validated.description),
            address: Set(validated.address),
            city: Set(validated.city),
            jurisdiction_id: Set(input.jurisdiction_id),
            created_at: Set(now),
            created_by: Set(self.scope.user()),
            updated_at: Set(now),
            updated_by: Set(self.scope.user()),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        info!(location_id = %location.id, name = %location.name, "Location created");
        Ok(location)
    }

    /// Lists live locations, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: LocationFilter,
        page: PageRequest,
    ) -> Result<PageResponse<physical_locations::Model>, LocationError> {
        let mut query = physical_locations::Entity::live(&self.scope)
            .order_by_asc(physical_locations::Column::Name);

        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(physical_locations::Column::Name.contains(search));
        }
        if let Some(jurisdiction_id) = filter.jurisdiction_id {
            query = query.filter(physical_locations::Column::JurisdictionId.eq(jurisdiction_id));
        }

        Ok(fetch_page(query, &self.db, page).await?)
    }

    /// Finds a live location by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<physical_locations::Model>, LocationError> {
        Ok(physical_locations::Entity::live(&self.scope)
            .filter(physical_locations::Column::Id.eq(id))
            .one(&self.db)
            .await?)
    }

    /// Updates a location.
    ///
    /// # Errors
    ///
    /// Returns an error if the location is missing, the merged fields fail
    /// validation or the new name is taken.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateLocationInput,
    ) -> Result<physical_locations::Model, LocationError> {
        let location = self
            .find_by_id(id)
            .await?
            .ok_or(LocationError::NotFound(id))?;

        let name = input.name.unwrap_or_else(|| location.name.clone());
        let description = input.description.unwrap_or_else(|| location.description.clone());
        let address = input.address.unwrap_or_else(|| location.address.clone());
        let city = input.city.unwrap_or_else(|| location.city.clone());

        let validated = validate_location(&LocationDraft {
            name: &name,
            description: description.as_deref(),
            address: address.as_deref(),
            city: city.as_deref(),
        })?;
        if validated.name != location.name {
            self.ensure_unique_name(&validated.name, Some(id)).await?;
        }
        if let Some(jurisdiction_id) = input.jurisdiction_id {
            self.ensure_jurisdiction(jurisdiction_id).await?;
        }

        let mut active: physical_locations::ActiveModel = location.into();
        active.name = Set(validated.name);
        active.description = Set(validated.description);
        active.address = Set(validated.address);
        active.city = Set(validated.city);
        if let Some(jurisdiction_id) = input.jurisdiction_id {
            active.jurisdiction_id = Set(jurisdiction_id);
        }
        active.updated_at = Set(chrono::Utc::now());
        active.updated_by = Set(self.scope.user());

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes a location.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no live location with this ID.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), LocationError> {
        let location = self
            .find_by_id(id)
            .await?
            .ok_or(LocationError::NotFound(id))?;

        let now = chrono::Utc::now();
        let mut active: physical_locations::ActiveModel = location.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.updated_by = Set(self.scope.user());
        active.update(&self.db).await?;

        info!(location_id = %id, "Location deleted");
        Ok(())
    }

    async fn ensure_unique_name(&self, name: &str, exclude: Option<Uuid>) -> Result<(), LocationError> {
        let mut query = physical_locations::Entity::live(&self.scope)
            .filter(physical_locations::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(physical_locations::Column::Id.ne(id));
        }
        if query.count(&self.db).await? > 0 {
            return Err(LocationError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    async fn ensure_jurisdiction(&self, id: Uuid) -> Result<(), LocationError> {
        jurisdictions::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(LocationError::JurisdictionNotFound(id))
    }
}

/// First of `ids` that is not a live location of the workspace.
pub(super) async fn first_missing_location<C: ConnectionTrait>(
    db: &C,
    scope: &TenantScope,
    ids: &[Uuid],
) -> Result<Option<Uuid>, DbErr> {
    if ids.is_empty() {
        return Ok(None);
    }
    let found: HashSet<Uuid> = physical_locations::Entity::live(scope)
        .select_only()
        .column(physical_locations::Column::Id)
        .filter(physical_locations::Column::Id.is_in(ids.iter().copied()))
        .into_tuple::<Uuid>()
        .all(db)
        .await?
        .into_iter()
        .collect();
    Ok(ids.iter().copied().find(|id| !found.contains(id)))
}
