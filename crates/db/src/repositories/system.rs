//! System repository with endpoints and location links.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::location::first_missing_location;
use super::scope::{Scoped, SoftDeletable, fetch_page, unique_ids};
use crate::entities::{physical_locations, system_endpoints, system_locations, systems};
use dataguard_core::context::{ContextError, SystemDraft, validate_endpoint, validate_system};
use dataguard_core::gdpr::{Criticality, SystemStatus, SystemType};
use dataguard_shared::types::{PageRequest, PageResponse};
use dataguard_shared::{AppError, TenantScope};

/// Error types for system operations.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// Field validation failed.
    #[error(transparent)]
    Invalid(#[from] ContextError),

    /// Another live system in the workspace has this name.
    #[error("System '{0}' already exists")]
    DuplicateName(String),

    /// System not found.
    #[error("System not found: {0}")]
    NotFound(Uuid),

    /// Endpoint not found on this system.
    #[error("Endpoint not found: {0}")]
    EndpointNotFound(Uuid),

    /// A location to link does not exist in the workspace.
    #[error("Location not found: {0}")]
    LocationNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SystemError> for AppError {
    fn from(err: SystemError) -> Self {
        match err {
            SystemError::Invalid(e) => Self::Validation(e.to_string()),
            e @ SystemError::LocationNotFound(_) => Self::Validation(e.to_string()),
            e @ SystemError::DuplicateName(_) => Self::Conflict(e.to_string()),
            e @ (SystemError::NotFound(_) | SystemError::EndpointNotFound(_)) => {
                Self::NotFound(e.to_string())
            }
            SystemError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a system.
#[derive(Debug, Clone)]
pub struct CreateSystemInput {
    /// System name (unique within the workspace).
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Hosting model.
    pub system_type: String,
    /// Owning team or person.
    pub owner: Option<String>,
    /// Business criticality.
    pub criticality: String,
    /// Lifecycle status.
    pub status: String,
}

/// Input for updating a system.
#[derive(Debug, Clone, Default)]
pub struct UpdateSystemInput {
    /// System name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<Option<String>>,
    /// Hosting model.
    pub system_type: Option<String>,
    /// Owner.
    pub owner: Option<Option<String>>,
    /// Business criticality.
    pub criticality: Option<String>,
    /// Lifecycle status.
    pub status: Option<String>,
}

/// Filter options for listing systems.
#[derive(Debug, Clone, Default)]
pub struct SystemFilter {
    /// Name substring.
    pub search: Option<String>,
    /// Only systems of this type.
    pub system_type: Option<SystemType>,
    /// Only systems of this criticality.
    pub criticality: Option<Criticality>,
    /// Only systems with this status.
    pub status: Option<SystemStatus>,
}

/// Input for adding an endpoint.
#[derive(Debug, Clone)]
pub struct CreateEndpointInput {
    /// Endpoint name.
    pub name: String,
    /// Interface kind.
    pub endpoint_type: String,
    /// Address, when it has one.
    pub url: Option<String>,
}

/// A system with its endpoints and locations.
#[derive(Debug, Clone, Serialize)]
pub struct SystemDetails {
    /// The system row.
    #[serde(flatten)]
    pub system: systems::Model,
    /// Endpoints, ordered by name.
    pub endpoints: Vec<system_endpoints::Model>,
    /// Live linked locations.
    pub locations: Vec<physical_locations::Model>,
}

/// System repository.
#[derive(Debug, Clone)]
pub struct SystemRepository {
    db: DatabaseConnection,
    scope: TenantScope,
}

impl SystemRepository {
    /// Creates a new system repository for a workspace.
    #[must_use]
    pub const fn new(db: DatabaseConnection, scope: TenantScope) -> Self {
        Self { db, scope }
    }

    /// Creates a system.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the name is taken.
    pub async fn create(&self, input: CreateSystemInput) -> Result<systems::Model, SystemError> {
        let validated = validate_system(&SystemDraft {
            name: &input.name,
            description: input.description.as_deref(),
            system_type: &input.system_type,
            owner: input.owner.as_deref(),
            criticality: &input.criticality,
            status: &input.status,
        })?;
        self.ensure_unique_name(&validated.name, None).await?;

        let now = chrono::Utc::now();
        let system = systems::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(self.scope.tenant()),
            workspace_id: Set(self.scope.workspace()),
            name: Set(validated.name),
            description: Set(validated.description),
            system_type: Set(validated.system_type.as_str().to_string()),
            owner: Set(validated.owner),
            criticality: Set(validated.criticality.as_str().to_string()),
            status: Set(validated.status.as_str().to_string()),
            created_at: Set(now),
            created_by: Set(self.scope.user()),
            updated_at: Set(now),
            updated_by: Set(self.scope.user()),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        info!(system_id = %system.id, name = %system.name, "System created");
        Ok(system)
    }

    /// Lists live systems, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: SystemFilter,
        page: PageRequest,
    ) -> Result<PageResponse<systems::Model>, SystemError> {
        let mut query = systems::Entity::live(&self.scope).order_by_asc(systems::Column::Name);

        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(systems::Column::Name.contains(search));
        }
        if let Some(system_type) = filter.system_type {
            query = query.filter(systems::Column::SystemType.eq(system_type.as_str()));
        }
        if let Some(criticality) = filter.criticality {
            query = query.filter(systems::Column::Criticality.eq(criticality.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(systems::Column::Status.eq(status.as_str()));
        }

        Ok(fetch_page(query, &self.db, page).await?)
    }

    /// Finds a live system by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<systems::Model>, SystemError> {
        Ok(systems::Entity::live(&self.scope)
            .filter(systems::Column::Id.eq(id))
            .one(&self.db)
            .await?)
    }

    /// Finds a system together with its endpoints and live locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_details(&self, id: Uuid) -> Result<Option<SystemDetails>, SystemError> {
        let Some(system) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let endpoints = self.list_endpoints(id).await?;

        let location_ids: Vec<Uuid> = system_locations::Entity::in_scope(&self.scope)
            .filter(system_locations::Column::SystemId.eq(id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|link| link.location_id)
            .collect();
        let locations = physical_locations::Entity::live(&self.scope)
            .filter(physical_locations::Column::Id.is_in(location_ids))
            .order_by_asc(physical_locations::Column::Name)
            .all(&self.db)
            .await?;

        Ok(Some(SystemDetails {
            system,
            endpoints,
            locations,
        }))
    }

    /// Updates a system.
    ///
    /// # Errors
    ///
    /// Returns an error if the system is missing, the merged fields fail
    /// validation or the new name is taken.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateSystemInput,
    ) -> Result<systems::Model, SystemError> {
        let system = self.find_by_id(id).await?.ok_or(SystemError::NotFound(id))?;

        let name = input.name.unwrap_or_else(|| system.name.clone());
        let description = input.description.unwrap_or_else(|| system.description.clone());
        let system_type = input.system_type.unwrap_or_else(|| system.system_type.clone());
        let owner = input.owner.unwrap_or_else(|| system.owner.clone());
        let criticality = input.criticality.unwrap_or_else(|| system.criticality.clone());
        let status = input.status.unwrap_or_else(|| system.status.clone());

        let validated = validate_system(&SystemDraft {
            name: &name,
            description: description.as_deref(),
            system_type: &system_type,
            owner: owner.as_deref(),
            criticality: &criticality,
            status: &status,
        })?;
        if validated.name != system.name {
            self.ensure_unique_name(&validated.name, Some(id)).await?;
        }

        let mut active: systems::ActiveModel = system.into();
        active.name = Set(validated.name);
        active.description = Set(validated.description);
        active.system_type = Set(validated.system_type.as_str().to_string());
        active.owner = Set(validated.owner);
        active.criticality = Set(validated.criticality.as_str().to_string());
        active.status = Set(validated.status.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now());
        active.updated_by = Set(self.scope.user());

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes a system.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no live system with this ID.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), SystemError> {
        let system = self.find_by_id(id).await?.ok_or(SystemError::NotFound(id))?;

        let now = chrono::Utc::now();
        let mut active: systems::ActiveModel = system.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.updated_by = Set(self.scope.user());
        active.update(&self.db).await?;

        info!(system_id = %id, "System deleted");
        Ok(())
    }

    /// Adds an endpoint to a system.
    ///
    /// # Errors
    ///
    /// Returns an error if the system is missing or the endpoint is invalid.
    pub async fn add_endpoint(
        &self,
        system_id: Uuid,
        input: CreateEndpointInput,
    ) -> Result<system_endpoints::Model, SystemError> {
        self.find_by_id(system_id)
            .await?
            .ok_or(SystemError::NotFound(system_id))?;
        let (name, endpoint_type, url) =
            validate_endpoint(&input.name, &input.endpoint_type, input.url.as_deref())?;

        let endpoint = system_endpoints::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(self.scope.tenant()),
            workspace_id: Set(self.scope.workspace()),
            system_id: Set(system_id),
            name: Set(name),
            endpoint_type: Set(endpoint_type.as_str().to_string()),
            url: Set(url),
            created_at: Set(chrono::Utc::now()),
            created_by: Set(self.scope.user()),
        }
        .insert(&self.db)
        .await?;

        info!(system_id = %system_id, endpoint_id = %endpoint.id, "System endpoint added");
        Ok(endpoint)
    }

    /// Lists a system's endpoints by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_endpoints(
        &self,
        system_id: Uuid,
    ) -> Result<Vec<system_endpoints::Model>, SystemError> {
        Ok(system_endpoints::Entity::in_scope(&self.scope)
            .filter(system_endpoints::Column::SystemId.eq(system_id))
            .order_by_asc(system_endpoints::Column::Name)
            .all(&self.db)
            .await?)
    }

    /// Deletes an endpoint row.
    ///
    /// # Errors
    ///
    /// Returns `EndpointNotFound` if the system has no such endpoint.
    pub async fn delete_endpoint(&self, system_id: Uuid, endpoint_id: Uuid) -> Result<(), SystemError> {
        let result = system_endpoints::Entity::delete_in_scope(&self.scope)
            .filter(system_endpoints::Column::SystemId.eq(system_id))
            .filter(system_endpoints::Column::Id.eq(endpoint_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(SystemError::EndpointNotFound(endpoint_id));
        }

        info!(system_id = %system_id, endpoint_id = %endpoint_id, "System endpoint deleted");
        Ok(())
    }

    /// Replaces the system's linked locations.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing system and `LocationNotFound` if any
    /// location is not live in the workspace. Nothing changes on error.
    pub async fn set_locations(
        &self,
        system_id: Uuid,
        location_ids: Vec<Uuid>,
    ) -> Result<Vec<Uuid>, SystemError> {
        self.find_by_id(system_id)
            .await?
            .ok_or(SystemError::NotFound(system_id))?;

        let location_ids = unique_ids(location_ids);
        if let Some(missing) = first_missing_location(&self.db, &self.scope, &location_ids).await? {
            return Err(SystemError::LocationNotFound(missing));
        }

        let txn = self.db.begin().await?;
        system_locations::Entity::delete_in_scope(&self.scope)
            .filter(system_locations::Column::SystemId.eq(system_id))
            .exec(&txn)
            .await?;

        let now = chrono::Utc::now();
        for location_id in &location_ids {
            system_locations::ActiveModel {
                system_id: Set(system_id),
                location_id: Set(*location_id),
                tenant_id: Set(self.scope.tenant()),
                workspace_id: Set(self.scope.workspace()),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        info!(system_id = %system_id, count = location_ids.len(), "System locations set");
        Ok(location_ids)
    }

    async fn ensure_unique_name(&self, name: &str, exclude: Option<Uuid>) -> Result<(), SystemError> {
        let mut query = systems::Entity::live(&self.scope).filter(systems::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(systems::Column::Id.ne(id));
        }
        if query.count(&self.db).await? > 0 {
            return Err(SystemError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}
