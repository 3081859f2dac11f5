//! Vendor repository with contracts and location links.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::location::first_missing_location;
use super::scope::{Scoped, SoftDeletable, fetch_page, unique_ids};
use crate::entities::{physical_locations, vendor_contracts, vendor_locations, vendors};
use dataguard_core::context::{
    ContextError, ContractDraft, VendorDraft, validate_contract, validate_vendor,
};
use dataguard_core::gdpr::{VendorRole, VendorStatus};
use dataguard_shared::types::{PageRequest, PageResponse};
use dataguard_shared::{AppError, TenantScope};

/// Error types for vendor operations.
#[derive(Debug, thiserror::Error)]
pub enum VendorError {
    /// Field validation failed.
    #[error(transparent)]
    Invalid(#[from] ContextError),

    /// Another live vendor in the workspace has this name.
    #[error("Vendor '{0}' already exists")]
    DuplicateName(String),

    /// Vendor not found.
    #[error("Vendor not found: {0}")]
    NotFound(Uuid),

    /// Contract not found on this vendor.
    #[error("Contract not found: {0}")]
    ContractNotFound(Uuid),

    /// A location to link does not exist in the workspace.
    #[error("Location not found: {0}")]
    LocationNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<VendorError> for AppError {
    fn from(err: VendorError) -> Self {
        match err {
            VendorError::Invalid(e) => Self::Validation(e.to_string()),
            e @ VendorError::LocationNotFound(_) => Self::Validation(e.to_string()),
            e @ VendorError::DuplicateName(_) => Self::Conflict(e.to_string()),
            e @ (VendorError::NotFound(_) | VendorError::ContractNotFound(_)) => {
                Self::NotFound(e.to_string())
            }
            VendorError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a vendor.
#[derive(Debug, Clone)]
pub struct CreateVendorInput {
    /// Vendor name (unique within the workspace).
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Website.
    pub website: Option<String>,
    /// Privacy contact email.
    pub contact_email: Option<String>,
    /// GDPR role of the vendor.
    pub vendor_role: String,
    /// Lifecycle status.
    pub status: String,
}

/// Input for updating a vendor.
#[derive(Debug, Clone, Default)]
pub struct UpdateVendorInput {
    /// Vendor name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<Option<String>>,
    /// Website.
    pub website: Option<Option<String>>,
    /// Privacy contact email.
    pub contact_email: Option<Option<String>>,
    /// GDPR role.
    pub vendor_role: Option<String>,
    /// Lifecycle status.
    pub status: Option<String>,
}

/// Filter options for listing vendors.
#[derive(Debug, Clone, Default)]
pub struct VendorFilter {
    /// Name substring.
    pub search: Option<String>,
    /// Only vendors with this role.
    pub vendor_role: Option<VendorRole>,
    /// Only vendors with this status.
    pub status: Option<VendorStatus>,
}

/// Input for adding a contract.
#[derive(Debug, Clone)]
pub struct CreateContractInput {
    /// Contract kind.
    pub contract_type: String,
    /// Title.
    pub title: String,
    /// Start date.
    pub start_date: NaiveDate,
    /// End date, not before the start.
    pub end_date: Option<NaiveDate>,
    /// Next review.
    pub review_date: Option<NaiveDate>,
}

/// Input for updating a contract.
#[derive(Debug, Clone, Default)]
pub struct UpdateContractInput {
    /// Contract kind.
    pub contract_type: Option<String>,
    /// Title.
    pub title: Option<String>,
    /// Start date.
    pub start_date: Option<NaiveDate>,
    /// End date.
    pub end_date: Option<Option<NaiveDate>>,
    /// Next review.
    pub review_date: Option<Option<NaiveDate>>,
}

/// A vendor with its contracts and locations.
#[derive(Debug, Clone, Serialize)]
pub struct VendorDetails {
    /// The vendor row.
    #[serde(flatten)]
    pub vendor: vendors::Model,
    /// Contracts, newest start date first.
    pub contracts: Vec<vendor_contracts::Model>,
    /// Live linked locations.
    pub locations: Vec<physical_locations::Model>,
}

/// Vendor repository.
#[derive(Debug, Clone)]
pub struct VendorRepository {
    db: DatabaseConnection,
    scope: TenantScope,
}

impl VendorRepository {
    /// Creates a new vendor repository for a workspace.
    #[must_use]
    pub const fn new(db: DatabaseConnection, scope: TenantScope) -> Self {
        Self { db, scope }
    }

    /// Creates a vendor.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the name is taken.
    pub async fn create(&self, input: CreateVendorInput) -> Result<vendors::Model, VendorError> {
        let validated = validate_vendor(&VendorDraft {
            name: &input.name,
            description: input.description.as_deref(),
            website: input.website.as_deref(),
            contact_email: input.contact_email.as_deref(),
            vendor_role: &input.vendor_role,
            status: &input.status,
        })?;
        self.ensure_unique_name(&validated.name, None).await?;

        let now = chrono::Utc::now();
        let vendor = vendors::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(self.scope.tenant()),
            workspace_id: Set(self.scope.workspace()),
            name: Set(validated.name),
            description: Set(validated.description),
            website: Set(validated.website),
            contact_email: Set(validated.contact_email),
            vendor_role: Set(validated.vendor_role.as_str().to_string()),
            status: Set(validated.status.as_str().to_string()),
            created_at: Set(now),
            created_by: Set(self.scope.user()),
            updated_at: Set(now),
            updated_by: Set(self.scope.user()),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        info!(vendor_id = %vendor.id, name = %vendor.name, "Vendor created");
        Ok(vendor)
    }

    /// Lists live vendors, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: VendorFilter,
        page: PageRequest,
    ) -> Result<PageResponse<vendors::Model>, VendorError> {
        let mut query = vendors::Entity::live(&self.scope).order_by_asc(vendors::Column::Name);

        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(vendors::Column::Name.contains(search));
        }
        if let Some(role) = filter.vendor_role {
            query = query.filter(vendors::Column::VendorRole.eq(role.as_str()));
        }
        if let Some(status) = filter.status {
            query = query.filter(vendors::Column::Status.eq(status.as_str()));
        }

        Ok(fetch_page(query, &self.db, page).await?)
    }

    /// Finds a live vendor by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<vendors::Model>, VendorError> {
        Ok(vendors::Entity::live(&self.scope)
            .filter(vendors::Column::Id.eq(id))
            .one(&self.db)
            .await?)
    }

    /// Finds a vendor together with its contracts and live locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_details(&self, id: Uuid) -> Result<Option<VendorDetails>, VendorError> {
        let Some(vendor) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let contracts = self.list_contracts(id).await?;

        let location_ids: Vec<Uuid> = vendor_locations::Entity::in_scope(&self.scope)
            .filter(vendor_locations::Column::VendorId.eq(id))
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

        Ok(Some(VendorDetails {
            vendor,
            contracts,
            locations,
        }))
    }

    /// Updates a vendor.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor is missing, the merged fields fail
    /// validation or the new name is taken.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateVendorInput,
    ) -> Result<vendors::Model, VendorError> {
        let vendor = self.find_by_id(id).await?.ok_or(VendorError::NotFound(id))?;

        let name = input.name.unwrap_or_else(|| vendor.name.clone());
        let description = input.description.unwrap_or_else(|| vendor.description.clone());
        let website = input.website.unwrap_or_else(|| vendor.website.clone());
        let contact_email = input.contact_email.unwrap_or_else(|| vendor.contact_email.clone());
        let vendor_role = input.vendor_role.unwrap_or_else(|| vendor.vendor_role.clone());
        let status = input.status.unwrap_or_else(|| vendor.status.clone());

        let validated = validate_vendor(&VendorDraft {
            name: &name,
            description: description.as_deref(),
            website: website.as_deref(),
            contact_email: contact_email.as_deref(),
            vendor_role: &vendor_role,
            status: &status,
        })?;
        if validated.name != vendor.name {
            self.ensure_unique_name(&validated.name, Some(id)).await?;
        }

        let mut active: vendors::ActiveModel = vendor.into();
        active.name = Set(validated.name);
        active.description = Set(validated.description);
        active.website = Set(validated.website);
        active.contact_email = Set(validated.contact_email);
        active.vendor_role = Set(validated.vendor_role.as_str().to_string());
        active.status = Set(validated.status.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now());
        active.updated_by = Set(self.scope.user());

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes a vendor.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no live vendor with this ID.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), VendorError> {
        let vendor = self.find_by_id(id).await?.ok_or(VendorError::NotFound(id))?;

        let now = chrono::Utc::now();
        let mut active: vendors::ActiveModel = vendor.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.updated_by = Set(self.scope.user());
        active.update(&self.db).await?;

        info!(vendor_id = %id, "Vendor deleted");
        Ok(())
    }

    // ========================================================================
    // Contracts
    // ========================================================================

    /// Adds a contract to a vendor.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor is missing or the contract is invalid.
    pub async fn add_contract(
        &self,
        vendor_id: Uuid,
        input: CreateContractInput,
    ) -> Result<vendor_contracts::Model, VendorError> {
        self.find_by_id(vendor_id)
            .await?
            .ok_or(VendorError::NotFound(vendor_id))?;

        let validated = validate_contract(&ContractDraft {
            contract_type: &input.contract_type,
            title: &input.title,
            start_date: input.start_date,
            end_date: input.end_date,
            review_date: input.review_date,
        })?;

        let now = chrono::Utc::now();
        let contract = vendor_contracts::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(self.scope.tenant()),
            workspace_id: Set(self.scope.workspace()),
            vendor_id: Set(vendor_id),
            contract_type: Set(validated.contract_type.as_str().to_string()),
            title: Set(validated.title),
            start_date: Set(validated.start_date),
            end_date: Set(validated.end_date),
            review_date: Set(validated.review_date),
            created_at: Set(now),
            created_by: Set(self.scope.user()),
            updated_at: Set(now),
            updated_by: Set(self.scope.user()),
        }
        .insert(&self.db)
        .await?;

        info!(vendor_id = %vendor_id, contract_id = %contract.id, "Vendor contract added");
        Ok(contract)
    }

    /// Lists a vendor's contracts, newest start date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_contracts(
        &self,
        vendor_id: Uuid,
    ) -> Result<Vec<vendor_contracts::Model>, VendorError> {
        Ok(vendor_contracts::Entity::in_scope(&self.scope)
            .filter(vendor_contracts::Column::VendorId.eq(vendor_id))
            .order_by_desc(vendor_contracts::Column::StartDate)
            .all(&self.db)
            .await?)
    }

    /// Updates a contract.
    ///
    /// # Errors
    ///
    /// Returns `ContractNotFound` or a validation error for the merged fields.
    pub async fn update_contract(
        &self,
        vendor_id: Uuid,
        contract_id: Uuid,
        input: UpdateContractInput,
    ) -> Result<vendor_contracts::Model, VendorError> {
        let contract = self.find_contract(vendor_id, contract_id).await?;

        let contract_type = input
            .contract_type
            .unwrap_or_else(|| contract.contract_type.clone());
        let title = input.title.unwrap_or_else(|| contract.title.clone());
        let validated = validate_contract(&ContractDraft {
            contract_type: &contract_type,
            title: &title,
            start_date: input.start_date.unwrap_or(contract.start_date),
            end_date: input.end_date.unwrap_or(contract.end_date),
            review_date: input.review_date.unwrap_or(contract.review_date),
        })?;

        let mut active: vendor_contracts::ActiveModel = contract.into();
        active.contract_type = Set(validated.contract_type.as_str().to_string());
        active.title = Set(validated.title);
        active.start_date = Set(validated.start_date);
        active.end_date = Set(validated.end_date);
        active.review_date = Set(validated.review_date);
        active.updated_at = Set(chrono::Utc::now());
        active.updated_by = Set(self.scope.user());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a contract row.
    ///
    /// # Errors
    ///
    /// Returns `ContractNotFound` if the vendor has no such contract.
    pub async fn delete_contract(&self, vendor_id: Uuid, contract_id: Uuid) -> Result<(), VendorError> {
        self.find_contract(vendor_id, contract_id).await?;
        vendor_contracts::Entity::delete_in_scope(&self.scope)
            .filter(vendor_contracts::Column::Id.eq(contract_id))
            .exec(&self.db)
            .await?;

        info!(vendor_id = %vendor_id, contract_id = %contract_id, "Vendor contract deleted");
        Ok(())
    }

    // ========================================================================
    // Locations
    // ========================================================================

    /// Replaces the vendor's linked locations.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing vendor and `LocationNotFound` if any
    /// location is not live in the workspace. Nothing changes on error.
    pub async fn set_locations(
        &self,
        vendor_id: Uuid,
        location_ids: Vec<Uuid>,
    ) -> Result<Vec<Uuid>, VendorError> {
        self.find_by_id(vendor_id)
            .await?
            .ok_or(VendorError::NotFound(vendor_id))?;

        let location_ids = unique_ids(location_ids);
        if let Some(missing) = first_missing_location(&self.db, &self.scope, &location_ids).await? {
            return Err(VendorError::LocationNotFound(missing));
        }

        let txn = self.db.begin().await?;
        vendor_locations::Entity::delete_in_scope(&self.scope)
            .filter(vendor_locations::Column::VendorId.eq(vendor_id))
            .exec(&txn)
            .await?;

        let now = chrono::Utc::now();
        for location_id in &location_ids {
            vendor_locations::ActiveModel {
                vendor_id: Set(vendor_id),
                location_id: Set(*location_id),
                tenant_id: Set(self.scope.tenant()),
                workspace_id: Set(self.scope.workspace()),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }
        txn.commit().await?;

        info!(vendor_id = %vendor_id, count = location_ids.len(), "Vendor locations set");
        Ok(location_ids)
    }

    async fn find_contract(
        &self,
        vendor_id: Uuid,
        contract_id: Uuid,
    ) -> Result<vendor_contracts::Model, VendorError> {
        vendor_contracts::Entity::in_scope(&self.scope)
            .filter(vendor_contracts::Column::VendorId.eq(vendor_id))
            .filter(vendor_contracts::Column::Id.eq(contract_id))
            .one(&self.db)
            .await?
            .ok_or(VendorError::ContractNotFound(contract_id))
    }

    async fn ensure_unique_name(&self, name: &str, exclude: Option<Uuid>) -> Result<(), VendorError> {
        let mut query = vendors::Entity::live(&self.scope).filter(vendors::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(vendors::Column::Id.ne(id));
        }
        if query.count(&self.db).await? > 0 {
            return Err(VendorError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}
