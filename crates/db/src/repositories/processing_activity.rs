//! Processing activity repository (Article 30 records) and link tables.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, QueryTrait, Select, Set,
};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::scope::{Scoped, SoftDeletable, fetch_page};
use crate::entities::{
    activity_data_categories, activity_data_flows, activity_retention_policies, activity_systems,
    activity_vendors, data_categories, data_flows, processing_activities, retention_policies,
    systems, vendors,
};
use dataguard_core::activity::{ActivityDraft, ActivityError, ComplianceCounts, ProcessingActivityService};
use dataguard_core::gdpr::{
    ActivitySystemRole, DataCategoryType, LawfulBasis, ProcessingStatus, UnknownValue, VendorRole,
};
use dataguard_core::validation::{FieldError, MAX_TEXT_LEN, optional_text};
use dataguard_shared::types::{PageRequest, PageResponse};
use dataguard_shared::{AppError, TenantScope};

/// What an activity can be linked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `activity_systems`.
    System,
    /// `activity_data_categories`.
    DataCategory,
    /// `activity_vendors`.
    Vendor,
    /// `activity_retention_policies`.
    RetentionPolicy,
    /// `activity_data_flows`.
    DataFlow,
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::System => "System",
            Self::DataCategory => "Data category",
            Self::Vendor => "Vendor",
            Self::RetentionPolicy => "Retention policy",
            Self::DataFlow => "Data flow",
        })
    }
}

/// Error types for processing activity operations.
#[derive(Debug, thiserror::Error)]
pub enum ActivityRepoError {
    /// An activity rule was violated.
    #[error(transparent)]
    Rule(#[from] ActivityError),

    /// A link field failed validation.
    #[error(transparent)]
    Field(#[from] FieldError),

    /// A link role carried an unknown value.
    #[error(transparent)]
    UnknownValue(#[from] UnknownValue),

    /// Another live activity in the workspace has this name.
    #[error("Processing activity '{0}' already exists")]
    DuplicateName(String),

    /// Activity not found.
    #[error("Processing activity not found: {0}")]
    NotFound(Uuid),

    /// The record to link is not live in the workspace.
    #[error("{0} not found: {1}")]
    TargetNotFound(LinkKind, Uuid),

    /// The record is already linked to the activity.
    #[error("{0} {1} is already linked to this activity")]
    AlreadyLinked(LinkKind, Uuid),

    /// The record is not linked to the activity.
    #[error("{0} {1} is not linked to this activity")]
    LinkNotFound(LinkKind, Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ActivityRepoError> for AppError {
    fn from(err: ActivityRepoError) -> Self {
        match err {
            ActivityRepoError::Rule(e) => Self::Validation(e.to_string()),
            ActivityRepoError::Field(e) => Self::Validation(e.to_string()),
            ActivityRepoError::UnknownValue(e) => Self::Validation(e.to_string()),
            e @ ActivityRepoError::TargetNotFound(..) => Self::Validation(e.to_string()),
            e @ (ActivityRepoError::DuplicateName(_) | ActivityRepoError::AlreadyLinked(..)) => {
                Self::Conflict(e.to_string())
            }
            e @ (ActivityRepoError::NotFound(_) | ActivityRepoError::LinkNotFound(..)) => {
                Self::NotFound(e.to_string())
            }
            ActivityRepoError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for creating a processing activity.
#[derive(Debug, Clone)]
pub struct CreateActivityInput {
    /// Record name (unique within the workspace).
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Purpose of processing.
    pub purpose: String,
    /// Article 6 basis.
    pub lawful_basis: String,
    /// Required when the basis is legitimate interests.
    pub legitimate_interest_assessment: Option<String>,
    /// Kinds of data subjects.
    pub data_subject_types: Vec<String>,
    /// Lifecycle status.
    pub status: String,
    /// A DPIA is needed.
    pub requires_dpia: bool,
    /// The DPO must review the record.
    pub dpo_review_required: bool,
    /// When the DPO reviewed it.
    pub dpo_reviewed_at: Option<DateTime<Utc>>,
    /// Last completed review.
    pub last_reviewed_at: Option<NaiveDate>,
    /// Next scheduled review.
    pub next_review_date: Option<NaiveDate>,
}

/// Input for updating a processing activity.
#[derive(Debug, Clone, Default)]
pub struct UpdateActivityInput {
    /// Record name.
    pub name: Option<String>,
    /// Description.
    pub description: Option<Option<String>>,
    /// Purpose of processing.
    pub purpose: Option<String>,
    /// Article 6 basis.
    pub lawful_basis: Option<String>,
    /// Legitimate-interest assessment.
    pub legitimate_interest_assessment: Option<Option<String>>,
    /// Kinds of data subjects.
    pub data_subject_types: Option<Vec<String>>,
    /// Lifecycle status.
    pub status: Option<String>,
    /// A DPIA is needed.
    pub requires_dpia: Option<bool>,
    /// The DPO must review the record.
    pub dpo_review_required: Option<bool>,
    /// When the DPO reviewed it.
    pub dpo_reviewed_at: Option<Option<DateTime<Utc>>>,
    /// Last completed review.
    pub last_reviewed_at: Option<Option<NaiveDate>>,
    /// Next scheduled review.
    pub next_review_date: Option<Option<NaiveDate>>,
}

/// Filter options for listing activities.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    /// Substring of the name or purpose.
    pub search: Option<String>,
    /// Only this status.
    pub status: Option<ProcessingStatus>,
    /// Only this lawful basis.
    pub lawful_basis: Option<LawfulBasis>,
    /// Restrict to these IDs.
    pub ids: Option<Vec<Uuid>>,
}

/// A link to create, with the data the link row carries.
#[derive(Debug, Clone)]
pub enum NewActivityLink {
    /// Link a system in a role.
    System {
        /// System to link.
        system_id: Uuid,
        /// primary, supporting or backup.
        role: String,
    },
    /// Link a data category, optionally justified.
    DataCategory {
        /// Category to link.
        data_category_id: Uuid,
        /// Why the category is needed.
        justification: Option<String>,
    },
    /// Link a vendor in a GDPR role.
    Vendor {
        /// Vendor to link.
        vendor_id: Uuid,
        /// Vendor role for this activity.
        role: String,
        /// A contract (DPA) is required.
        contract_required: bool,
    },
    /// Link a retention policy.
    RetentionPolicy {
        /// Policy to link.
        retention_policy_id: Uuid,
    },
    /// Link a data flow.
    DataFlow {
        /// Flow to link.
        data_flow_id: Uuid,
    },
}

impl NewActivityLink {
    /// Kind and target of the link.
    #[must_use]
    pub const fn target(&self) -> (LinkKind, Uuid) {
        match self {
            Self::System { system_id, .. } => (LinkKind::System, *system_id),
            Self::DataCategory {
                data_category_id, ..
            } => (LinkKind::DataCategory, *data_category_id),
            Self::Vendor { vendor_id, .. } => (LinkKind::Vendor, *vendor_id),
            Self::RetentionPolicy {
                retention_policy_id,
            } => (LinkKind::RetentionPolicy, *retention_policy_id),
            Self::DataFlow { data_flow_id } => (LinkKind::DataFlow, *data_flow_id),
        }
    }
}

/// A linked system and its role.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedSystem {
    /// The system.
    #[serde(flatten)]
    pub system: systems::Model,
    /// Role in the activity.
    pub role: String,
}

/// A linked data category and its justification.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedDataCategory {
    /// The category.
    #[serde(flatten)]
    pub category: data_categories::Model,
    /// Why it is needed.
    pub justification: Option<String>,
}

/// A linked vendor and its role.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedVendor {
    /// The vendor.
    #[serde(flatten)]
    pub vendor: vendors::Model,
    /// Role in the activity.
    pub role: String,
    /// A contract is required.
    pub contract_required: bool,
}

/// An activity with its live linked records.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityDetails {
    /// The activity row.
    #[serde(flatten)]
    pub activity: processing_activities::Model,
    /// Linked systems.
    pub systems: Vec<LinkedSystem>,
    /// Linked data categories.
    pub data_categories: Vec<LinkedDataCategory>,
    /// Linked vendors.
    pub vendors: Vec<LinkedVendor>,
    /// Linked retention policies.
    pub retention_policies: Vec<retention_policies::Model>,
    /// Linked data flows.
    pub data_flows: Vec<data_flows::Model>,
}

/// Processing activity repository.
#[derive(Debug, Clone)]
pub struct ProcessingActivityRepository {
    db: DatabaseConnection,
    scope: TenantScope,
}

impl ProcessingActivityRepository {
    /// Creates a new processing activity repository for a workspace.
    #[must_use]
    pub const fn new(db: DatabaseConnection, scope: TenantScope) -> Self {
        Self { db, scope }
    }

    /// Creates a processing activity.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or the name is taken.
    pub async fn create(
        &self,
        input: CreateActivityInput,
    ) -> Result<processing_activities::Model, ActivityRepoError> {
        let validated = ProcessingActivityService::validate(&ActivityDraft {
            name: &input.name,
            description: input.description.as_deref(),
            purpose: &input.purpose,
            lawful_basis: &input.lawful_basis,
            legitimate_interest_assessment: input.legitimate_interest_assessment.as_deref(),
            status: &input.status,
            data_subject_types: &input.data_subject_types,
            last_reviewed_at: input.last_reviewed_at,
            next_review_date: input.next_review_date,
        })?;
        self.ensure_unique_name(&validated.name, None).await?;

        let now = Utc::now();
        let activity = processing_activities::ActiveModel {
            id: Set(Uuid::now_v7()),
            tenant_id: Set(self.scope.tenant()),
            workspace_id: Set(self.scope.workspace()),
            name: Set(validated.name),
            description: Set(validated.description),
            purpose: Set(validated.purpose),
            lawful_basis: Set(validated.lawful_basis.as_str().to_string()),
            legitimate_interest_assessment: Set(validated.legitimate_interest_assessment),
            data_subject_types: Set(Value::from(validated.data_subject_types)),
            status: Set(validated.status.as_str().to_string()),
            requires_dpia: Set(input.requires_dpia),
            dpo_review_required: Set(input.dpo_review_required),
            dpo_reviewed_at: Set(input.dpo_reviewed_at),
            last_reviewed_at: Set(input.last_reviewed_at),
            next_review_date: Set(input.next_review_date),
            created_at: Set(now),
            created_by: Set(self.scope.user()),
            updated_at: Set(now),
            updated_by: Set(self.scope.user()),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await?;

        info!(
            activity_id = %activity.id,
            name = %activity.name,
            lawful_basis = %activity.lawful_basis,
            "Processing activity created"
        );
        Ok(activity)
    }

    /// Lists live activities, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: ActivityFilter,
        page: PageRequest,
    ) -> Result<PageResponse<processing_activities::Model>, ActivityRepoError> {
        let mut query = processing_activities::Entity::live(&self.scope)
            .order_by_asc(processing_activities::Column::Name);

        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(
                Condition::any()
                    .add(processing_activities::Column::Name.contains(search))
                    .add(processing_activities::Column::Purpose.contains(search)),
            );
        }
        if let Some(status) = filter.status {
            query = query.filter(processing_activities::Column::Status.eq(status.as_str()));
        }
        if let Some(basis) = filter.lawful_basis {
            query = query.filter(processing_activities::Column::LawfulBasis.eq(basis.as_str()));
        }
        if let Some(ids) = filter.ids {
            query = query.filter(processing_activities::Column::Id.is_in(ids));
        }

        Ok(fetch_page(query, &self.db, page).await?)
    }

    /// Finds a live activity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<processing_activities::Model>, ActivityRepoError> {
        Ok(processing_activities::Entity::live(&self.scope)
            .filter(processing_activities::Column::Id.eq(id))
            .one(&self.db)
            .await?)
    }

    /// Finds an activity together with every live linked record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_links(
        &self,
        id: Uuid,
    ) -> Result<Option<ActivityDetails>, ActivityRepoError> {
        let Some(activity) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let systems = activity_systems::Entity::in_scope(&self.scope)
            .filter(activity_systems::Column::ActivityId.eq(id))
            .find_also_related(systems::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(link, system)| {
                let system = system.filter(|s| s.deleted_at.is_none())?;
                Some(LinkedSystem {
                    system,
                    role: link.role,
                })
            })
            .collect();

        let data_categories = activity_data_categories::Entity::in_scope(&self.scope)
            .filter(activity_data_categories::Column::ActivityId.eq(id))
            .find_also_related(data_categories::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(link, category)| {
                let category = category.filter(|c| c.deleted_at.is_none())?;
                Some(LinkedDataCategory {
                    category,
                    justification: link.justification,
                })
            })
            .collect();

        let vendors = activity_vendors::Entity::in_scope(&self.scope)
            .filter(activity_vendors::Column::ActivityId.eq(id))
            .find_also_related(vendors::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(link, vendor)| {
                let vendor = vendor.filter(|v| v.deleted_at.is_none())?;
                Some(LinkedVendor {
                    vendor,
                    role: link.role,
                    contract_required: link.contract_required,
                })
            })
            .collect();

        let retention_policies = activity_retention_policies::Entity::in_scope(&self.scope)
            .filter(activity_retention_policies::Column::ActivityId.eq(id))
            .find_also_related(retention_policies::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(_, policy)| policy.filter(|p| p.deleted_at.is_none()))
            .collect();

        let data_flows = activity_data_flows::Entity::in_scope(&self.scope)
            .filter(activity_data_flows::Column::ActivityId.eq(id))
            .find_also_related(data_flows::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(_, flow)| flow.filter(|f| f.deleted_at.is_none()))
            .collect();

        Ok(Some(ActivityDetails {
            activity,
            systems,
            data_categories,
            vendors,
            retention_policies,
            data_flows,
        }))
    }

    /// Updates an activity.
    ///
    /// # Errors
    ///
    /// Returns an error if the activity is missing, the merged fields fail
    /// validation or the new name is taken.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateActivityInput,
    ) -> Result<processing_activities::Model, ActivityRepoError> {
        let activity = self
            .find_by_id(id)
            .await?
            .ok_or(ActivityRepoError::NotFound(id))?;

        let name = input.name.unwrap_or_else(|| activity.name.clone());
        let description = input.description.unwrap_or_else(|| activity.description.clone());
        let purpose = input.purpose.unwrap_or_else(|| activity.purpose.clone());
        let lawful_basis = input
            .lawful_basis
            .unwrap_or_else(|| activity.lawful_basis.clone());
        let assessment = input
            .legitimate_interest_assessment
            .unwrap_or_else(|| activity.legitimate_interest_assessment.clone());
        let status = input.status.unwrap_or_else(|| activity.status.clone());
        let data_subject_types = input
            .data_subject_types
            .unwrap_or_else(|| subject_types(&activity));
        let last_reviewed_at = input.last_reviewed_at.unwrap_or(activity.last_reviewed_at);
        let next_review_date = input.next_review_date.unwrap_or(activity.next_review_date);

        let validated = ProcessingActivityService::validate(&ActivityDraft {
            name: &name,
            description: description.as_deref(),
            purpose: &purpose,
            lawful_basis: &lawful_basis,
            legitimate_interest_assessment: assessment.as_deref(),
            status: &status,
            data_subject_types: &data_subject_types,
            last_reviewed_at,
            next_review_date,
        })?;
        if validated.name != activity.name {
            self.ensure_unique_name(&validated.name, Some(id)).await?;
        }

        let requires_dpia = input.requires_dpia.unwrap_or(activity.requires_dpia);
        let dpo_review_required = input
            .dpo_review_required
            .unwrap_or(activity.dpo_review_required);
        let dpo_reviewed_at = input.dpo_reviewed_at.unwrap_or(activity.dpo_reviewed_at);

        let mut active: processing_activities::ActiveModel = activity.into();
        active.name = Set(validated.name);
        active.description = Set(validated.description);
        active.purpose = Set(validated.purpose);
        active.lawful_basis = Set(validated.lawful_basis.as_str().to_string());
        active.legitimate_interest_assessment = Set(validated.legitimate_interest_assessment);
        active.data_subject_types = Set(Value::from(validated.data_subject_types));
        active.status = Set(validated.status.as_str().to_string());
        active.requires_dpia = Set(requires_dpia);
        active.dpo_review_required = Set(dpo_review_required);
        active.dpo_reviewed_at = Set(dpo_reviewed_at);
        active.last_reviewed_at = Set(last_reviewed_at);
        active.next_review_date = Set(next_review_date);
        active.updated_at = Set(Utc::now());
        active.updated_by = Set(self.scope.user());

        Ok(active.update(&self.db).await?)
    }

    /// Soft-deletes an activity. Link rows are kept.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if there is no live activity with this ID.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), ActivityRepoError> {
        let activity = self
            .find_by_id(id)
            .await?
            .ok_or(ActivityRepoError::NotFound(id))?;

        let now = Utc::now();
        let mut active: processing_activities::ActiveModel = activity.into();
        active.deleted_at = Set(Some(now));
        active.updated_at = Set(now);
        active.updated_by = Set(self.scope.user());
        active.update(&self.db).await?;

        info!(activity_id = %id, "Processing activity deleted");
        Ok(())
    }

    /// Links a record to an activity.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing activity, `TargetNotFound` when the
    /// record is not live, `AlreadyLinked` for an existing link and a
    /// validation error for an unknown role.
    pub async fn link(&self, activity_id: Uuid, link: NewActivityLink) -> Result<(), ActivityRepoError> {
        self.find_by_id(activity_id)
            .await?
            .ok_or(ActivityRepoError::NotFound(activity_id))?;

        let (kind, target_id) = link.target();
        if !self.target_exists(kind, target_id).await? {
            return Err(ActivityRepoError::TargetNotFound(kind, target_id));
        }
        if self.link_exists(kind, activity_id, target_id).await? {
            return Err(ActivityRepoError::AlreadyLinked(kind, target_id));
        }

        let tenant_id = Set(self.scope.tenant());
        let workspace_id = Set(self.scope.workspace());
        let created_at = Set(Utc::now());

        match link {
            NewActivityLink::System { system_id, role } => {
                let role: ActivitySystemRole = role.trim().parse()?;
                activity_systems::ActiveModel {
                    activity_id: Set(activity_id),
                    system_id: Set(system_id),
                    tenant_id,
                    workspace_id,
                    role: Set(role.as_str().to_string()),
                    created_at,
                }
                .insert(&self.db)
                .await?;
            }
            NewActivityLink::DataCategory {
                data_category_id,
                justification,
            } => {
                let justification =
                    optional_text("justification", justification.as_deref(), MAX_TEXT_LEN)?;
                activity_data_categories::ActiveModel {
                    activity_id: Set(activity_id),
                    data_category_id: Set(data_category_id),
                    tenant_id,
                    workspace_id,
                    justification: Set(justification),
                    created_at,
                }
                .insert(&self.db)
                .await?;
            }
            NewActivityLink::Vendor {
                vendor_id,
                role,
                contract_required,
            } => {
                let role: VendorRole = role.trim().parse()?;
                activity_vendors::ActiveModel {
                    activity_id: Set(activity_id),
                    vendor_id: Set(vendor_id),
                    tenant_id,
                    workspace_id,
                    role: Set(role.as_str().to_string()),
                    contract_required: Set(contract_required),
                    created_at,
                }
                .insert(&self.db)
                .await?;
            }
            NewActivityLink::RetentionPolicy {
                retention_policy_id,
            } => {
                activity_retention_policies::ActiveModel {
                    activity_id: Set(activity_id),
                    retention_policy_id: Set(retention_policy_id),
                    tenant_id,
                    workspace_id,
                    created_at,
                }
                .insert(&self.db)
                .await?;
            }
            NewActivityLink::DataFlow { data_flow_id } => {
                activity_data_flows::ActiveModel {
                    activity_id: Set(activity_id),
                    data_flow_id: Set(data_flow_id),
                    tenant_id,
                    workspace_id,
                    created_at,
                }
                .insert(&self.db)
                .await?;
            }
        }

        info!(activity_id = %activity_id, kind = %kind, target_id = %target_id, "Activity link added");
        Ok(())
    }

    /// Removes a link.
    ///
    /// # Errors
    ///
    /// Returns `LinkNotFound` if the activity and record are not linked.
    pub async fn unlink(
        &self,
        activity_id: Uuid,
        kind: LinkKind,
        target_id: Uuid,
    ) -> Result<(), ActivityRepoError> {
        let result = match kind {
            LinkKind::System => {
                activity_systems::Entity::delete_in_scope(&self.scope)
                    .filter(activity_systems::Column::ActivityId.eq(activity_id))
                    .filter(activity_systems::Column::SystemId.eq(target_id))
                    .exec(&self.db)
                    .await?
            }
            LinkKind::DataCategory => {
                activity_data_categories::Entity::delete_in_scope(&self.scope)
                    .filter(activity_data_categories::Column::ActivityId.eq(activity_id))
                    .filter(activity_data_categories::Column::DataCategoryId.eq(target_id))
                    .exec(&self.db)
                    .await?
            }
            LinkKind::Vendor => {
                activity_vendors::Entity::delete_in_scope(&self.scope)
                    .filter(activity_vendors::Column::ActivityId.eq(activity_id))
                    .filter(activity_vendors::Column::VendorId.eq(target_id))
                    .exec(&self.db)
                    .await?
            }
            LinkKind::RetentionPolicy => {
                activity_retention_policies::Entity::delete_in_scope(&self.scope)
                    .filter(activity_retention_policies::Column::ActivityId.eq(activity_id))
                    .filter(activity_retention_policies::Column::RetentionPolicyId.eq(target_id))
                    .exec(&self.db)
                    .await?
            }
            LinkKind::DataFlow => {
                activity_data_flows::Entity::delete_in_scope(&self.scope)
                    .filter(activity_data_flows::Column::ActivityId.eq(activity_id))
                    .filter(activity_data_flows::Column::DataFlowId.eq(target_id))
                    .exec(&self.db)
                    .await?
            }
        };

        if result.rows_affected == 0 {
            return Err(ActivityRepoError::LinkNotFound(kind, target_id));
        }

        info!(activity_id = %activity_id, kind = %kind, target_id = %target_id, "Activity link removed");
        Ok(())
    }

    /// Counts the inputs of the compliance score.
    ///
    /// Only live, non-archived activities count. A special category link is
    /// unjustified when it has no justification text.
    ///
    /// # Errors
    ///
    /// Returns an error if a count query fails.
    pub async fn compliance_counts(&self, today: NaiveDate) -> Result<ComplianceCounts, ActivityRepoError> {
        let total_activities = self.current_activities().count(&self.db).await?;

        let overdue_reviews = self
            .current_activities()
            .filter(processing_activities::Column::NextReviewDate.lt(today))
            .count(&self.db)
            .await?;

        let dpo_review_required = self
            .current_activities()
            .filter(processing_activities::Column::DpoReviewRequired.eq(true))
            .count(&self.db)
            .await?;

        let missing_dpo_reviews = self
            .current_activities()
            .filter(processing_activities::Column::DpoReviewRequired.eq(true))
            .filter(processing_activities::Column::DpoReviewedAt.is_null())
            .count(&self.db)
            .await?;

        let special_categories = data_categories::Entity::live(&self.scope)
            .select_only()
            .column(data_categories::Column::Id)
            .filter(data_categories::Column::CategoryType.eq(DataCategoryType::Special.as_str()))
            .into_query();
        let unjustified_special_category = activity_data_categories::Entity::in_scope(&self.scope)
            .filter(activity_data_categories::Column::Justification.is_null())
            .filter(
                activity_data_categories::Column::ActivityId.in_subquery(
                    self.current_activities()
                        .select_only()
                        .column(processing_activities::Column::Id)
                        .into_query(),
                ),
            )
            .filter(activity_data_categories::Column::DataCategoryId.in_subquery(special_categories))
            .count(&self.db)
            .await?;

        Ok(ComplianceCounts {
            total_activities,
            overdue_reviews,
            dpo_review_required,
            missing_dpo_reviews,
            unjustified_special_category,
        })
    }

    fn current_activities(&self) -> Select<processing_activities::Entity> {
        processing_activities::Entity::live(&self.scope).filter(
            processing_activities::Column::Status.ne(ProcessingStatus::Archived.as_str()),
        )
    }

    async fn target_exists(&self, kind: LinkKind, id: Uuid) -> Result<bool, DbErr> {
        let count = match kind {
            LinkKind::System => {
                systems::Entity::live(&self.scope)
                    .filter(systems::Column::Id.eq(id))
                    .count(&self.db)
                    .await?
            }
            LinkKind::DataCategory => {
                data_categories::Entity::live(&self.scope)
                    .filter(data_categories::Column::Id.eq(id))
                    .count(&self.db)
                    .await?
            }
            LinkKind::Vendor => {
                vendors::Entity::live(&self.scope)
                    .filter(vendors::Column::Id.eq(id))
                    .count(&self.db)
                    .await?
            }
            LinkKind::RetentionPolicy => {
                retention_policies::Entity::live(&self.scope)
                    .filter(retention_policies::Column::Id.eq(id))
                    .count(&self.db)
                    .await?
            }
            LinkKind::DataFlow => {
                data_flows::Entity::live(&self.scope)
                    .filter(data_flows::Column::Id.eq(id))
                    .count(&self.db)
                    .await?
            }
        };
        Ok(count > 0)
    }

    async fn link_exists(&self, kind: LinkKind, activity_id: Uuid, id: Uuid) -> Result<bool, DbErr> {
        let count = match kind {
            LinkKind::System => {
                activity_systems::Entity::in_scope(&self.scope)
                    .filter(activity_systems::Column::ActivityId.eq(activity_id))
                    .filter(activity_systems::Column::SystemId.eq(id))
                    .count(&self.db)
                    .await?
            }
            LinkKind::DataCategory => {
                activity_data_categories::Entity::in_scope(&self.scope)
                    .filter(activity_data_categories::Column::ActivityId.eq(activity_id))
                    .filter(activity_data_categories::Column::DataCategoryId.eq(id))
                    .count(&self.db)
                    .await?
            }
            LinkKind::Vendor => {
                activity_vendors::Entity::in_scope(&self.scope)
                    .filter(activity_vendors::Column::ActivityId.eq(activity_id))
                    .filter(activity_vendors::Column::VendorId.eq(id))
                    .count(&self.db)
                    .await?
            }
            LinkKind::RetentionPolicy => {
                activity_retention_policies::Entity::in_scope(&self.scope)
                    .filter(activity_retention_policies::Column::ActivityId.eq(activity_id))
                    .filter(activity_retention_policies::Column::RetentionPolicyId.eq(id))
                    .count(&self.db)
                    .await?
            }
            LinkKind::DataFlow => {
                activity_data_flows::Entity::in_scope(&self.scope)
                    .filter(activity_data_flows::Column::ActivityId.eq(activity_id))
                    .filter(activity_data_flows::Column::DataFlowId.eq(id))
                    .count(&self.db)
                    .await?
            }
        };
        Ok(count > 0)
    }

    async fn ensure_unique_name(
        &self,
        name: &str,
        exclude: Option<Uuid>,
    ) -> Result<(), ActivityRepoError> {
        let mut query = processing_activities::Entity::live(&self.scope)
            .filter(processing_activities::Column::Name.eq(name));
        if let Some(id) = exclude {
            query = query.filter(processing_activities::Column::Id.ne(id));
        }
        if query.count(&self.db).await? > 0 {
            return Err(ActivityRepoError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}

/// Stored subject types; entries that are not strings are skipped.
fn subject_types(activity: &processing_activities::Model) -> Vec<String> {
    activity
        .data_subject_types
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
