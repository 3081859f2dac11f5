//! Jurisdiction repository (global reference data, not tenant scoped).

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use crate::entities::jurisdictions;
use crate::reference::JurisdictionSeed;
use dataguard_core::context::{ContextError, normalize_country_code};
use dataguard_core::flow::JurisdictionFacts;
use dataguard_shared::AppError;
use dataguard_shared::types::JurisdictionId;

/// Error types for jurisdiction operations.
#[derive(Debug, thiserror::Error)]
pub enum JurisdictionError {
    /// Malformed country code.
    #[error(transparent)]
    InvalidCode(#[from] ContextError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<JurisdictionError> for AppError {
    fn from(err: JurisdictionError) -> Self {
        match err {
            JurisdictionError::InvalidCode(e) => Self::Validation(e.to_string()),
            JurisdictionError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Filter options for listing jurisdictions.
#[derive(Debug, Clone, Default)]
pub struct JurisdictionFilter {
    /// Substring of the code or either name.
    pub search: Option<String>,
    /// Only EU/EEA members (or only non-members).
    pub is_eu_eea: Option<bool>,
    /// Only jurisdictions with (or without) an adequacy decision.
    pub gdpr_adequacy: Option<bool>,
}

/// Converts a row into what the transfer rules need.
#[must_use]
pub const fn transfer_facts(model: &jurisdictions::Model) -> JurisdictionFacts {
    JurisdictionFacts {
        id: JurisdictionId::from_uuid(model.id),
        is_eu_eea: model.is_eu_eea,
        gdpr_adequacy: model.gdpr_adequacy,
    }
}

/// Jurisdiction repository.
#[derive(Debug, Clone)]
pub struct JurisdictionRepository {
    db: DatabaseConnection,
}

impl JurisdictionRepository {
    /// Creates a new jurisdiction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists jurisdictions ordered by English name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: JurisdictionFilter,
    ) -> Result<Vec<jurisdictions::Model>, JurisdictionError> {
        let mut query = jurisdictions::Entity::find().order_by_asc(jurisdictions::Column::NameEn);

        if let Some(search) = filter.search.as_deref().map(str::trim)
            && !search.is_empty()
        {
            query = query.filter(
                Condition::any()
                    .add(jurisdictions::Column::CountryCode.contains(search.to_ascii_uppercase()))
                    .add(jurisdictions::Column::NameEn.contains(search))
                    .add(jurisdictions::Column::NameLocal.contains(search)),
            );
        }
        if let Some(is_eu_eea) = filter.is_eu_eea {
            query = query.filter(jurisdictions::Column::IsEuEea.eq(is_eu_eea));
        }
        if let Some(adequacy) = filter.gdpr_adequacy {
            query = query.filter(jurisdictions::Column::GdprAdequacy.eq(adequacy));
        }

        Ok(query.all(&self.db).await?)
    }

    /// Finds a jurisdiction by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<jurisdictions::Model>, JurisdictionError> {
        Ok(jurisdictions::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// Finds a jurisdiction by ISO country code, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCode` for a malformed code.
    pub async fn find_by_code(
        &self,
        code: &str,
    ) -> Result<Option<jurisdictions::Model>, JurisdictionError> {
        let code = normalize_country_code(code)?;
        Ok(jurisdictions::Entity::find()
            .filter(jurisdictions::Column::CountryCode.eq(code))
            .one(&self.db)
            .await?)
    }

    /// Inserts missing jurisdictions and refreshes existing ones.
    ///
    /// Returns the number of rows inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if a seed code is malformed or a write fails.
    pub async fn upsert_defaults(&self, seeds: &[JurisdictionSeed]) -> Result<usize, JurisdictionError> {
        let now = chrono::Utc::now();
        let mut inserted = 0;

        for seed in seeds {
            let code = normalize_country_code(seed.country_code)?;
            let existing = jurisdictions::Entity::find()
                .filter(jurisdictions::Column::CountryCode.eq(code.as_str()))
                .one(&self.db)
                .await?;

            match existing {
                Some(model) => {
                    let mut active: jurisdictions::ActiveModel = model.into();
                    active.name_en = Set(seed.name_en.to_string());
                    active.name_local = Set(seed.name_local.to_string());
                    active.is_eu_eea = Set(seed.is_eu_eea);
                    active.gdpr_adequacy = Set(seed.gdpr_adequacy);
                    active.supervisory_authority = Set(seed.supervisory_authority.map(str::to_string));
                    active.updated_at = Set(now);
                    active.update(&self.db).await?;
                }
                None => {
                    jurisdictions::ActiveModel {
                        id: Set(Uuid::now_v7()),
                        country_code: Set(code),
                        name_en: Set(seed.name_en.to_string()),
                        name_local: Set(seed.name_local.to_string()),
                        is_eu_eea: Set(seed.is_eu_eea),
                        gdpr_adequacy: Set(seed.gdpr_adequacy),
                        supervisory_authority: Set(seed.supervisory_authority.map(str::to_string)),
                        created_at: Set(now),
                        updated_at: Set(now),
                    }
                    .insert(&self.db)
                    .await?;
                    inserted += 1;
                }
            }
        }

        info!(inserted, total = seeds.len(), "Jurisdictions upserted");
        Ok(inserted)
    }
}
