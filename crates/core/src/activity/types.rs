//! Processing activity domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::gdpr::{LawfulBasis, ProcessingStatus};
use dataguard_shared::ComplianceConfig;

/// Raw activity fields as submitted, before validation.
#[derive(Debug, Clone, Copy)]
pub struct ActivityDraft<'a> {
    /// Record name.
    pub name: &'a str,
    /// Description.
    pub description: Option<&'a str>,
    /// Purpose of processing.
    pub purpose: &'a str,
    /// Article 6 basis.
    pub lawful_basis: &'a str,
    /// Legitimate-interest assessment text.
    pub legitimate_interest_assessment: Option<&'a str>,
    /// Lifecycle status.
    pub status: &'a str,
    /// Kinds of data subjects (employees, customers, ...).
    pub data_subject_types: &'a [String],
    /// Last completed review.
    pub last_reviewed_at: Option<NaiveDate>,
    /// Next scheduled review.
    pub next_review_date: Option<NaiveDate>,
}

/// An activity draft that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedActivity {
    /// Trimmed name.
    pub name: String,
    /// Trimmed description.
    pub description: Option<String>,
    /// Trimmed purpose.
    pub purpose: String,
    /// Article 6 basis.
    pub lawful_basis: LawfulBasis,
    /// Present when the basis is legitimate interests.
    pub legitimate_interest_assessment: Option<String>,
    /// Lifecycle status.
    pub status: ProcessingStatus,
    /// Trimmed, de-duplicated subject types.
    pub data_subject_types: Vec<String>,
}

/// Counts feeding the compliance score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceCounts {
    /// Live, non-archived activities.
    pub total_activities: u64,
    /// Activities whose next review date has passed.
    pub overdue_reviews: u64,
    /// Activities requiring DPO review.
    pub dpo_review_required: u64,
    /// Activities requiring DPO review without one.
    pub missing_dpo_reviews: u64,
    /// Special category links without a justification.
    pub unjustified_special_category: u64,
}

/// Points subtracted per occurrence; loaded from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplianceWeights {
    /// Per overdue review.
    pub overdue_review: u32,
    /// Per missing DPO review.
    pub missing_dpo_review: u32,
    /// Per unjustified special category link.
    pub unjustified_special_category: u32,
}

impl Default for ComplianceWeights {
    fn default() -> Self {
        Self::from(&ComplianceConfig::default())
    }
}

impl From<&ComplianceConfig> for ComplianceWeights {
    fn from(config: &ComplianceConfig) -> Self {
        Self {
            overdue_review: config.overdue_review_weight,
            missing_dpo_review: config.missing_dpo_review_weight,
            unjustified_special_category: config.unjustified_special_category_weight,
        }
    }
}

/// Coarse rating derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceRating {
    /// Score of 80 or more.
    Good,
    /// Score of 50 to 79.
    Fair,
    /// Score below 50.
    Poor,
}

impl ComplianceRating {
    /// Rating for a score in `0..=100`.
    #[must_use]
    pub const fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Good,
            50..=79 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

/// Workspace-level compliance overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceSummary {
    /// Raw counts.
    #[serde(flatten)]
    pub counts: ComplianceCounts,
    /// Share of DPO-review-required activities that have been reviewed.
    pub dpo_review_coverage: Decimal,
    /// Score in `0..=100`.
    pub score: u8,
    /// Rating for the score.
    pub rating: ComplianceRating,
}
