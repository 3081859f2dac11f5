//! Processing activities (Article 30 records) and compliance scoring.

pub mod error;
pub mod scoring;
pub mod service;
pub mod types;

pub use error::ActivityError;
pub use scoring::{MAX_SCORE, compliance_score};
pub use service::ProcessingActivityService;
pub use types::{
    ActivityDraft, ComplianceCounts, ComplianceRating, ComplianceSummary, ComplianceWeights,
    ValidatedActivity,
};
