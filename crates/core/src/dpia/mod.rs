//! Data Protection Impact Assessments (GDPR Art. 35).
//!
//! The questionnaire lives in `template.json`. [`validate_section`] checks
//! one section's answers against it and [`DpiaWizard`] sequences the
//! sections.

pub mod answers;
pub mod error;
pub mod template;
pub mod wizard;

pub use answers::{Answers, validate_section};
pub use error::DpiaError;
pub use template::{DpiaTemplate, FieldOption, FieldType, TemplateField, TemplateSection};
pub use wizard::DpiaWizard;
