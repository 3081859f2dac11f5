//! DPIA error types.

use thiserror::Error;

use crate::validation::FieldError;

/// DPIA template and wizard errors.
#[derive(Debug, Error)]
pub enum DpiaError {
    /// The template document could not be loaded.
    #[error("DPIA template is invalid: {0}")]
    Template(String),

    /// No section with this id in the template.
    #[error("Unknown DPIA section '{0}'")]
    UnknownSection(String),

    /// Section not yet reachable in the wizard.
    #[error("Section '{0}' is locked until the previous sections are completed")]
    SectionLocked(String),

    /// Answers were not a JSON object.
    #[error("Answers for section '{0}' must be a JSON object")]
    AnswersNotObject(String),

    /// One or more answers failed validation.
    #[error("Section '{section}' has {} invalid field(s)", errors.len())]
    InvalidAnswers {
        /// Section the answers belong to.
        section: String,
        /// One entry per failing field.
        errors: Vec<FieldError>,
    },
}
