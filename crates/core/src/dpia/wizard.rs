//! The four-step DPIA wizard.

use serde_json::Value;

use super::answers::{Answers, validate_section};
use super::error::DpiaError;
use super::template::DpiaTemplate;
use crate::gdpr::DpiaStatus;

/// Wizard state over a template.
///
/// A section is reachable when it is already completed or is the first
/// incomplete one in template order. Completing a section moves to the next
/// incomplete section.
#[derive(Debug, Clone)]
pub struct DpiaWizard<'t> {
    template: &'t DpiaTemplate,
    current: usize,
    completed: Vec<bool>,
    section_data: Answers,
}

impl<'t> DpiaWizard<'t> {
    /// Fresh wizard at the first section.
    #[must_use]
    pub fn new(template: &'t DpiaTemplate) -> Self {
        Self {
            template,
            current: 0,
            completed: vec![false; template.sections.len()],
            section_data: Answers::new(),
        }
    }

    /// Rebuilds a wizard from stored state.
    ///
    /// Completed ids unknown to the template are ignored; an unknown
    /// current section falls back to the first incomplete one.
    #[must_use]
    pub fn restore(
        template: &'t DpiaTemplate,
        current_section: &str,
        completed_sections: &[String],
        section_data: Answers,
    ) -> Self {
        let mut wizard = Self::new(template);
        for id in completed_sections {
            if let Some(index) = template.section_index(id) {
                wizard.completed[index] = true;
            }
        }
        let current = template
            .section_index(current_section)
            .filter(|&index| wizard.is_reachable(index))
            .unwrap_or_else(|| wizard.first_incomplete().unwrap_or(0));
        wizard.current = current;
        wizard.section_data = section_data;
        wizard
    }

    /// Validates and stores answers for a section, marks it complete and
    /// advances.
    ///
    /// Resubmitting a completed section replaces its answers.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSection`, `SectionLocked`, `AnswersNotObject` or
    /// `InvalidAnswers`. The wizard is unchanged on error.
    pub fn submit_section(&mut self, section_id: &str, answers: &Value) -> Result<(), DpiaError> {
        let index = self.reachable_index(section_id)?;
        let Value::Object(answers) = answers else {
            return Err(DpiaError::AnswersNotObject(section_id.to_string()));
        };

        let cleaned = validate_section(&self.template.sections[index], answers)?;
        self.section_data
            .insert(section_id.to_string(), Value::Object(cleaned));
        self.completed[index] = true;
        self.current = self.next_incomplete_after(index).unwrap_or(index);
        Ok(())
    }

    /// Moves to a reachable section.
    ///
    /// # Errors
    ///
    /// Returns `UnknownSection` or `SectionLocked`.
    pub fn go_to(&mut self, section_id: &str) -> Result<(), DpiaError> {
        self.current = self.reachable_index(section_id)?;
        Ok(())
    }

    /// Completed share of sections, 0 to 100.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let total = self.completed.len();
        if total == 0 {
            return 0;
        }
        let done = self.completed.iter().filter(|&&c| c).count();
        u8::try_from(done * 100 / total).unwrap_or(100)
    }

    /// Draft until a section is done, completed once all are.
    #[must_use]
    pub fn status(&self) -> DpiaStatus {
        if self.is_complete() {
            DpiaStatus::Completed
        } else if self.completed.iter().any(|&c| c) {
            DpiaStatus::InProgress
        } else {
            DpiaStatus::Draft
        }
    }

    /// Every section completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.completed.is_empty() && self.completed.iter().all(|&c| c)
    }

    /// Id of the section currently shown.
    #[must_use]
    pub fn current_section(&self) -> &'t str {
        self.template.sections[self.current].id.as_str()
    }

    /// Completed section ids in template order.
    #[must_use]
    pub fn completed_sections(&self) -> Vec<String> {
        self.template
            .sections
            .iter()
            .zip(&self.completed)
            .filter(|(_, done)| **done)
            .map(|(section, _)| section.id.clone())
            .collect()
    }

    /// Stored answers keyed by section id.
    #[must_use]
    pub const fn section_data(&self) -> &Answers {
        &self.section_data
    }

    fn reachable_index(&self, section_id: &str) -> Result<usize, DpiaError> {
        let index = self
            .template
            .section_index(section_id)
            .ok_or_else(|| DpiaError::UnknownSection(section_id.to_string()))?;
        if self.is_reachable(index) {
            Ok(index)
        } else {
            Err(DpiaError::SectionLocked(section_id.to_string()))
        }
    }

    fn is_reachable(&self, index: usize) -> bool {
        self.completed[index] || self.first_incomplete() == Some(index)
    }

    fn first_incomplete(&self) -> Option<usize> {
        self.completed.iter().position(|&c| !c)
    }

    fn next_incomplete_after(&self, index: usize) -> Option<usize> {
        self.completed
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(_, done)| !**done)
            .map(|(i, _)| i)
            .or_else(|| self.first_incomplete())
    }
}
