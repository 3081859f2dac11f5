//! The DPIA template document.
//!
//! Sections, field ids, field types and options come from the embedded
//! `template.json`; nothing here hard-codes the questionnaire.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::error::DpiaError;

const TEMPLATE_JSON: &str = include_str!("template.json");

static TEMPLATE: Lazy<Result<DpiaTemplate, String>> =
    Lazy::new(|| DpiaTemplate::from_json(TEMPLATE_JSON).map_err(|e| e.to_string()));

/// Input widget type of a template field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-line text.
    Text,
    /// Multi-line text.
    Textarea,
    /// One value out of `options`.
    Select,
    /// Any number of values out of `options`.
    Multiselect,
    /// Boolean.
    Checkbox,
    /// ISO-8601 calendar date.
    Date,
    /// JSON number.
    Number,
}

impl FieldType {
    /// Whether the field picks from a fixed option list.
    #[must_use]
    pub const fn has_options(self) -> bool {
        matches!(self, Self::Select | Self::Multiselect)
    }
}

/// A selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Stored value.
    pub value: String,
    /// Display label.
    pub label: String,
}

/// One question in a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateField {
    /// Answer key.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Widget type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Answer must be present and non-empty.
    #[serde(default)]
    pub required: bool,
    /// Options for select and multiselect fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    /// Message shown when the answer is rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_message: Option<String>,
}

impl TemplateField {
    /// Whether `value` is one of this field's options.
    #[must_use]
    pub fn allows(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// One wizard step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSection {
    /// Section key.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Guidance text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Questions in display order.
    pub fields: Vec<TemplateField>,
}

impl TemplateSection {
    /// Field by id.
    #[must_use]
    pub fn field(&self, id: &str) -> Option<&TemplateField> {
        self.fields.iter().find(|f| f.id == id)
    }
}

/// The whole questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DpiaTemplate {
    /// Template revision.
    pub version: String,
    /// Sections in wizard order.
    pub sections: Vec<TemplateSection>,
}

impl DpiaTemplate {
    /// The embedded template.
    ///
    /// # Errors
    ///
    /// Returns `DpiaError::Template` if the embedded document is malformed.
    pub fn embedded() -> Result<&'static Self, DpiaError> {
        TEMPLATE
            .as_ref()
            .map_err(|message| DpiaError::Template(message.clone()))
    }

    /// Parses and checks a template document.
    ///
    /// # Errors
    ///
    /// Returns `DpiaError::Template` for malformed JSON, an empty section
    /// list, duplicate section or field ids, or option fields without
    /// options.
    pub fn from_json(json: &str) -> Result<Self, DpiaError> {
        let template: Self =
            serde_json::from_str(json).map_err(|e| DpiaError::Template(e.to_string()))?;
        template.check()?;
        Ok(template)
    }

    fn check(&self) -> Result<(), DpiaError> {
        if self.sections.is_empty() {
            return Err(DpiaError::Template("no sections".to_string()));
        }

        let mut section_ids = HashSet::new();
        for section in &self.sections {
            if !section_ids.insert(section.id.as_str()) {
                return Err(DpiaError::Template(format!(
                    "duplicate section '{}'",
                    section.id
                )));
            }

            let mut field_ids = HashSet::new();
            for field in &section.fields {
                if !field_ids.insert(field.id.as_str()) {
                    return Err(DpiaError::Template(format!(
                        "duplicate field '{}' in section '{}'",
                        field.id, section.id
                    )));
                }
                if field.field_type.has_options() && field.options.is_empty() {
                    return Err(DpiaError::Template(format!(
                        "field '{}' needs options",
                        field.id
                    )));
                }
            }
        }
        Ok(())
    }

    /// Section by id.
    #[must_use]
    pub fn section(&self, id: &str) -> Option<&TemplateSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Position of a section in wizard order.
    #[must_use]
    pub fn section_index(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    /// Section ids in wizard order.
    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_template_has_four_sections() {
        let template = DpiaTemplate::embedded().unwrap();
        let ids: Vec<&str> = template.section_ids().collect();
        assert_eq!(
            ids,
            vec![
                "processing_description",
                "necessity_proportionality",
                "risk_assessment",
                "mitigation_measures",
            ]
        );
    }

    #[test]
    fn test_lookup() {
        let template = DpiaTemplate::embedded().unwrap();
        assert_eq!(template.section_index("risk_assessment"), Some(2));
        let field = template
            .section("risk_assessment")
            .and_then(|s| s.field("likelihood"))
            .unwrap();
        assert_eq!(field.field_type, FieldType::Select);
        assert!(field.allows("probable"));
        assert!(!field.allows("certain"));
    }

    #[test]
    fn test_duplicate_section_rejected() {
        let json = r#"{"version":"x","sections":[
            {"id":"a","title":"A","fields":[]},
            {"id":"a","title":"B","fields":[]}
        ]}"#;
        assert!(matches!(
            DpiaTemplate::from_json(json),
            Err(DpiaError::Template(_))
        ));
    }

    #[test]
    fn test_select_without_options_rejected() {
        let json = r#"{"version":"x","sections":[
            {"id":"a","title":"A","fields":[{"id":"f","label":"F","type":"select"}]}
        ]}"#;
        assert!(matches!(
            DpiaTemplate::from_json(json),
            Err(DpiaError::Template(_))
        ));
    }

    #[test]
    fn test_unknown_field_type_rejected() {
        let json = r#"{"version":"x","sections":[
            {"id":"a","title":"A","fields":[{"id":"f","label":"F","type":"slider"}]}
        ]}"#;
        assert!(DpiaTemplate::from_json(json).is_err());
    }
}
