//! Document templates: markdown with instructions for which sections get generated.
//!
//! A template is parsed once when it is built and every instruction is checked against the
//! parsed structure, so a malformed template never reaches the generation workflow.

use crate::error::ValidationError;
use crate::formats::markdown::parse_markdown;
use crate::section::Section;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Names a source document and, optionally, one of its sections.
pub struct SourceReference {
    /// Key of the source document among the supplied sources.
    pub doc_name: String,
    /// Qualified or approximate section name; `None` includes the whole document.
    #[serde(default)]
    pub section_name: Option<String>,
}

impl SourceReference {
    #[must_use]
    /// Reference a whole source document.
    pub fn whole(doc_name: impl Into<String>) -> Self {
        Self {
            doc_name: doc_name.into(),
            section_name: None,
        }
    }

    #[must_use]
    /// Reference a named section of a source document.
    pub fn section(doc_name: impl Into<String>, section_name: impl Into<String>) -> Self {
        Self {
            doc_name: doc_name.into(),
            section_name: Some(section_name.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// How one section of the template is generated.
pub struct SectionInstructions {
    /// Child indices from the template root to the section whose body is generated.
    pub section_path: Vec<usize>,
    /// Source excerpts handed to the authorer as context.
    #[serde(default)]
    pub source_sections: Vec<SourceReference>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TemplateRecord")]
/// Validated template together with its parsed section tree.
pub struct DocTemplate {
    title: String,
    template_text: String,
    section_instructions: Vec<SectionInstructions>,
    #[serde(skip)]
    parsed_doc: Section,
}

/// Unvalidated wire form of a template.
#[derive(Deserialize)]
struct TemplateRecord {
    title: String,
    template_text: String,
    section_instructions: Vec<SectionInstructions>,
}

impl TryFrom<TemplateRecord> for DocTemplate {
    type Error = ValidationError;

    fn try_from(record: TemplateRecord) -> Result<Self, Self::Error> {
        Self::new(
            record.title,
            record.template_text,
            record.section_instructions,
        )
    }
}

impl DocTemplate {
    /// Parse `template_text` and check every instruction against it.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if there are no instructions, if two instructions target
    /// the same section, or if a target path does not exist in the parsed template.
    pub fn new(
        title: impl Into<String>,
        template_text: impl Into<String>,
        section_instructions: Vec<SectionInstructions>,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        let template_text = template_text.into();

        if section_instructions.is_empty() {
            return Err(ValidationError::NoInstructions(title));
        }

        let mut seen = HashSet::new();
        for instruction in &section_instructions {
            if !seen.insert(instruction.section_path.as_slice()) {
                return Err(ValidationError::DuplicateTarget(
                    instruction.section_path.clone(),
                ));
            }
        }

        let parsed_doc = parse_markdown(&title, &template_text);
        for instruction in &section_instructions {
            if parsed_doc.find_by_path(&instruction.section_path).is_err() {
                return Err(ValidationError::UnresolvedTarget {
                    path: instruction.section_path.clone(),
                    available: parsed_doc.paths(),
                });
            }
        }

        Ok(Self {
            title,
            template_text,
            section_instructions,
            parsed_doc,
        })
    }

    #[must_use]
    /// Document title, used as the root section's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    /// The raw template markdown.
    pub fn template_text(&self) -> &str {
        &self.template_text
    }

    #[must_use]
    /// Instructions in the order they are executed.
    pub fn section_instructions(&self) -> &[SectionInstructions] {
        &self.section_instructions
    }

    #[must_use]
    /// The template parsed into sections. Generation works on a clone of this tree.
    pub fn parsed_doc(&self) -> &Section {
        &self.parsed_doc
    }
}

#[cfg(test)]
#[path = "tests/template.rs"]
mod tests;
