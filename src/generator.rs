//! Document generation from a template and parsed source documents.
//!
//! The generator owns three injected collaborators: a converter that turns binary sources
//! into markdown, a selector that maps a requested section label onto the closest qualified
//! name in a source document, and an authorer that writes a section from excerpts. Each can be
//! a closure, which keeps tests deterministic.

use crate::config::Config;
use crate::edit_plan::EditPlan;
use crate::error::{BoxError, ConversionError, GenerationError};
use crate::formats::markdown::{parse_markdown, to_markdown};
use crate::section::Section;
use crate::template::{DocTemplate, SectionInstructions, SourceReference};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Converts a binary document (DOCX, PDF) into markdown text.
pub trait MarkdownConverter {
    /// Convert `bytes`, described by a lowercase extension such as `docx` or `pdf`.
    ///
    /// # Errors
    ///
    /// Returns the converter's own error when conversion fails.
    fn to_markdown(&self, bytes: &[u8], format_hint: &str) -> Result<String, BoxError>;
}

/// Picks which of a source document's qualified names best matches a requested label.
pub trait SectionSelector {
    /// Return one of `names` (or a close variant) for `section_title`.
    ///
    /// # Errors
    ///
    /// Returns the selector's own error when no choice could be made.
    fn select(&self, section_title: &str, names: &[String]) -> Result<String, BoxError>;
}

/// Writes the body of one section from source excerpts.
pub trait SectionAuthorer {
    /// Produce markdown for a section given its context.
    ///
    /// # Errors
    ///
    /// Returns the authorer's own error when generation fails.
    fn author(&self, context: &[SourceContext]) -> Result<String, BoxError>;
}

impl<F> MarkdownConverter for F
where
    F: Fn(&[u8], &str) -> Result<String, BoxError>,
{
    fn to_markdown(&self, bytes: &[u8], format_hint: &str) -> Result<String, BoxError> {
        self(bytes, format_hint)
    }
}

impl<F> SectionSelector for F
where
    F: Fn(&str, &[String]) -> Result<String, BoxError>,
{
    fn select(&self, section_title: &str, names: &[String]) -> Result<String, BoxError> {
        self(section_title, names)
    }
}

impl<F> SectionAuthorer for F
where
    F: Fn(&[SourceContext]) -> Result<String, BoxError>,
{
    fn author(&self, context: &[SourceContext]) -> Result<String, BoxError> {
        self(context)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// An uploaded source document awaiting parsing.
pub struct SourceFile {
    /// Key used by template instructions to reference this source.
    pub name: String,
    /// Name the file was uploaded with; its extension selects the converter.
    pub original_filename: String,
    /// Local copy of the file contents.
    pub path: PathBuf,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// An extracted excerpt of a source document added to an authoring context.
pub struct SourceContext {
    /// Source document the excerpt came from.
    pub source_file_name: String,
    /// Requested section label, `None` for the whole document.
    pub section_title: Option<String>,
    /// The excerpt rendered as markdown.
    pub markdown: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Result of a generation run.
pub struct GeneratedDoc {
    /// The filled-in template rendered as markdown.
    pub markdown: String,
    /// Summary of what changed relative to a previous version, if any.
    pub explanation_of_changes: String,
    /// The section fills that produced `markdown`.
    pub edits: EditPlan,
}

/// Generates documents by filling template sections from source excerpts.
pub struct DocGenerator {
    name: String,
    version: String,
    markdown_extensions: Vec<String>,
    converter: Box<dyn MarkdownConverter>,
    selector: Box<dyn SectionSelector>,
    authorer: Box<dyn SectionAuthorer>,
}

impl DocGenerator {
    #[must_use]
    /// Build a generator identified and configured by `config`.
    pub fn new(
        config: &Config,
        converter: impl MarkdownConverter + 'static,
        selector: impl SectionSelector + 'static,
        authorer: impl SectionAuthorer + 'static,
    ) -> Self {
        Self {
            name: config.generator_name.clone(),
            version: config.generator_version.clone(),
            markdown_extensions: config.markdown_extensions.clone(),
            converter: Box::new(converter),
            selector: Box::new(selector),
            authorer: Box::new(authorer),
        }
    }

    #[must_use]
    /// Generator name, part of the cache key for preprocessed sources.
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    /// Version tag; cached sources parsed under another tag are parsed again.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Convert and parse a source file into a section tree titled with its name.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError`] if the extension is unsupported, the file cannot be read,
    /// or the converter fails. Markdown sources that are not valid UTF-8 are decoded lossily.
    pub fn parse_source_file(&self, source_file: &SourceFile) -> Result<Section, ConversionError> {
        let extension = Path::new(&source_file.original_filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let markdown = if self.markdown_extensions.contains(&extension) {
            let bytes = fs::read(&source_file.path)?;
            match String::from_utf8(bytes) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(
                        source = %source_file.name,
                        "source is not valid UTF-8, replacing invalid bytes"
                    );
                    String::from_utf8_lossy(e.as_bytes()).into_owned()
                }
            }
        } else if matches!(extension.as_str(), "docx" | "pdf") {
            let bytes = fs::read(&source_file.path)?;
            self.converter
                .to_markdown(&bytes, &extension)
                .map_err(|source| ConversionError::Converter {
                    file: source_file.original_filename.clone(),
                    source,
                })?
        } else {
            return Err(ConversionError::UnsupportedFormat(format!(".{extension}")));
        };

        let section = parse_markdown(&source_file.name, &markdown);
        tracing::info!(
            source = %source_file.name,
            sections = section.descendant_count(),
            "parsed source file"
        );
        Ok(section)
    }

    /// Generate a new document from the template and parsed sources.
    ///
    /// The template's parsed tree is cloned, so the template itself is never modified.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if a source is missing, section selection or authoring
    /// fails, or a selected section does not exist.
    pub fn generate(
        &self,
        doc_template: &DocTemplate,
        source_files: &HashMap<String, Section>,
    ) -> Result<GeneratedDoc, GenerationError> {
        let mut edits = EditPlan::default();
        for instructions in doc_template.section_instructions() {
            let body_text = self.generate_section(instructions, source_files)?;
            let item_name = doc_template
                .parsed_doc()
                .find_by_path(&instructions.section_path)?
                .title()
                .to_string();
            edits.push(instructions.section_path.clone(), body_text, item_name);
        }

        let mut new_doc = doc_template.parsed_doc().clone();
        edits.apply(&mut new_doc)?;
        let markdown = to_markdown(&new_doc);
        tracing::debug!(template = %doc_template.title(), "generated:\n{markdown}");

        Ok(GeneratedDoc {
            markdown,
            explanation_of_changes: String::new(),
            edits,
        })
    }

    fn generate_section(
        &self,
        instructions: &SectionInstructions,
        source_files: &HashMap<String, Section>,
    ) -> Result<String, GenerationError> {
        let context = self.create_context(&instructions.source_sections, source_files)?;
        let text = self
            .authorer
            .author(&context)
            .map_err(|source| GenerationError::Authoring {
                path: instructions.section_path.clone(),
                source,
            })?;
        tracing::info!(path = ?instructions.section_path, "generated section");
        Ok(text + "\n")
    }

    fn create_context(
        &self,
        source_sections: &[SourceReference],
        source_files: &HashMap<String, Section>,
    ) -> Result<Vec<SourceContext>, GenerationError> {
        source_sections
            .iter()
            .map(|reference| {
                let source_file = source_files
                    .get(&reference.doc_name)
                    .ok_or_else(|| GenerationError::UnknownSource(reference.doc_name.clone()))?;
                let source_section = match &reference.section_name {
                    None => source_file,
                    Some(name) => {
                        self.find_source_section(&reference.doc_name, source_file, name)?
                    }
                };
                Ok(SourceContext {
                    source_file_name: reference.doc_name.clone(),
                    section_title: reference.section_name.clone(),
                    markdown: to_markdown(source_section),
                })
            })
            .collect()
    }

    /// Find the section of a source that best corresponds with `section_title`.
    fn find_source_section<'a>(
        &self,
        source_name: &str,
        source_file: &'a Section,
        section_title: &str,
    ) -> Result<&'a Section, GenerationError> {
        if let Some(section) = source_file.find_by_qualified_name(section_title) {
            return Ok(section);
        }

        let names = source_file.qualified_names();
        let selected = self
            .selector
            .select(section_title, &names)
            .map_err(|source| GenerationError::Selection {
                target: section_title.to_string(),
                source,
            })?;
        tracing::debug!("selected section {selected} for {section_title} from {names:?}");

        source_file
            .find_by_qualified_name(&selected)
            .ok_or_else(|| GenerationError::SelectedSectionMissing {
                target: section_title.to_string(),
                selected,
                source_name: source_name.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "tests/generator.rs"]
mod tests;
