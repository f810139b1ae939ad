//! Format trait and implementations for different document types.
//!
//! This module defines the `Format` trait which abstracts over the text syntax a section tree
//! is read from and written back to. Converters for binary formats (DOCX, PDF) live outside the
//! tree and hand their output to a `Format` as text.

pub mod markdown;

use crate::section::Section;

/// Reads a section tree from text and writes it back.
pub trait Format {
    /// Build a tree rooted at a section titled `title`. Never fails.
    fn parse(&self, title: &str, text: &str) -> Section;
    /// Render a tree so that parsing the result reproduces it.
    fn render(&self, section: &Section) -> String;
}
