//! Section representation for heading-structured documents.
//!
//! A section is one node of a strictly ordered tree: a heading title, the text that appears
//! directly under that heading, and its nested subsections. The root's title is the document
//! title and is never rendered as a heading. An empty title marks a placeholder inserted for a
//! skipped heading level.
//!
//! Sections are addressed two ways: by position (a path of child indices) for templates, and by
//! qualified name (ancestor titles joined with [`NAME_SEPARATOR`]) for matching against source
//! documents whose headings are not known in advance.

use crate::error::{LookupError, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Joins ancestor titles into a qualified section name.
pub const NAME_SEPARATOR: char = '\\';

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Hierarchical document division holding a heading, its body text and its subsections.
pub struct Section {
    title: String,
    body_text: String,
    children: Vec<Section>,
}

impl Section {
    /// Build a section, rejecting any subtree in which sibling titles collide.
    ///
    /// The whole subtree is checked, since parsed or deserialized children are unvalidated.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::DuplicateSiblingTitle`] if two siblings anywhere below the new
    /// node share a title.
    pub fn new(
        title: impl Into<String>,
        body_text: impl Into<String>,
        children: Vec<Section>,
    ) -> Result<Self, ValidationError> {
        let section = Self {
            title: title.into(),
            body_text: body_text.into(),
            children,
        };
        section.validate()?;
        Ok(section)
    }

    #[must_use]
    /// Build a section with no subsections.
    pub fn leaf(title: impl Into<String>, body_text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body_text: body_text.into(),
            children: Vec::new(),
        }
    }

    /// Assemble a node without checking sibling titles.
    ///
    /// Parsed documents are untrusted and may repeat a heading, so the parser builds through
    /// here rather than [`Section::new`].
    pub(crate) fn from_parts(title: String, body_text: String, children: Vec<Section>) -> Self {
        Self {
            title,
            body_text,
            children,
        }
    }

    #[must_use]
    /// Heading text, empty for skipped-level placeholders.
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    /// Literal text between this heading and its first subsection.
    pub fn body_text(&self) -> &str {
        &self.body_text
    }

    #[must_use]
    /// Nested subsections in document order.
    pub fn children(&self) -> &[Section] {
        &self.children
    }

    #[must_use]
    /// Whether this node was inserted to fill a skipped heading level.
    pub fn is_placeholder(&self) -> bool {
        self.title.is_empty()
    }

    /// Replace the body text of this node.
    pub fn set_body_text(&mut self, body_text: impl Into<String>) {
        self.body_text = body_text.into();
    }

    /// Check the sibling-title invariant over the whole tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError::DuplicateSiblingTitle`] found in pre-order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.check_children()?;
        self.children.iter().try_for_each(Section::validate)
    }

    fn check_children(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for child in &self.children {
            if !seen.insert(child.title.as_str()) {
                return Err(ValidationError::DuplicateSiblingTitle {
                    parent: self.title.clone(),
                    title: child.title.clone(),
                });
            }
        }
        Ok(())
    }

    /// Walk `children[path[0]].children[path[1]]...` starting from this node.
    ///
    /// An empty path returns this node.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::OutOfRange`] if any index exceeds its node's children.
    pub fn find_by_path(&self, path: &[usize]) -> Result<&Section, LookupError> {
        let mut current = self;
        for (depth, &index) in path.iter().enumerate() {
            current = current
                .children
                .get(index)
                .ok_or_else(|| out_of_range(path, depth, index, current.children.len()))?;
        }
        Ok(current)
    }

    /// Mutable counterpart of [`Section::find_by_path`].
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::OutOfRange`] if any index exceeds its node's children.
    pub fn find_by_path_mut(&mut self, path: &[usize]) -> Result<&mut Section, LookupError> {
        let mut current = self;
        for (depth, &index) in path.iter().enumerate() {
            let len = current.children.len();
            current = current
                .children
                .get_mut(index)
                .ok_or_else(|| out_of_range(path, depth, index, len))?;
        }
        Ok(current)
    }

    /// Overwrite the body text of the node at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::OutOfRange`] if the path does not resolve.
    pub fn set_body_text_at(
        &mut self,
        path: &[usize],
        body_text: impl Into<String>,
    ) -> Result<(), LookupError> {
        self.find_by_path_mut(path)?.set_body_text(body_text);
        Ok(())
    }

    #[must_use]
    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    #[must_use]
    /// Every path in the tree in pre-order, starting with the empty root path.
    pub fn paths(&self) -> Vec<Vec<usize>> {
        let mut paths = Vec::new();
        self.collect_paths(&mut Vec::new(), &mut paths);
        paths
    }

    fn collect_paths(&self, current: &mut Vec<usize>, paths: &mut Vec<Vec<usize>>) {
        paths.push(current.clone());
        for (index, child) in self.children.iter().enumerate() {
            current.push(index);
            child.collect_paths(current, paths);
            current.pop();
        }
    }

    #[must_use]
    /// Qualified names of every descendant in pre-order, excluding this node itself.
    ///
    /// Placeholder titles contribute an empty segment, so a skipped level shows up as a doubled
    /// separator (`Third Section\\Skipped level`).
    pub fn qualified_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for child in &self.children {
            child.collect_names("", &mut names);
        }
        names
    }

    fn collect_names(&self, prefix: &str, names: &mut Vec<String>) {
        let name = format!("{prefix}{}", self.title);
        let child_prefix = format!("{name}{NAME_SEPARATOR}");
        names.push(name);
        for child in &self.children {
            child.collect_names(&child_prefix, names);
        }
    }

    #[must_use]
    /// Pairs each descendant's path with its qualified name, in pre-order.
    pub fn outline(&self) -> Vec<(Vec<usize>, String)> {
        self.paths()
            .into_iter()
            .skip(1)
            .zip(self.qualified_names())
            .collect()
    }

    #[must_use]
    /// Descend through children whose titles match successive segments of `name`.
    ///
    /// `name` is split on [`NAME_SEPARATOR`], so an empty name is a single empty segment that
    /// matches a top-level placeholder. `None` means no child matched, which callers treat as a
    /// cue to fall back to approximate matching.
    pub fn find_by_qualified_name(&self, name: &str) -> Option<&Section> {
        let segments: Vec<&str> = name.split(NAME_SEPARATOR).collect();
        self.find_by_name_segments(&segments)
    }

    #[must_use]
    /// Descend one level per segment, taking the first child with a matching title.
    ///
    /// No segments returns this node.
    pub fn find_by_name_segments(&self, segments: &[&str]) -> Option<&Section> {
        let mut current = self;
        for segment in segments {
            current = current.children.iter().find(|child| child.title == *segment)?;
        }
        Some(current)
    }
}

fn out_of_range(path: &[usize], depth: usize, index: usize, len: usize) -> LookupError {
    LookupError::OutOfRange {
        path: path.to_vec(),
        depth,
        index,
        len,
    }
}

#[cfg(test)]
#[path = "tests/section.rs"]
mod tests;
