//! The edit plan carries section fills from authoring to the document tree.
//!
//! Generated (or hand-written) text is collected as a serialisable list of body replacements,
//! each addressed by section path, and applied to a tree in one step. A plan either applies in
//! full or leaves the tree untouched.

use crate::error::LookupError;
use crate::section::Section;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
/// Serialisable collection of section fills for atomic application.
pub struct EditPlan {
    /// Individual body replacements, applied in order.
    pub edits: Vec<Edit>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// New body text for the section at a path.
pub struct Edit {
    /// Child indices from the root to the section being filled.
    pub section_path: Vec<usize>,
    /// Replacement body text, written verbatim.
    pub body_text: String,
    /// Section title for tracking and debugging edits.
    #[serde(default)]
    pub item_name: String,
}

impl EditPlan {
    /// Queue a body replacement.
    pub fn push(&mut self, section_path: Vec<usize>, body_text: String, item_name: String) {
        self.edits.push(Edit {
            section_path,
            body_text,
            item_name,
        });
    }

    /// Apply all edits in the plan to `section`.
    ///
    /// Every path is resolved before anything is written, so a stale path leaves the tree
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::OutOfRange`] for the first edit whose path does not resolve.
    pub fn apply(&self, section: &mut Section) -> Result<(), LookupError> {
        for edit in &self.edits {
            section.find_by_path(&edit.section_path)?;
        }
        for edit in &self.edits {
            section.set_body_text_at(&edit.section_path, edit.body_text.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/edit_plan.rs"]
mod tests;
