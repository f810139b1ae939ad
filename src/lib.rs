//! snapdraft: section trees for template-driven document drafting.
//!
//! Documents are parsed from markdown into a tree of titled sections, addressed by position or
//! by qualified name, filled in section by section, and rendered back to the same text.

pub mod cache;
pub mod config;
pub mod edit_plan;
pub mod error;
pub mod formats;
pub mod generator;
pub mod section;
pub mod template;
