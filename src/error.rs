//! Error types shared across the section tree and the drafting workflow.
//!
//! Construction-time problems surface as [`ValidationError`], structural lookups as
//! [`LookupError`]. Failures from the external collaborators stay distinguishable:
//! converting a source file yields [`ConversionError`], authoring a section yields
//! [`GenerationError`].

use std::error::Error as StdError;
use std::io;
use thiserror::Error;

/// Boxed error returned by injected collaborators.
pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error, PartialEq, Eq)]
/// Raised eagerly when a tree or template is constructed in an invalid state.
pub enum ValidationError {
    /// Two children of the same parent share a title.
    #[error("subsections of `{parent}` do not have unique titles: duplicate `{title}`")]
    DuplicateSiblingTitle {
        /// Title of the parent whose children collide.
        parent: String,
        /// The repeated child title.
        title: String,
    },

    /// A template declared no generation instructions.
    #[error(
        "template `{0}` has no section instructions; at least one is required or the document is static"
    )]
    NoInstructions(String),

    /// Two instructions target the same section.
    #[error("template has duplicate section instructions for section {0:?}")]
    DuplicateTarget(Vec<usize>),

    /// An instruction targets a section the template does not contain.
    #[error("template has instructions for section {path:?}, which is not a valid section; sections are {available:?}")]
    UnresolvedTarget {
        /// The offending target path.
        path: Vec<usize>,
        /// Every path the template does contain.
        available: Vec<Vec<usize>>,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
/// Raised when a positional path does not address an existing node.
pub enum LookupError {
    /// A path element indexes past the end of its node's children.
    #[error("section path {path:?} is out of range: index {index} at depth {depth} but only {len} children")]
    OutOfRange {
        /// The full path that was requested.
        path: Vec<usize>,
        /// Position within `path` where the lookup failed.
        depth: usize,
        /// The index that was out of bounds.
        index: usize,
        /// Number of children available at that depth.
        len: usize,
    },
}

#[derive(Debug, Error)]
/// Raised while turning a source file into markdown text.
pub enum ConversionError {
    /// No converter handles the file's extension.
    #[error("file type `{0}` is currently unsupported")]
    UnsupportedFormat(String),

    /// The source file could not be read.
    #[error("failed to read source file: {0}")]
    Io(#[from] io::Error),

    /// The external converter reported a failure.
    #[error("conversion of `{file}` failed: {source}")]
    Converter {
        /// Name of the file being converted.
        file: String,
        /// Underlying converter error.
        source: BoxError,
    },
}

#[derive(Debug, Error)]
/// Raised while authoring the sections of a new document.
pub enum GenerationError {
    /// An instruction references a source document that was not supplied.
    #[error("source document `{0}` was not supplied")]
    UnknownSource(String),

    /// The selector could not pick a section.
    #[error("section selection for `{target}` failed: {source}")]
    Selection {
        /// Label that was being matched.
        target: String,
        /// Underlying selector error.
        source: BoxError,
    },

    /// The selector picked a name that the source document does not contain.
    #[error("selected section `{selected}` for `{target}` does not exist in `{source_name}`")]
    SelectedSectionMissing {
        /// Label that was being matched.
        target: String,
        /// Name returned by the selector.
        selected: String,
        /// Source document that was searched.
        source_name: String,
    },

    /// The authorer failed to produce text.
    #[error("authoring section {path:?} failed: {source}")]
    Authoring {
        /// Target path of the instruction.
        path: Vec<usize>,
        /// Underlying authorer error.
        source: BoxError,
    },

    /// The generated text could not be written back into the document.
    #[error(transparent)]
    Lookup(#[from] LookupError),
}

#[derive(Debug, Error)]
/// Raised by the on-disk cache of preprocessed sources.
pub enum CacheError {
    /// Reading or writing a cache record failed.
    #[error("cache i/o failed: {0}")]
    Io(#[from] io::Error),

    /// A cache record was not a valid section record.
    #[error("cache record is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Parsing the source on a cache miss failed.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
