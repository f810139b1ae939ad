//! On-disk cache of preprocessed source documents.
//!
//! Converting and parsing a source file is the slow step of a generation run, so parsed trees
//! are stored as JSON records tagged with the generator's name and version. A record written by
//! a different generator version counts as a miss and is replaced on the next parse.

use crate::error::CacheError;
use crate::generator::{DocGenerator, SourceFile};
use crate::section::Section;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fs, io};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// A parsed source tree together with the generator identity that produced it.
pub struct CachedSource {
    /// Key of the source document.
    pub source_name: String,
    /// Generator that parsed the source.
    pub generator_name: String,
    /// Version tag of that generator.
    pub generator_version: String,
    /// The parsed tree.
    pub section: Section,
}

/// Directory of cached source records for one generator version.
pub struct SourceCache {
    dir: PathBuf,
    generator_name: String,
    generator_version: String,
}

impl SourceCache {
    #[must_use]
    /// Cache in `dir` for records produced by `generator`.
    pub fn new(dir: impl Into<PathBuf>, generator: &DocGenerator) -> Self {
        Self {
            dir: dir.into(),
            generator_name: generator.name().to_string(),
            generator_version: generator.version().to_string(),
        }
    }

    fn record_path(&self, source_name: &str) -> PathBuf {
        let generator = escape_key(&self.generator_name);
        let source = escape_key(source_name);
        self.dir.join(format!("{generator}-{source}.json"))
    }

    #[must_use]
    /// Directory holding the records.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Look up the parsed tree for `source_name`.
    ///
    /// Returns `None` when there is no record for this source or it was written by another
    /// generator version.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the record cannot be read or is not valid JSON.
    pub fn get(&self, source_name: &str) -> Result<Option<Section>, CacheError> {
        let path = self.record_path(source_name);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: CachedSource = serde_json::from_str(&contents)?;
        if record.source_name != source_name {
            tracing::warn!(
                source = source_name,
                cached = %record.source_name,
                "cache record belongs to another source"
            );
            return Ok(None);
        }
        if record.generator_name != self.generator_name
            || record.generator_version != self.generator_version
        {
            tracing::debug!(
                source = source_name,
                cached = %record.generator_version,
                current = %self.generator_version,
                "cached source is stale"
            );
            return Ok(None);
        }
        Ok(Some(record.section))
    }

    /// Store the parsed tree for `source_name`, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the record cannot be written.
    pub fn put(&self, source_name: &str, section: &Section) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let record = CachedSource {
            source_name: source_name.to_string(),
            generator_name: self.generator_name.clone(),
            generator_version: self.generator_version.clone(),
            section: section.clone(),
        };
        let json = serde_json::to_string(&record)?;
        fs::write(self.record_path(source_name), json)?;
        Ok(())
    }

    /// Return the cached tree for `source_file`, parsing and storing it on a miss.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the cache cannot be read or written, or parsing fails.
    pub fn get_or_parse(
        &self,
        generator: &DocGenerator,
        source_file: &SourceFile,
    ) -> Result<Section, CacheError> {
        if let Some(section) = self.get(&source_file.name)? {
            tracing::debug!(source = %source_file.name, "using cached source");
            return Ok(section);
        }
        let section = generator.parse_source_file(source_file)?;
        self.put(&source_file.name, &section)?;
        Ok(section)
    }
}

/// Encode `raw` as a file name component that never contains `-`.
///
/// ASCII alphanumerics pass through and every other byte becomes `_` plus two hex digits, so
/// distinct inputs give distinct keys and `-` is free to separate generator from source.
fn escape_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte.is_ascii_alphanumeric() {
            key.push(char::from(byte));
        } else {
            key.push_str(&format!("_{byte:02x}"));
        }
    }
    key
}

#[cfg(test)]
#[path = "tests/cache.rs"]
mod tests;
