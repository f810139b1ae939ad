//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! Specifically, we try to find a snapdraft.toml, and if present we load settings from there.
//! This provides the generator identity used to tag cached sources, the file extensions read
//! as plain markdown, the cache location and the default log filter.

use facet::Facet;
use std::{fs, io};
use std::path::Path;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "snapdraft.toml";

/// Version tag of the default generator. Bump it to invalidate cached sources.
pub const GENERATOR_VERSION: &str = "0.0.3";

#[derive(Facet, Clone, Debug, PartialEq)]
/// User preferences loaded from snapdraft.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "default".to_string())]
    /// Name of the generator; part of the cache key.
    pub generator_name: String,
    #[facet(default = GENERATOR_VERSION.to_string())]
    /// Version tag of the generator; cached sources with another tag are re-parsed.
    pub generator_version: String,
    #[facet(default = vec!["md".to_string(), "markdown".to_string()])]
    /// File suffixes read directly as markdown without conversion.
    pub markdown_extensions: Vec<String>,
    #[facet(default = ".snapdraft-cache".to_string())]
    /// Directory holding preprocessed source records.
    pub cache_dir: String,
    #[facet(default = "snapdraft=info".to_string())]
    /// Filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    /// Every field's default comes from its `#[facet(default)]` attribute.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    fn default() -> Self {
        facet_toml::from_str::<Self>("").expect("every config field has a default")
    }
}

impl Config {
    #[must_use]
    /// Load configuration from snapdraft.toml if present.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from `path`, using defaults when it is missing, unreadable or malformed.
    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "cannot read configuration file"
                );
                return Self::default();
            }
        };
        if let Ok(config) = facet_toml::from_str::<Self>(&contents) {
            return config;
        }
        tracing::warn!(
            path = %path.display(),
            "ignoring malformed configuration file"
        );
        Self::default()
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
