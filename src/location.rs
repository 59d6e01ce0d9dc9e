//! Where the cache lives and how cache files relate to each other.
//!
//! Both concerns sit behind small traits so the reconciler never has to know
//! how a particular publisher lays out its output.

use std::path::PathBuf;

use crate::error::{PurgeError, Result};

/// Resolved cache root and the extension of its page files (without the dot).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLocation {
    pub root: PathBuf,
    pub extension: String,
}

/// Finds the cache root for this run.
pub trait CacheLocationResolver {
    fn resolve_cache_root(&self) -> Result<CacheLocation>;
}

/// Maps one cache file to every file that must be removed with it.
///
/// The result always contains `relative_path` itself.
pub trait CachePathExpander {
    fn expand(&self, relative_path: &str) -> Vec<String>;
}

/// Cache location taken from configuration or the command line.
#[derive(Debug, Clone)]
pub struct ConfiguredLocation {
    cache_dir: PathBuf,
    extension: String,
}

impl ConfiguredLocation {
    pub fn new(cache_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            extension: extension.into(),
        }
    }
}

impl CacheLocationResolver for ConfiguredLocation {
    fn resolve_cache_root(&self) -> Result<CacheLocation> {
        let extension = self.extension.trim().trim_start_matches('.');
        if extension.is_empty() {
            return Err(PurgeError::ConfigError(
                "Cache file extension must not be empty".to_string(),
            ));
        }

        if !self.cache_dir.is_dir() {
            return Err(PurgeError::CacheRootNotFound(self.cache_dir.clone()));
        }

        Ok(CacheLocation {
            root: self.cache_dir.clone(),
            extension: extension.to_string(),
        })
    }
}

/// Expands a page file to itself plus its `.stale.<ext>` backup.
#[derive(Debug, Clone)]
pub struct StaleVariantExpander {
    extension: String,
}

impl StaleVariantExpander {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
        }
    }
}

impl CachePathExpander for StaleVariantExpander {
    fn expand(&self, relative_path: &str) -> Vec<String> {
        let mut paths = vec![relative_path.to_string()];

        let suffix = format!(".{}", self.extension);
        if let Some(stem) = relative_path.strip_suffix(&suffix) {
            paths.push(format!("{stem}.stale{suffix}"));
        }

        paths
    }
}
