//! Configuration file for the purge task.
//!
//! Settings are read from a TOML file (by default `cache-purge.toml` in the
//! working directory). Command-line flags override individual values; see
//! [`crate::commands::Purge`].
//!
//! ```toml
//! disabled = false
//! memory_limit = "512M"
//! exclude = ['^blog/tag/', '/\.backup$/']
//! cache_dir = "cache"
//! extension = "html"
//! urls_file = "live-urls.txt"
//! ```
//!
//! Exclusion rules are matched against URL paths without a leading slash and
//! without the file extension. Delimited `/pattern/flags` rules are accepted.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PurgeError, Result};

mod size;

pub(crate) use size::{format_size, parse_size};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "cache-purge.toml";

/// Page file extension used when neither the config nor the CLI sets one.
pub const DEFAULT_EXTENSION: &str = "html";

/// Settings for one purge run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PurgeConfig {
    /// Refuse to run at all
    pub disabled: bool,
    /// Resource hint for the run ("512M", "1G", "-1" for unlimited)
    pub memory_limit: Option<String>,
    /// Regex rules for URL paths that must never be purged
    pub exclude: Vec<String>,
    /// Root of the static cache
    pub cache_dir: Option<PathBuf>,
    /// Extension of cached page files, without the dot
    pub extension: Option<String>,
    /// File listing the live URL paths, one per line
    pub urls_file: Option<PathBuf>,
    /// Replacement for the built-in redirect stub markers
    pub redirect_markers: Option<Vec<String>>,
}

impl PurgeConfig {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| PurgeError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml(&text, path)
    }

    /// Parse config text; `path` is only used for error messages.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| PurgeError::ConfigParseError {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit config file, or the default one if it exists.
    ///
    /// An explicitly named file must exist; a missing default file just
    /// yields the default configuration.
    pub fn discover(explicit: Option<&Path>, working_dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            let path = working_dir.join(path);
            if !path.is_file() {
                return Err(PurgeError::ConfigError(format!(
                    "Config file '{}' not found",
                    path.display()
                )));
            }
            return Self::load(&path);
        }

        let default_path = working_dir.join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            Self::load(&default_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Fail with [`PurgeError::TaskDisabled`] when the task is switched off.
    pub fn ensure_enabled(&self) -> Result<()> {
        if self.disabled {
            Err(PurgeError::TaskDisabled)
        } else {
            Ok(())
        }
    }

    /// The memory limit in bytes; `None` when unset or unlimited.
    pub fn memory_limit_bytes(&self) -> Result<Option<u64>> {
        match self.memory_limit.as_deref().map(str::trim) {
            None | Some("-1") => Ok(None),
            Some(limit) => parse_size(limit).map(Some),
        }
    }

    pub fn extension(&self) -> &str {
        self.extension.as_deref().unwrap_or(DEFAULT_EXTENSION)
    }
}
