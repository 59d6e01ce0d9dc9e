//! Error types for cache-purge.
//!
//! This module defines all error types used throughout cache-purge, using
//! a combination of `thiserror` for ergonomic error definitions and `miette`
//! for rich diagnostic output.
//!
//! # Error Handling Strategy
//!
//! - Configuration-class errors (unresolvable cache root, malformed exclusion
//!   rule, disabled task) are raised before anything is deleted and abort the
//!   run
//! - I/O anomalies while deleting are *not* errors: they are logged and counted
//!   in the run summary
//! - Errors are automatically converted to `miette::Result` for CLI output
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use cache_purge::error::{PurgeError, Result};
//!
//! fn check_root(path: &Path) -> Result<()> {
//!     if !path.is_dir() {
//!         return Err(PurgeError::CacheRootNotFound(path.to_path_buf()));
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error types that can occur in cache-purge operations
#[derive(Error, Debug, Diagnostic)]
pub enum PurgeError {
    /// The cache root directory does not exist or is not a directory.
    #[error("Cache directory '{0}' not found")]
    #[diagnostic(
        code(cache_purge::config::cache_root_not_found),
        help("Set 'cache_dir' in the config file or pass --cache-dir.")
    )]
    CacheRootNotFound(
        /// The path that was expected to hold the cache
        PathBuf,
    ),

    /// An exclusion rule could not be compiled. The whole run is aborted.
    #[error("Invalid exclusion rule '{rule}'")]
    #[diagnostic(
        code(cache_purge::config::invalid_exclude_rule),
        help(
            "Exclusion rules are regular expressions matched against URL paths without a leading \
             slash, e.g. '^blog/tag/', '/^blog\\/tag\\//' or '#^blog/tag/#'. Delimited rules may \
             use / # ~ ! @ % ; or , as the delimiter."
        )
    )]
    InvalidExcludeRule {
        /// The rule as written in the configuration
        rule: String,
        /// Why the rule was rejected
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The task has been switched off in configuration.
    #[error("Purge task is disabled")]
    #[diagnostic(
        code(cache_purge::config::disabled),
        help("Remove 'disabled = true' from the config file to allow this task to run.")
    )]
    TaskDisabled,

    /// The `memory_limit` hint could not be parsed.
    #[error("Invalid memory limit: '{0}' - {1}")]
    #[diagnostic(
        code(cache_purge::config::invalid_memory_limit),
        help("Specify the limit as a number with optional suffix (e.g., '512M', '1G', or raw bytes)")
    )]
    InvalidMemoryLimit(
        /// The invalid value provided
        String,
        /// Description of the parsing error
        String,
    ),

    /// The configuration file is not valid TOML or has unknown keys.
    #[error("Failed to parse config file '{path}'")]
    #[diagnostic(code(cache_purge::config::parse_error))]
    ConfigParseError {
        /// The config file being parsed
        path: PathBuf,
        /// The underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// The live URL list could not be read.
    #[error("Failed to read live URL list from '{path}'")]
    #[diagnostic(
        code(cache_purge::urls::read_error),
        help("Pass --urls with a file listing one live URL path per line, or '-' for stdin.")
    )]
    UrlListError {
        /// Where the list was read from
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Generic configuration problem (missing required option, bad value).
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(cache_purge::config::error),
        help("Check the required configuration parameters.")
    )]
    ConfigError(
        /// Description of the configuration error
        String,
    ),

    /// File system I/O error during cache-purge operations.
    ///
    /// Raised while walking the cache tree or reading the config file.
    /// Failures while removing cache files are reported as warnings instead.
    #[error("I/O error accessing '{path}'")]
    #[diagnostic(code(cache_purge::io_error))]
    IoError {
        /// The path that caused the I/O error
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A cache file name is not valid UTF-8 and cannot be mapped to a URL path.
    #[error("Invalid UTF-8 in path: {0}")]
    #[diagnostic(
        code(cache_purge::path::invalid_utf8),
        help("Cache file names must be valid UTF-8 to be matched against URL paths.")
    )]
    InvalidUtf8Path(
        /// The path containing invalid UTF-8
        PathBuf,
    ),
}

impl PurgeError {
    /// Whether this error belongs to the configuration class.
    ///
    /// Configuration errors are always raised before any deletion happens.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PurgeError::CacheRootNotFound(_)
                | PurgeError::InvalidExcludeRule { .. }
                | PurgeError::TaskDisabled
                | PurgeError::InvalidMemoryLimit(..)
                | PurgeError::ConfigParseError { .. }
                | PurgeError::UrlListError { .. }
                | PurgeError::ConfigError(_)
        )
    }
}

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, PurgeError>;
