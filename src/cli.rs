//! Command-line interface definitions for cache-purge.
//!
//! This module defines the CLI structure using clap. The main entry point is
//! the [`Cli`] struct; every flag can also be set through a `CACHE_PURGE_*`
//! environment variable.
//!
//! # Example
//!
//! ```no_run
//! use cache_purge::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//!
//! if cli.purge_opts().dry_run() {
//!     println!("Nothing will be deleted");
//! }
//! ```

use std::path::{Component, Path, PathBuf};

use clap::{Args, Parser};

/// Values of `--dry` that switch off dry-run mode. Anything else keeps it on.
pub const DRY_RUN_OFF_VALUES: [&str; 4] = ["0", "false", "no", "off"];

/// Main command-line interface for cache-purge.
#[derive(Debug, Parser)]
#[command(
    name = "cache-purge",
    bin_name = "cache-purge",
    author,
    version,
    about = "Remove cached pages that no longer exist on the live site",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    global_opts: GlobalOpts,

    #[command(flatten)]
    purge_opts: PurgeOpts,
}

/// Options controlling configuration lookup and output.
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the config file (defaults to ./cache-purge.toml if present)
    #[arg(long, env = "CACHE_PURGE_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, env = "CACHE_PURGE_VERBOSE")]
    verbose: u8,

    /// Silence all output except for errors
    #[arg(short, long, conflicts_with = "verbose", env = "CACHE_PURGE_QUIET")]
    quiet: bool,
}

impl GlobalOpts {
    /// Get the config path option
    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }

    /// Get the verbose level
    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    /// Check if quiet mode is enabled
    pub fn quiet(&self) -> bool {
        self.quiet
    }
}

/// Options for the purge itself. Each one overrides the config file.
#[derive(Debug, Args)]
pub struct PurgeOpts {
    /// Dry run unless set to 0/false/no/off
    #[arg(long, default_value = "1", env = "CACHE_PURGE_DRY")]
    dry: String,

    /// Root directory of the static cache
    #[arg(long, env = "CACHE_PURGE_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Extension of cached page files (default: html)
    #[arg(long, env = "CACHE_PURGE_EXTENSION")]
    extension: Option<String>,

    /// File listing live URL paths, one per line ('-' for stdin)
    #[arg(long, env = "CACHE_PURGE_URLS")]
    urls: Option<PathBuf>,

    /// Additional exclusion rule (repeatable)
    #[arg(long = "exclude", value_name = "REGEX")]
    exclude: Vec<String>,
}

impl PurgeOpts {
    /// Whether this run only reports what it would delete
    pub fn dry_run(&self) -> bool {
        is_dry_run(&self.dry)
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn urls(&self) -> Option<&Path> {
        self.urls.as_deref()
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }
}

impl Cli {
    /// Get the global options
    pub fn global_opts(&self) -> &GlobalOpts {
        &self.global_opts
    }

    /// Get the purge options
    pub fn purge_opts(&self) -> &PurgeOpts {
        &self.purge_opts
    }

    /// Create a builder for programmatic construction
    pub fn builder() -> CliBuilder {
        CliBuilder::default()
    }
}

/// Builder for [`Cli`]
#[derive(Debug, Default)]
pub struct CliBuilder {
    config: Option<PathBuf>,
    verbose: u8,
    quiet: bool,
    dry_run: Option<bool>,
    cache_dir: Option<PathBuf>,
    extension: Option<String>,
    urls: Option<PathBuf>,
    exclude: Vec<String>,
}

impl CliBuilder {
    /// Set the config file path
    pub fn config(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(path.into());
        self
    }

    /// Set the verbose level
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Enable quiet mode
    pub fn quiet(mut self, enabled: bool) -> Self {
        self.quiet = enabled;
        self
    }

    /// Enable or disable dry-run mode (default: enabled)
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = Some(enabled);
        self
    }

    /// Set the cache directory
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Set the page file extension
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    /// Set the live URL list file
    pub fn urls(mut self, path: impl Into<PathBuf>) -> Self {
        self.urls = Some(path.into());
        self
    }

    /// Add an exclusion rule
    pub fn exclude(mut self, rule: impl Into<String>) -> Self {
        self.exclude.push(rule.into());
        self
    }

    /// Build the Cli instance
    pub fn build(self) -> Cli {
        let dry = if self.dry_run.unwrap_or(true) { "1" } else { "0" };

        Cli {
            global_opts: GlobalOpts {
                config: self.config,
                verbose: self.verbose,
                quiet: self.quiet,
            },
            purge_opts: PurgeOpts {
                dry: dry.to_string(),
                cache_dir: self.cache_dir,
                extension: self.extension,
                urls: self.urls,
                exclude: self.exclude,
            },
        }
    }
}

/// Interpret a `--dry` value: only an explicit "off" value disables dry-run.
pub fn is_dry_run(value: &str) -> bool {
    let value = value.trim();
    !DRY_RUN_OFF_VALUES
        .iter()
        .any(|off| value.eq_ignore_ascii_case(off))
}

/// Resolve `path` against `base` and clean it, without requiring it to exist.
///
/// This function:
/// - Joins relative paths onto `base`
/// - Removes `.` and `..` components where possible
/// - Does NOT resolve symlinks (preserves user intent)
pub(crate) fn resolve_path(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    let absolute = if path.is_relative() {
        base.join(path)
    } else {
        path.to_path_buf()
    };

    let mut components = Vec::new();
    for component in absolute.components() {
        match component {
            Component::ParentDir => match components.last() {
                Some(Component::RootDir | Component::Prefix(_)) => continue,
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                _ => components.push(component),
            },
            Component::CurDir => continue,
            _ => components.push(component),
        }
    }

    components.iter().collect()
}
