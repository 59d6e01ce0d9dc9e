//! Purge command: reconcile the cache against the live site and remove
//! orphaned pages.

use std::path::{Path, PathBuf};

use crate::cli::resolve_path;
use crate::config::{PurgeConfig, format_size};
use crate::error::{PurgeError, Result};
use crate::executor::{Executor, RunSummary};
use crate::location::{CacheLocationResolver, ConfiguredLocation};
use crate::logging::Logger;
use crate::reconcile::{self, ExclusionMatcher, LiveUrlSet, Reconciler, RedirectDetector};
use crate::site::{SiteEnumerator, UrlListFile};

pub struct Purge {
    config: PurgeConfig,
    cache_dir: Option<PathBuf>,
    extension: Option<String>,
    urls: Option<PathBuf>,
    exclude: Vec<String>,
    dry_run: bool,
    verbose: u8,
    quiet: bool,
    working_dir: PathBuf,
}

pub struct PurgeBuilder {
    config: PurgeConfig,
    cache_dir: Option<PathBuf>,
    extension: Option<String>,
    urls: Option<PathBuf>,
    exclude: Vec<String>,
    dry_run: bool,
    verbose: u8,
    quiet: bool,
    working_dir: Option<PathBuf>,
}

impl Default for PurgeBuilder {
    fn default() -> Self {
        Self {
            config: PurgeConfig::default(),
            cache_dir: None,
            extension: None,
            urls: None,
            exclude: Vec::new(),
            dry_run: true,
            verbose: 0,
            quiet: false,
            working_dir: None,
        }
    }
}

impl PurgeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: PurgeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override `cache_dir` from the config
    pub fn cache_dir(mut self, dir: Option<&Path>) -> Self {
        self.cache_dir = dir.map(Path::to_path_buf);
        self
    }

    /// Override `extension` from the config
    pub fn extension(mut self, extension: Option<&str>) -> Self {
        self.extension = extension.map(str::to_string);
        self
    }

    /// Override `urls_file` from the config
    pub fn urls(mut self, path: Option<&Path>) -> Self {
        self.urls = path.map(Path::to_path_buf);
        self
    }

    /// Rules appended to the configured exclusion rules
    pub fn exclude(mut self, rules: &[String]) -> Self {
        self.exclude = rules.to_vec();
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Directory that relative paths are resolved against
    pub fn working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    pub fn build(self) -> Result<Purge> {
        let working_dir = match self.working_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|source| PurgeError::IoError {
                path: PathBuf::from("."),
                source,
            })?,
        };

        Ok(Purge {
            config: self.config,
            cache_dir: self.cache_dir,
            extension: self.extension,
            urls: self.urls,
            exclude: self.exclude,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            working_dir,
        })
    }
}

impl Purge {
    pub fn builder() -> PurgeBuilder {
        PurgeBuilder::new()
    }

    /// Run with the configured cache directory and URL list file.
    pub fn run(&self) -> Result<RunSummary> {
        self.config.ensure_enabled()?;

        let cache_dir = self
            .cache_dir
            .as_ref()
            .or(self.config.cache_dir.as_ref())
            .ok_or_else(|| {
                PurgeError::ConfigError(
                    "No cache directory given; pass --cache-dir or set 'cache_dir'".to_string(),
                )
            })?;
        let location = ConfiguredLocation::new(
            resolve_path(&self.working_dir, cache_dir),
            self.extension(),
        );

        let urls = self
            .urls
            .as_ref()
            .or(self.config.urls_file.as_ref())
            .ok_or_else(|| {
                PurgeError::ConfigError(
                    "No live URL list given; pass --urls or set 'urls_file'".to_string(),
                )
            })?;
        let enumerator = if urls.as_path() == Path::new("-") {
            UrlListFile::new(urls)
        } else {
            UrlListFile::new(resolve_path(&self.working_dir, urls))
        };

        self.run_with(&enumerator, &location)
    }

    /// Run against explicit collaborators.
    ///
    /// Every configuration check happens before the live URL list is read or
    /// the cache tree is touched.
    pub fn run_with(
        &self,
        enumerator: &dyn SiteEnumerator,
        resolver: &dyn CacheLocationResolver,
    ) -> Result<RunSummary> {
        let log = Logger::new(self.verbose, self.quiet);

        self.config.ensure_enabled()?;

        if let Some(limit) = self.config.memory_limit_bytes()? {
            log.verbose(1, format!("Memory limit hint: {}", format_size(limit)));
        }

        let rules: Vec<&String> = self.config.exclude.iter().chain(&self.exclude).collect();
        let matcher = ExclusionMatcher::compile(&rules)?;
        let location = resolver.resolve_cache_root()?;

        if self.dry_run {
            log.info("DRY RUN: pass --dry 0 to run for real");
        }

        log.verbose(
            1,
            format!(
                "Purging *.{} files under {}",
                location.extension,
                location.root.display()
            ),
        );
        if !matcher.is_empty() {
            log.verbose(1, format!("Using {} exclusion rules", matcher.len()));
        }

        let live_set = LiveUrlSet::build(enumerator.enumerate_live_urls()?);
        log.verbose(1, format!("Found {} live URLs", live_set.len()));

        let detector = match &self.config.redirect_markers {
            Some(markers) => RedirectDetector::with_markers(markers),
            None => RedirectDetector::default(),
        };

        let reconciler = Reconciler::builder()
            .location(location)
            .live_set(live_set)
            .matcher(matcher)
            .detector(detector)
            .logger(log)
            .build()?;

        let files = reconcile::walk(reconciler.root())?;
        let summary = Executor::new(self.dry_run, log).execute(reconciler.reconcile(files))?;

        log.info(&summary);
        log.verbose(
            1,
            format!(
                "  Files: {}, already gone: {}, failed: {}, unreadable entries: {}",
                summary.files_removed,
                summary.missing_paths,
                summary.failures,
                summary.walk_errors
            ),
        );
        if summary.failures > 0 {
            log.warn(format!(
                "{} cache files could not be removed",
                summary.failures
            ));
        }
        if summary.walk_errors > 0 {
            log.warn(format!(
                "{} cache entries were skipped because they could not be read",
                summary.walk_errors
            ));
        }

        Ok(summary)
    }

    fn extension(&self) -> &str {
        self.extension
            .as_deref()
            .unwrap_or_else(|| self.config.extension())
    }
}
