//! Reconciliation of the cache tree against the live site.
//!
//! Every file found under the cache root goes through a short pipeline of
//! named stages. The first stage that claims a file keeps it; a file that no
//! stage claims is orphaned and becomes a [`DeletionPlanEntry`].
//!
//! 1. [`Stage::Extension`]: not a page file for this publisher
//! 2. [`Stage::StaleVariant`]: a `.stale.<ext>` backup, removed together with
//!    its fresh sibling instead
//! 3. [`Stage::Excluded`]: URL path matches an exclusion rule
//! 4. [`Stage::Live`]: URL path is still published
//! 5. [`Stage::Redirect`]: the file is a generated redirect stub
//!
//! The walk, the decisions and the resulting plan are all lazy iterators, so
//! memory use does not grow with the size of the cache tree.
//!
//! # Example
//!
//! ```no_run
//! use cache_purge::location::CacheLocation;
//! use cache_purge::reconcile::{self, ExclusionMatcher, LiveUrlSet, Reconciler};
//!
//! let location = CacheLocation {
//!     root: "cache".into(),
//!     extension: "html".to_string(),
//! };
//! let reconciler = Reconciler::builder()
//!     .location(location.clone())
//!     .live_set(LiveUrlSet::build(["", "about"]))
//!     .matcher(ExclusionMatcher::compile(&["^blog/tag/"])?)
//!     .build()?;
//!
//! for entry in reconciler.reconcile(reconcile::walk(&location.root)?) {
//!     println!("{}", entry?.relative_path());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{PurgeError, Result};
use crate::location::{CacheLocation, CachePathExpander, StaleVariantExpander};
use crate::logging::Logger;

mod exclusion;
mod live_set;
mod redirect;
mod walker;


pub use exclusion::{ExclusionMatcher, is_excluded};
pub use live_set::LiveUrlSet;
pub use redirect::{DEFAULT_REDIRECT_MARKERS, RedirectDetector};
pub use walker::{CacheFile, CacheTreeWalk, walk};

/// The pipeline stage that decided to keep a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Extension,
    StaleVariant,
    Excluded,
    Live,
    Redirect,
    /// Contents could not be read, so the file cannot be shown to be orphaned.
    Unreadable,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Stage::Extension => "not a cache page",
            Stage::StaleVariant => "stale variant",
            Stage::Excluded => "excluded by rule",
            Stage::Live => "page is live",
            Stage::Redirect => "redirect stub",
            Stage::Unreadable => "unreadable",
        };
        f.write_str(reason)
    }
}

/// Verdict for a single cache file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Skip(Stage),
    Purge { url_path: String },
}

/// One orphaned page and every file that goes with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPlanEntry {
    relative_path: String,
    url_path: String,
    paths: Vec<PathBuf>,
}

impl DeletionPlanEntry {
    pub fn new(
        relative_path: impl Into<String>,
        url_path: impl Into<String>,
        paths: Vec<PathBuf>,
    ) -> Self {
        Self {
            relative_path: relative_path.into(),
            url_path: url_path.into(),
            paths,
        }
    }

    /// The cache file that triggered this entry.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub fn url_path(&self) -> &str {
        &self.url_path
    }

    /// Absolute paths to remove.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// Derive the URL path a cache file was published for.
///
/// Returns `None` when the file does not carry `.<extension>`. The root
/// `index.<extension>` (and `index.php`) is the homepage, `""`.
pub fn derive_url_path(relative_path: &str, extension: &str) -> Option<String> {
    let stem = relative_path.strip_suffix(&format!(".{extension}"))?;

    if relative_path == format!("index.{extension}") || relative_path == "index.php" {
        return Some(String::new());
    }

    Some(stem.to_string())
}

/// Decides which cache files are orphaned.
pub struct Reconciler {
    root: PathBuf,
    extension: String,
    live_set: LiveUrlSet,
    matcher: ExclusionMatcher,
    detector: RedirectDetector,
    expander: Box<dyn CachePathExpander>,
    log: Logger,
}

impl Reconciler {
    /// Creates a new builder for [`Reconciler`]
    pub fn builder() -> ReconcilerBuilder {
        ReconcilerBuilder::default()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run one file through the pipeline.
    pub fn decide(&self, file: &CacheFile) -> Decision {
        let relative = file.relative_path();

        let Some(url_path) = derive_url_path(relative, &self.extension) else {
            return Decision::Skip(Stage::Extension);
        };

        if relative.ends_with(&format!(".stale.{}", self.extension)) {
            return Decision::Skip(Stage::StaleVariant);
        }

        if self.matcher.is_excluded(&url_path) {
            return Decision::Skip(Stage::Excluded);
        }

        if self.live_set.contains(&url_path) {
            return Decision::Skip(Stage::Live);
        }

        match file.contents() {
            Ok(contents) if self.detector.is_redirect_stub(&contents) => {
                Decision::Skip(Stage::Redirect)
            }
            Ok(_) => Decision::Purge { url_path },
            Err(e) => {
                self.log.warn(format!(
                    "could not read {}, keeping it: {e}",
                    file.path().display()
                ));
                Decision::Skip(Stage::Unreadable)
            }
        }
    }

    /// Lazily turn a stream of cache files into deletion plan entries.
    ///
    /// Errors from the underlying walk are passed through unchanged; the
    /// [`Executor`](crate::executor::Executor) logs and skips them.
    pub fn reconcile<'a, I>(
        &'a self,
        files: I,
    ) -> impl Iterator<Item = Result<DeletionPlanEntry>> + 'a
    where
        I: IntoIterator<Item = Result<CacheFile>>,
        I::IntoIter: 'a,
    {
        files.into_iter().filter_map(move |file| {
            let file = match file {
                Ok(file) => file,
                Err(e) => return Some(Err(e)),
            };

            match self.decide(&file) {
                Decision::Skip(stage) => {
                    self.log
                        .verbose(2, format!("  Keeping {} ({stage})", file.relative_path()));
                    None
                }
                Decision::Purge { url_path } => Some(Ok(self.plan_entry(&file, url_path))),
            }
        })
    }

    fn plan_entry(&self, file: &CacheFile, url_path: String) -> DeletionPlanEntry {
        let paths = self
            .expander
            .expand(file.relative_path())
            .iter()
            .map(|relative| self.root.join(relative))
            .collect();

        DeletionPlanEntry::new(file.relative_path(), url_path, paths)
    }
}

/// Builder for [`Reconciler`]
#[derive(Default)]
pub struct ReconcilerBuilder {
    location: Option<CacheLocation>,
    live_set: LiveUrlSet,
    matcher: ExclusionMatcher,
    detector: Option<RedirectDetector>,
    expander: Option<Box<dyn CachePathExpander>>,
    log: Option<Logger>,
}

impl ReconcilerBuilder {
    /// Set the cache root and page extension
    pub fn location(mut self, location: CacheLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the live URL set
    pub fn live_set(mut self, live_set: LiveUrlSet) -> Self {
        self.live_set = live_set;
        self
    }

    /// Set the compiled exclusion rules
    pub fn matcher(mut self, matcher: ExclusionMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Override the redirect stub detector
    pub fn detector(mut self, detector: RedirectDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Override the cache path expander (defaults to [`StaleVariantExpander`])
    pub fn expander(mut self, expander: impl CachePathExpander + 'static) -> Self {
        self.expander = Some(Box::new(expander));
        self
    }

    /// Set the logger used for per-file traces
    pub fn logger(mut self, log: Logger) -> Self {
        self.log = Some(log);
        self
    }

    /// Build the [`Reconciler`]
    pub fn build(self) -> Result<Reconciler> {
        let location = self.location.ok_or_else(|| {
            PurgeError::ConfigError("Cache location is required".to_string())
        })?;

        let expander = self
            .expander
            .unwrap_or_else(|| Box::new(StaleVariantExpander::new(location.extension.clone())));

        Ok(Reconciler {
            root: location.root,
            extension: location.extension,
            live_set: self.live_set,
            matcher: self.matcher,
            detector: self.detector.unwrap_or_default(),
            expander,
            log: self.log.unwrap_or_else(|| Logger::new(0, true)),
        })
    }
}
