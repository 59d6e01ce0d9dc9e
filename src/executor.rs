//! Applies (or simulates) a deletion plan.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{PurgeError, Result};
use crate::logging::Logger;
use crate::reconcile::DeletionPlanEntry;

/// Removes the files named by a deletion plan.
#[derive(Debug, Clone, Copy)]
pub struct Executor {
    dry_run: bool,
    log: Logger,
}

impl Executor {
    pub fn new(dry_run: bool, log: Logger) -> Self {
        Self { dry_run, log }
    }

    /// Consume the plan, removing every existing file it names.
    ///
    /// Paths that no longer exist are counted as benign skips and a failed
    /// removal is logged and counted. An error item in the plan is a cache
    /// entry the walk could not read; it is logged, counted and skipped.
    /// Nothing here stops the run.
    pub fn execute<I>(&self, plan: I) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<DeletionPlanEntry>>,
    {
        let mut summary = RunSummary::new(self.dry_run);
        let mut purged_urls = HashSet::new();

        for entry in plan {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.log.warn(format!("skipping cache entry: {}", describe(&e)));
                    summary.walk_errors += 1;
                    continue;
                }
            };

            for path in entry.paths() {
                match self.remove(path) {
                    Removal::Removed => {
                        self.log.info(format!("Deleted: {}", path.display()));
                        summary.files_removed += 1;
                    }
                    Removal::Simulated => {
                        self.log.info(format!("Would delete: {}", path.display()));
                        summary.files_removed += 1;
                    }
                    Removal::Missing => {
                        self.log
                            .verbose(1, format!("  Already gone: {}", path.display()));
                        summary.missing_paths += 1;
                    }
                    Removal::Failed(e) => {
                        self.log
                            .warn(format!("failed to remove {}: {e}", path.display()));
                        summary.failures += 1;
                    }
                }
            }

            if purged_urls.insert(entry.url_path().to_string()) {
                summary.pages_purged += 1;
            }
        }

        Ok(summary)
    }

    fn remove(&self, path: &Path) -> Removal {
        match fs::symlink_metadata(path) {
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Removal::Missing,
            Err(e) => return Removal::Failed(e),
        }

        if self.dry_run {
            return Removal::Simulated;
        }

        match fs::remove_file(path) {
            Ok(()) => Removal::Removed,
            // Removed by someone else between the check and the unlink
            Err(e) if e.kind() == io::ErrorKind::NotFound => Removal::Missing,
            Err(e) => Removal::Failed(e),
        }
    }
}

/// Outcome of removing one path.
#[derive(Debug)]
enum Removal {
    Removed,
    Simulated,
    Missing,
    Failed(io::Error),
}

/// Error message including its immediate cause.
fn describe(err: &PurgeError) -> String {
    match std::error::Error::source(err) {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    }
}

/// What a run did (or would have done).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Distinct URL paths whose cache was purged
    pub pages_purged: usize,
    /// Files removed, or that would be removed in a dry run
    pub files_removed: usize,
    /// Expanded paths that did not exist
    pub missing_paths: usize,
    /// Removals that failed with an I/O error
    pub failures: usize,
    /// Cache entries the walk could not read or name
    pub walk_errors: usize,
    /// Whether this was a dry run
    pub dry_run: bool,
}

impl RunSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// `Deleted` or `Would delete`
    pub fn action(&self) -> &'static str {
        if self.dry_run {
            "Would delete"
        } else {
            "Deleted"
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} obselete pages from cache",
            self.action(),
            self.pages_purged
        )
    }
}
