//! Implementation of the cache-purge command.
//!
//! `mod.rs` is a thin dispatcher: it loads the config file, applies the
//! command-line overrides and hands over to [`Purge`].

use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::PurgeConfig;
use crate::error::{PurgeError, Result};
use crate::executor::RunSummary;

pub(crate) mod purge;

pub use purge::{Purge, PurgeBuilder};


/// Execute the purge based on the parsed CLI arguments.
pub fn execute(cli: &Cli) -> Result<RunSummary> {
    execute_with_dir(cli, None)
}

/// Execute the purge with an explicit working directory.
pub fn execute_with_dir(cli: &Cli, working_dir: Option<&Path>) -> Result<RunSummary> {
    let quiet = cli.global_opts().quiet();
    let verbose = if quiet {
        0
    } else {
        cli.global_opts().verbose()
    };

    let current_dir = if let Some(dir) = working_dir {
        dir.to_path_buf()
    } else {
        std::env::current_dir().map_err(|source| PurgeError::IoError {
            path: PathBuf::from("."),
            source,
        })?
    };

    let config = PurgeConfig::discover(cli.global_opts().config(), &current_dir)?;
    let opts = cli.purge_opts();

    Purge::builder()
        .config(config)
        .cache_dir(opts.cache_dir())
        .extension(opts.extension())
        .urls(opts.urls())
        .exclude(opts.exclude())
        .dry_run(opts.dry_run())
        .verbose(verbose)
        .quiet(quiet)
        .working_dir(&current_dir)
        .build()?
        .run()
}
