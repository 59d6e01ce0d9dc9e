//! # cache-purge CLI
//!
//! Removes orphaned pages from a static-file cache.
//!
//! ## Quick Start
//!
//! ```bash
//! # See what would be removed (dry run is the default)
//! cache-purge --cache-dir public/cache --urls live-urls.txt
//!
//! # Remove for real
//! cache-purge --cache-dir public/cache --urls live-urls.txt --dry 0
//! ```
//!
//! ## Environment Variables
//!
//! - `CACHE_PURGE_CONFIG`: Config file (default: ./cache-purge.toml if present)
//! - `CACHE_PURGE_CACHE_DIR`: Cache root directory
//! - `CACHE_PURGE_URLS`: Live URL list file
//! - `CACHE_PURGE_DRY`: Set to 0 to delete for real
//! - `CACHE_PURGE_VERBOSE`: Enable verbose output
//! - `CACHE_PURGE_QUIET`: Silence all output except errors

use std::io::IsTerminal;

use cache_purge::cli::Cli;
use clap::Parser;

fn main() -> miette::Result<()> {
    miette::set_panic_hook();

    if std::io::stderr().is_terminal() {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::unicode_nocolor())
                    .with_context_lines(3),
            )
        }))?;
    } else {
        // CI logs and cron mail
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::none())
                    .with_context_lines(0),
            )
        }))?;
    }

    let cli = Cli::parse();

    cache_purge::commands::execute(&cli)
        .map(|_| ())
        .map_err(Into::into)
}
