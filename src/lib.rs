//! # cache-purge
//!
//! Removes cached pages from a static-file cache when the page they were
//! generated for no longer exists on the live site.
//!
//! ## Overview
//!
//! Static publishers write one file per page (`about.html`,
//! `blog/post-1.html`, `index.html` for the homepage). When a page is
//! unpublished or renamed its cache file stays behind and keeps being served.
//! cache-purge walks the cache directory, maps every file back to the URL path
//! it was generated for, and removes the files whose URL path is no longer
//! live.
//!
//! A file is kept when any of these hold:
//!
//! - it does not carry the publisher's page extension
//! - it is a `.stale.<ext>` backup (removed together with its fresh sibling)
//! - its URL path matches a configured exclusion rule
//! - its URL path is live, ignoring leading/trailing slashes
//! - it is a generated redirect stub
//!
//! ## Architecture
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`commands`]: The purge command wiring everything together
//! - [`config`]: TOML configuration file
//! - [`reconcile`]: Cache walk, exclusion rules, live URL set and the decision
//!   pipeline
//! - [`executor`]: Applies or simulates the deletion plan
//! - [`site`] and [`location`]: Traits for the live URL source, cache location
//!   and related-file expansion, with file-based implementations
//! - [`error`]: Error types and handling with thiserror + miette
//! - [`logging`]: Verbosity-aware stderr output
//!
//! ## Library Usage
//!
//! ```no_run
//! use cache_purge::cli::Cli;
//! use cache_purge::commands;
//!
//! let cli = Cli::builder()
//!     .cache_dir("public/cache")
//!     .urls("live-urls.txt")
//!     .exclude("^blog/tag/")
//!     .dry_run(true)
//!     .build();
//!
//! let summary = commands::execute(&cli)?;
//! println!("{summary}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Configuration problems (missing cache directory, malformed exclusion rule,
//! disabled task) abort the run before anything is deleted. Problems removing
//! individual files are logged and counted in the [`executor::RunSummary`]
//! instead.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod executor;
pub mod location;
pub mod logging;
pub mod reconcile;
pub mod site;
