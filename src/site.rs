//! Sources of the live URL list.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::{PurgeError, Result};

/// Enumerates every URL path that is currently published.
///
/// Implementations return a plain list and must not record anything as a
/// side effect of being asked.
pub trait SiteEnumerator {
    fn enumerate_live_urls(&self) -> Result<Vec<String>>;
}

/// Live URLs held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticUrls(pub Vec<String>);

impl SiteEnumerator for StaticUrls {
    fn enumerate_live_urls(&self) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Live URLs read from a text file, one per line.
///
/// Blank lines and lines starting with `#` are ignored. A path of `-` reads
/// standard input.
#[derive(Debug, Clone)]
pub struct UrlListFile {
    path: PathBuf,
}

impl UrlListFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> io::Result<String> {
        if self.path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        } else {
            fs::read_to_string(&self.path)
        }
    }
}

impl SiteEnumerator for UrlListFile {
    fn enumerate_live_urls(&self) -> Result<Vec<String>> {
        let text = self.read().map_err(|source| PurgeError::UrlListError {
            path: self.path.clone(),
            source,
        })?;

        Ok(parse_url_list(&text))
    }
}

/// Parse the line-oriented URL list format.
///
/// A lone `/` line is kept: it is how the homepage is usually listed.
pub(crate) fn parse_url_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
