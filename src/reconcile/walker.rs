use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{PurgeError, Result};

/// A file found under the cache root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheFile {
    relative_path: String,
    path: PathBuf,
}

impl CacheFile {
    pub fn new(root: &Path, relative_path: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        let path = root.join(&relative_path);
        Self {
            relative_path,
            path,
        }
    }

    /// Path relative to the cache root, always `/`-separated.
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Absolute path on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file. Only called for redirect detection.
    pub fn contents(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.path)
    }
}

/// Lazy, depth-first walk over every file below a cache root.
///
/// Siblings are visited in file name order so dry runs print the same plan
/// every time. An entry that cannot be read or has a non-UTF-8 name is
/// yielded as an error and the walk carries on past it.
pub struct CacheTreeWalk {
    root: PathBuf,
    inner: walkdir::IntoIter,
}

/// Start a fresh walk of `root`.
///
/// Fails with a configuration error when `root` is missing, not a directory
/// or unreadable.
pub fn walk(root: &Path) -> Result<CacheTreeWalk> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        _ => return Err(PurgeError::CacheRootNotFound(root.to_path_buf())),
    }

    fs::read_dir(root).map_err(|e| {
        PurgeError::ConfigError(format!(
            "Cache directory '{}' is not readable: {e}",
            root.display()
        ))
    })?;

    let inner = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();

    Ok(CacheTreeWalk {
        root: root.to_path_buf(),
        inner,
    })
}

impl CacheTreeWalk {
    fn to_cache_file(&self, path: &Path) -> Result<CacheFile> {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        let mut parts = Vec::new();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                let part = part
                    .to_str()
                    .ok_or_else(|| PurgeError::InvalidUtf8Path(path.to_path_buf()))?;
                parts.push(part);
            }
        }

        Ok(CacheFile {
            relative_path: parts.join("/"),
            path: path.to_path_buf(),
        })
    }
}

impl Iterator for CacheTreeWalk {
    type Item = Result<CacheFile>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    return Some(Err(PurgeError::IoError {
                        path,
                        source: err.into(),
                    }));
                }
            };

            if entry.file_type().is_dir() {
                continue;
            }

            return Some(self.to_cache_file(entry.path()));
        }
    }
}
