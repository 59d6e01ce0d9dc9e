#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_fs::TempDir;
use assert_fs::prelude::*;

/// Banner written by the publisher at the top of redirect scripts.
pub const REDIRECT_STUB: &str = "<?php
/**
 * This is a system-generated PHP script that performs header management for
 * a 301 redirection.
 */
header('HTTP/1.1 301 Moved Permanently');
header('Location: /new-home');
";

/// A site root with a cache directory and a live URL list.
pub struct TestSite {
    dir: TempDir,
}

impl TestSite {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        dir.child("cache").create_dir_all().unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.dir.path().join("cache")
    }

    pub fn urls_file(&self) -> PathBuf {
        self.dir.path().join("live-urls.txt")
    }

    /// Write a cache page; parents are created as needed.
    pub fn page(&self, relative: &str, contents: &str) -> &Self {
        self.dir
            .child("cache")
            .child(relative)
            .write_str(contents)
            .unwrap();
        self
    }

    pub fn live(&self, urls: &[&str]) -> &Self {
        self.dir
            .child("live-urls.txt")
            .write_str(&urls.join("\n"))
            .unwrap();
        self
    }

    pub fn config(&self, toml: &str) -> &Self {
        self.dir.child("cache-purge.toml").write_str(toml).unwrap();
        self
    }

    pub fn cached(&self, relative: &str) -> bool {
        self.cache_dir().join(relative).exists()
    }
}

/// The example site used across the integration tests.
pub fn setup_site() -> TestSite {
    let site = TestSite::new();
    site.page("index.html", "<html>home</html>")
        .page("about.html", "<html>about</html>")
        .page("blog/post-1.html", "<html>post</html>")
        .page("blog/old-post.html", "<html>old</html>")
        .page("contact.html.stale", "<html>contact</html>")
        .live(&["/", "about", "/blog/post-1/"]);
    site
}
