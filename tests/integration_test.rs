use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

use cache_purge::cli::Cli;
use cache_purge::commands::execute_with_dir;
use cache_purge::error::{PurgeError, Result};
use cache_purge::executor::RunSummary;
use miette::IntoDiagnostic;

mod common;

use common::{REDIRECT_STUB, TestSite, setup_site};

/// Helper to run a purge through the library against a test site
fn run_purge(site: &TestSite, dry_run: bool, exclude: &[&str]) -> Result<RunSummary> {
    let mut builder = Cli::builder()
        .cache_dir(site.cache_dir())
        .urls(site.urls_file())
        .dry_run(dry_run)
        .quiet(true);
    for rule in exclude {
        builder = builder.exclude(*rule);
    }

    execute_with_dir(&builder.build(), Some(site.path()))
}

#[test]
fn test_scenario_removes_only_orphan() {
    let site = setup_site();

    let summary = run_purge(&site, false, &["/^blog\\/tag\\//"]).unwrap();

    assert_eq!(summary.pages_purged, 1);
    assert_eq!(summary.files_removed, 1);
    assert!(!site.cached("blog/old-post.html"));
    assert!(site.cached("index.html"));
    assert!(site.cached("about.html"));
    assert!(site.cached("blog/post-1.html"));
    assert!(site.cached("contact.html.stale"));
}

#[test]
fn test_dry_run_is_default_and_mutates_nothing() {
    let site = setup_site();

    let cli = Cli::builder()
        .cache_dir(site.cache_dir())
        .urls(site.urls_file())
        .quiet(true)
        .build();
    let summary = execute_with_dir(&cli, Some(site.path())).unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.pages_purged, 1);
    assert_eq!(
        summary.to_string(),
        "Would delete 1 obselete pages from cache"
    );
    assert!(site.cached("blog/old-post.html"));
}

#[test]
fn test_stale_sibling_removed_with_page() {
    let site = setup_site();
    site.page("blog/old-post.stale.html", "<html>older</html>");

    let summary = run_purge(&site, false, &[]).unwrap();

    assert_eq!(summary.pages_purged, 1);
    assert_eq!(summary.files_removed, 2);
    assert!(!site.cached("blog/old-post.stale.html"));
}

#[test]
fn test_orphaned_stale_file_alone_is_kept() {
    let site = setup_site();
    site.page("gone.stale.html", "<html>gone</html>");

    let summary = run_purge(&site, false, &[]).unwrap();

    assert_eq!(summary.pages_purged, 1);
    assert!(site.cached("gone.stale.html"));
}

#[test]
fn test_redirect_stubs_are_kept() {
    let site = setup_site();
    site.page("old-home.html", REDIRECT_STUB);

    run_purge(&site, false, &[]).unwrap();

    assert!(site.cached("old-home.html"));
    assert!(!site.cached("blog/old-post.html"));
}

#[test]
fn test_excluded_pages_are_kept() {
    let site = setup_site();
    site.page("blog/tag/rust.html", "<html>tag</html>")
        .page("news/archive.html", "<html>archive</html>");

    let summary = run_purge(&site, false, &["^blog/tag/", "/^NEWS\\//i"]).unwrap();

    assert_eq!(summary.pages_purged, 1);
    assert!(site.cached("blog/tag/rust.html"));
    assert!(site.cached("news/archive.html"));
}

#[test]
fn test_leading_slash_rule_does_not_match() {
    let site = setup_site();
    site.page("blog/tag/rust.html", "<html>tag</html>");

    // URL paths carry no leading slash, so this rule protects nothing
    run_purge(&site, false, &["^/blog/tag/"]).unwrap();

    assert!(!site.cached("blog/tag/rust.html"));
}

#[test]
fn test_homepage_purged_when_not_live() {
    let site = setup_site();
    site.live(&["about", "/blog/post-1/"]);

    run_purge(&site, false, &[]).unwrap();

    assert!(!site.cached("index.html"));
    assert!(site.cached("about.html"));
}

#[test]
fn test_second_run_deletes_nothing() {
    let site = setup_site();

    let first = run_purge(&site, false, &[]).unwrap();
    let second = run_purge(&site, false, &[]).unwrap();

    assert_eq!(first.files_removed, 1);
    assert_eq!(second.files_removed, 0);
    assert_eq!(second.pages_purged, 0);
}

#[test]
fn test_dry_run_reports_what_real_run_deletes() {
    let site = setup_site();
    site.page("a/b/c.html", "x").page("z.html", "");

    let dry = run_purge(&site, true, &[]).unwrap();
    let real = run_purge(&site, false, &[]).unwrap();

    assert_eq!(dry.pages_purged, 3);
    assert_eq!(dry.pages_purged, real.pages_purged);
    assert_eq!(dry.files_removed, real.files_removed);
    assert!(!site.cached("z.html"));
    assert!(!site.cached("a/b/c.html"));
}

#[test]
fn test_config_file_settings() {
    let site = setup_site();
    site.page("blog/tag/rust.html", "<html>tag</html>")
        .config(
            r#"
cache_dir = "cache"
urls_file = "live-urls.txt"
exclude = ['^blog/tag/']
memory_limit = "256M"
"#,
        );

    let cli = Cli::builder().dry_run(false).quiet(true).build();
    let summary = execute_with_dir(&cli, Some(site.path())).unwrap();

    assert_eq!(summary.pages_purged, 1);
    assert!(site.cached("blog/tag/rust.html"));
}

#[test]
fn test_disabled_config_refuses_to_run() {
    let site = setup_site();
    site.config("disabled = true\n");

    let result = run_purge(&site, false, &[]);

    assert!(matches!(result, Err(PurgeError::TaskDisabled)));
    assert!(site.cached("blog/old-post.html"));
}

#[test]
fn test_malformed_rule_is_fatal() {
    let site = setup_site();

    let err = run_purge(&site, false, &["(unclosed"]).unwrap_err();

    assert!(err.is_configuration());
    assert!(site.cached("blog/old-post.html"));
}

#[test]
fn test_missing_cache_dir_is_fatal() {
    let site = setup_site();
    fs::remove_dir_all(site.cache_dir()).unwrap();

    let err = run_purge(&site, false, &[]).unwrap_err();
    assert!(matches!(err, PurgeError::CacheRootNotFound(_)));
}

#[test]
fn test_binary_dry_run_output() -> miette::Result<()> {
    let site = setup_site();

    let output = Command::new(env!("CARGO_BIN_EXE_cache-purge"))
        .arg("--cache-dir")
        .arg(site.cache_dir())
        .arg("--urls")
        .arg(site.urls_file())
        .current_dir(site.path())
        .output()
        .into_diagnostic()?;

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DRY RUN"));
    assert!(stderr.contains("Would delete: "));
    assert!(stderr.contains("old-post.html"));
    assert!(stderr.contains("Would delete 1 obselete pages from cache"));
    assert!(site.cached("blog/old-post.html"));

    Ok(())
}

#[test]
fn test_binary_real_run_output() -> miette::Result<()> {
    let site = setup_site();

    let output = Command::new(env!("CARGO_BIN_EXE_cache-purge"))
        .args(["--dry", "0"])
        .arg("--cache-dir")
        .arg(site.cache_dir())
        .arg("--urls")
        .arg(site.urls_file())
        .current_dir(site.path())
        .output()
        .into_diagnostic()?;

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("DRY RUN"));
    assert!(stderr.contains("Deleted: "));
    assert!(stderr.contains("Deleted 1 obselete pages from cache"));
    assert!(!site.cached("blog/old-post.html"));

    Ok(())
}

#[test]
fn test_binary_fatal_error_exit_code() -> miette::Result<()> {
    let site = TestSite::new();

    let output = Command::new(env!("CARGO_BIN_EXE_cache-purge"))
        .arg("--cache-dir")
        .arg(site.path().join("missing"))
        .arg("--urls")
        .arg(site.urls_file())
        .current_dir(site.path())
        .env_remove("CACHE_PURGE_DRY")
        .output()
        .into_diagnostic()?;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));

    Ok(())
}

fn logged_paths(stderr: &str, prefix: &str) -> BTreeSet<PathBuf> {
    stderr
        .lines()
        .filter_map(|line| line.strip_prefix(prefix))
        .map(PathBuf::from)
        .collect()
}

fn cache_snapshot(site: &TestSite) -> BTreeSet<PathBuf> {
    walkdir::WalkDir::new(site.cache_dir())
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

fn run_binary(site: &TestSite, dry: &str) -> miette::Result<String> {
    let output = Command::new(env!("CARGO_BIN_EXE_cache-purge"))
        .args(["--dry", dry])
        .arg("--cache-dir")
        .arg(site.cache_dir())
        .arg("--urls")
        .arg(site.urls_file())
        .current_dir(site.path())
        .output()
        .into_diagnostic()?;

    assert!(output.status.success());
    Ok(String::from_utf8_lossy(&output.stderr).into_owned())
}

#[test]
fn test_binary_dry_run_lists_exactly_what_real_run_deletes() -> miette::Result<()> {
    let site = setup_site();
    site.page("blog/old-post.stale.html", "<html>older</html>")
        .page("gone/deep/page.html", "<html>gone</html>")
        .page("moved.html", REDIRECT_STUB);

    let before = cache_snapshot(&site);
    let would_delete = logged_paths(&run_binary(&site, "1")?, "Would delete: ");
    assert_eq!(cache_snapshot(&site), before);

    let deleted = logged_paths(&run_binary(&site, "0")?, "Deleted: ");
    let removed: BTreeSet<PathBuf> = before.difference(&cache_snapshot(&site)).cloned().collect();

    assert_eq!(would_delete.len(), 3);
    assert_eq!(would_delete, removed);
    assert_eq!(deleted, removed);

    Ok(())
}

#[test]
fn test_binary_failed_removal_not_reported_as_deleted() -> miette::Result<()> {
    let site = setup_site();
    // A directory where the stale variant should be cannot be unlinked
    fs::create_dir_all(site.cache_dir().join("blog/old-post.stale.html")).into_diagnostic()?;

    let stderr = run_binary(&site, "0")?;
    let deleted = logged_paths(&stderr, "Deleted: ");

    assert_eq!(
        deleted,
        BTreeSet::from([site.cache_dir().join("blog/old-post.html")])
    );
    assert!(stderr.contains("Warning: failed to remove"));
    assert!(stderr.contains("1 cache files could not be removed"));
    assert!(site.cache_dir().join("blog/old-post.stale.html").is_dir());

    Ok(())
}
