#![cfg(unix)]

use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;

use apacheconf::commands::{check_conf_enabled, check_mod_enabled, check_site_enabled};
use tempfile::TempDir;

fn link(dir: &Path, name: &str) {
    symlink("/dev/null", dir.join(name)).unwrap();
}

fn enabled_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_check_site_enabled() {
    let dir = enabled_dir();
    link(dir.path(), "example.com.conf");

    assert!(check_site_enabled(dir.path(), "example.com"));
    assert!(check_site_enabled(dir.path(), "example.com.conf"));
    assert!(!check_site_enabled(dir.path(), "other.com"));
}

#[test]
fn test_check_default_site_matches_numbered_link() {
    let dir = enabled_dir();
    link(dir.path(), "000-default.conf");

    assert!(check_site_enabled(dir.path(), "default"));
    assert!(!check_site_enabled(dir.path(), "default.conf"));
}

#[test]
fn test_regular_file_is_not_enabled() {
    let dir = enabled_dir();
    fs::write(dir.path().join("plain.conf"), "").unwrap();

    assert!(!check_site_enabled(dir.path(), "plain"));
    assert!(!check_conf_enabled(dir.path(), "plain"));
}

#[test]
fn test_check_mod_enabled_suffixes() {
    let dir = enabled_dir();
    link(dir.path(), "status.load");
    link(dir.path(), "ssl.conf");

    assert!(check_mod_enabled(dir.path(), "status"));
    assert!(check_mod_enabled(dir.path(), "status.load"));
    assert!(check_mod_enabled(dir.path(), "ssl.conf"));
    assert!(!check_mod_enabled(dir.path(), "ssl"));
}

#[test]
fn test_check_conf_enabled() {
    let dir = enabled_dir();
    link(dir.path(), "security.conf");

    assert!(check_conf_enabled(dir.path(), "security"));
    assert!(check_conf_enabled(dir.path(), "security.conf"));
    assert!(!check_conf_enabled(dir.path(), "charset"));
}

#[test]
fn test_missing_directory_is_not_an_error() {
    assert!(!check_mod_enabled(Path::new("/nonexistent/mods-enabled"), "status"));
}
