use std::fs;
use std::path::PathBuf;

use apacheconf::config::DEFAULT_MANAGED_HEADER;
use apacheconf::{Error, Settings, StatusProfile};

#[test]
fn test_defaults() {
    let settings = Settings::default();

    assert_eq!(settings.apachectl, "apachectl");
    assert_eq!(settings.mods_enabled_dir, PathBuf::from("/etc/apache2/mods-enabled"));
    assert_eq!(settings.managed_header, DEFAULT_MANAGED_HEADER);
    assert!(settings.status_profiles.is_empty());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        serde_json::json!({
            "apachectl": "apache2ctl",
            "status_profiles": {
                "edge": {"url": "http://edge/server-status", "user": "u", "pass": "p"}
            }
        })
        .to_string(),
    )
    .unwrap();

    let settings = Settings::load(Some(&path)).unwrap();

    assert_eq!(settings.apachectl, "apache2ctl");
    assert_eq!(settings.sites_enabled_dir, PathBuf::from("/etc/apache2/sites-enabled"));

    let edge = settings.status_profile("edge").unwrap();
    assert_eq!(edge.url, "http://edge/server-status");
    assert_eq!(edge.password, "p");
    assert_eq!(edge.timeout, 5);
    assert!(edge.has_credentials());
}

#[test]
fn test_default_profile_always_resolves() {
    let settings = Settings::default();

    assert_eq!(settings.status_profile("default").unwrap(), StatusProfile::default());
    assert!(matches!(
        settings.status_profile("other"),
        Err(Error::UnknownProfile(name)) if name == "other"
    ));
}

#[test]
fn test_unknown_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"apachctl": "typo"}"#).unwrap();

    assert!(matches!(Settings::load(Some(&path)), Err(Error::Json(_))));
}

#[test]
fn test_explicit_missing_file_is_an_error() {
    let err = Settings::load(Some(&PathBuf::from("/nonexistent/apacheconf.json"))).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_profile_without_credentials() {
    let profile = StatusProfile {
        user: "someone".to_string(),
        ..StatusProfile::default()
    };
    assert!(!profile.has_credentials());
}
