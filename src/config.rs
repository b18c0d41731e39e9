//! Runtime settings.
//!
//! Read from a JSON file; every field has a default so an empty object
//! (or no file at all) is a valid configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};

pub const DEFAULT_MANAGED_HEADER: &str = "# This file is managed by apacheconf.";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Control binary: `apachectl` on RedHat-likes, `apache2ctl` on Debian and SUSE
    pub apachectl: String,
    pub sites_enabled_dir: PathBuf,
    pub mods_enabled_dir: PathBuf,
    pub conf_enabled_dir: PathBuf,
    /// First line written to every generated config file
    pub managed_header: String,
    pub status_profiles: BTreeMap<String, StatusProfile>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            apachectl: "apachectl".to_string(),
            sites_enabled_dir: PathBuf::from("/etc/apache2/sites-enabled"),
            mods_enabled_dir: PathBuf::from("/etc/apache2/mods-enabled"),
            conf_enabled_dir: PathBuf::from("/etc/apache2/conf-enabled"),
            managed_header: DEFAULT_MANAGED_HEADER.to_string(),
            status_profiles: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Default settings file, `<config dir>/apacheconf/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("apacheconf").join("config.json"))
    }

    /// Load settings from `path`, which must exist
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let settings = serde_json::from_str(&content)?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load from an explicit path, or from the default path when it exists.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => {
                debug!("no settings file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Status profile by name. `default` always resolves, falling back to
    /// the built-in profile when none is configured.
    pub fn status_profile(&self, name: &str) -> Result<StatusProfile> {
        match self.status_profiles.get(name) {
            Some(profile) => Ok(profile.clone()),
            None if name == "default" => Ok(StatusProfile::default()),
            None => Err(Error::UnknownProfile(name.to_string())),
        }
    }
}

/// Where and how to reach one `server-status` handler
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusProfile {
    pub url: String,
    pub user: String,
    #[serde(rename = "pass")]
    pub password: String,
    /// Realm the credentials belong to; empty answers any realm
    pub realm: String,
    /// Seconds
    pub timeout: u64,
}

impl Default for StatusProfile {
    fn default() -> Self {
        Self {
            url: "http://localhost/server-status".to_string(),
            user: String::new(),
            password: String::new(),
            realm: String::new(),
            timeout: 5,
        }
    }
}

impl StatusProfile {
    pub fn has_credentials(&self) -> bool {
        !self.user.is_empty() && !self.password.is_empty()
    }
}
