//! Debian-style site, module and conf management (`a2ensite` and friends).

use std::fmt;
use std::fs;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info};

use crate::commands::{CommandLine, CommandRunner};
use crate::error::Result;

/// What an `a2en*`/`a2dis*` utility acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Site,
    Mod,
    Conf,
}

impl Target {
    pub fn label(&self) -> &'static str {
        match self {
            Target::Site => "Site",
            Target::Mod => "Mod",
            Target::Conf => "Conf",
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            Target::Site => "site",
            Target::Mod => "mod",
            Target::Conf => "conf",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Enable,
    Disable,
}

impl Toggle {
    fn verb(&self) -> &'static str {
        match self {
            Toggle::Enable => "Enable",
            Toggle::Disable => "Disable",
        }
    }

    fn past(&self) -> &'static str {
        match self {
            Toggle::Enable => "enabled",
            Toggle::Disable => "disabled",
        }
    }

    /// `a2enmod`, `a2dissite`, ...
    pub fn utility(&self, target: Target) -> String {
        let prefix = match self {
            Toggle::Enable => "a2en",
            Toggle::Disable => "a2dis",
        };
        format!("{}{}", prefix, target.suffix())
    }

    // The disabling tools report a missing target as the raw wait status
    // (256); their exit code 1 is passed through like any other failure
    fn is_not_found(&self, code: i32) -> bool {
        match self {
            Toggle::Enable => code == 1,
            Toggle::Disable => code == 256,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleStatus {
    Done,
    NotFound,
    /// Any other exit code, passed through
    Exit(i32),
}

/// Outcome of one `a2en*`/`a2dis*` run.
///
/// Serializes as `{"Name": "Apache2 Enable Mod", "Mod": "status", "Status": "Mod status enabled"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleReport {
    pub toggle: Toggle,
    pub target: Target,
    pub name: String,
    pub status: ToggleStatus,
}

impl ToggleReport {
    pub fn title(&self) -> String {
        format!("Apache2 {} {}", self.toggle.verb(), self.target.label())
    }

    pub fn message(&self) -> String {
        let label = self.target.label();
        match &self.status {
            ToggleStatus::Done => format!("{} {} {}", label, self.name, self.toggle.past()),
            ToggleStatus::NotFound => format!("{} {} Not found", label, self.name),
            ToggleStatus::Exit(code) => code.to_string(),
        }
    }
}

impl fmt::Display for ToggleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title(), self.message())
    }
}

impl Serialize for ToggleReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("Name", &self.title())?;
        map.serialize_entry(self.target.label(), &self.name)?;
        match &self.status {
            ToggleStatus::Exit(code) => map.serialize_entry("Status", code)?,
            _ => map.serialize_entry("Status", &self.message())?,
        }
        map.end()
    }
}

/// Run the `a2en*`/`a2dis*` utility for `target` and interpret its exit code
pub fn toggle<R: CommandRunner + ?Sized>(
    runner: &R,
    toggle: Toggle,
    target: Target,
    name: &str,
) -> Result<ToggleReport> {
    let command = CommandLine::new(toggle.utility(target)).arg(name);
    let code = runner.retcode(&command)?;

    let status = if code == 0 {
        ToggleStatus::Done
    } else if toggle.is_not_found(code) {
        ToggleStatus::NotFound
    } else {
        ToggleStatus::Exit(code)
    };

    let report = ToggleReport {
        toggle,
        target,
        name: name.to_string(),
        status,
    };
    info!(%command, code, "{}", report.message());
    Ok(report)
}

pub fn a2ensite<R: CommandRunner + ?Sized>(runner: &R, site: &str) -> Result<ToggleReport> {
    toggle(runner, Toggle::Enable, Target::Site, site)
}

pub fn a2dissite<R: CommandRunner + ?Sized>(runner: &R, site: &str) -> Result<ToggleReport> {
    toggle(runner, Toggle::Disable, Target::Site, site)
}

pub fn a2enmod<R: CommandRunner + ?Sized>(runner: &R, module: &str) -> Result<ToggleReport> {
    toggle(runner, Toggle::Enable, Target::Mod, module)
}

pub fn a2dismod<R: CommandRunner + ?Sized>(runner: &R, module: &str) -> Result<ToggleReport> {
    toggle(runner, Toggle::Disable, Target::Mod, module)
}

pub fn a2enconf<R: CommandRunner + ?Sized>(runner: &R, conf: &str) -> Result<ToggleReport> {
    toggle(runner, Toggle::Enable, Target::Conf, conf)
}

pub fn a2disconf<R: CommandRunner + ?Sized>(runner: &R, conf: &str) -> Result<ToggleReport> {
    toggle(runner, Toggle::Disable, Target::Conf, conf)
}

/// Is `site` linked into the sites-enabled directory?
///
/// `example.com` and `example.com.conf` are equivalent. `default` also
/// matches the `000-default.conf` link Debian ships.
pub fn check_site_enabled(sites_enabled: &Path, site: &str) -> bool {
    let site_file = with_suffix(site, &[".conf"], ".conf");
    if is_link(&sites_enabled.join(&site_file)) {
        return true;
    }
    site == "default" && is_link(&sites_enabled.join(format!("000-{}", site_file)))
}

/// Is `module` linked into the mods-enabled directory?
///
/// A bare name checks `<module>.load`; `.load` and `.conf` names are used as given.
pub fn check_mod_enabled(mods_enabled: &Path, module: &str) -> bool {
    let mod_file = with_suffix(module, &[".load", ".conf"], ".load");
    is_link(&mods_enabled.join(mod_file))
}

/// Is `conf` linked into the conf-enabled directory?
pub fn check_conf_enabled(conf_enabled: &Path, conf: &str) -> bool {
    let conf_file = with_suffix(conf, &[".conf"], ".conf");
    is_link(&conf_enabled.join(conf_file))
}

fn with_suffix(name: &str, accepted: &[&str], default: &str) -> String {
    if accepted.iter().any(|suffix| name.ends_with(suffix)) {
        name.to_string()
    } else {
        format!("{}{}", name, default)
    }
}

fn is_link(path: &Path) -> bool {
    let linked = fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    debug!(path = %path.display(), linked, "checked link");
    linked
}
