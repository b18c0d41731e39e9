//! SUSE keeps enabled modules in `APACHE_MODULES` instead of symlinks, so
//! the enabled check asks `a2enmod -l`. Enabling and disabling go through
//! the same utilities as on Debian.

use crate::commands::{CommandLine, CommandRunner};
use crate::error::Result;
use crate::parser::parse_enabled_modules;

pub use crate::commands::debian::{a2dismod, a2enmod};

/// Is `module` in the list printed by `a2enmod -l`?
pub fn check_mod_enabled<R: CommandRunner + ?Sized>(runner: &R, module: &str) -> Result<bool> {
    let out = runner.run(&CommandLine::new("a2enmod").arg("-l"))?;
    Ok(parse_enabled_modules(&out).iter().any(|name| name == module))
}
