use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use tracing::{debug, info};

use crate::commands::{CommandLine, CommandRunner};
use crate::error::{Error, Result};
use crate::parser::*;

/// `apachectl` queries and signals
pub struct Apache<R> {
    runner: R,
    ctl: String,
}

impl<R: CommandRunner> Apache<R> {
    /// `ctl` is the control binary, e.g. `apachectl` or `apache2ctl`
    pub fn new(runner: R, ctl: impl Into<String>) -> Self {
        Self {
            runner,
            ctl: ctl.into(),
        }
    }

    fn ctl(&self, flag: &str) -> CommandLine {
        CommandLine::new(&self.ctl).arg(flag)
    }

    /// Server version (`apachectl -v`)
    pub fn version(&self) -> Result<String> {
        let command = self.ctl("-v");
        let out = self.runner.run(&command)?;
        parse_version(&out).ok_or_else(|| Error::UnexpectedOutput {
            command: command.to_string(),
            detail: "no version on the first line".to_string(),
        })
    }

    /// Server version and build parameters (`apachectl -V`)
    pub fn fullversion(&self) -> Result<FullVersion> {
        let out = self.runner.run(&self.ctl("-V"))?;
        Ok(parse_fullversion(&out))
    }

    /// Static and shared modules (`apachectl -M`)
    pub fn modules(&self) -> Result<LoadedModules> {
        let out = self.runner.run(&self.ctl("-M"))?;
        Ok(parse_modules(&out))
    }

    /// Modules compiled into the server (`apachectl -l`)
    pub fn servermods(&self) -> Result<Vec<String>> {
        let out = self.runner.run(&self.ctl("-l"))?;
        Ok(parse_servermods(&out))
    }

    /// Directives with their arguments and allowed contexts (`apachectl -L`)
    pub fn directives(&self) -> Result<BTreeMap<String, String>> {
        let out = self.runner.run(&self.ctl("-L"))?;
        Ok(parse_directives(&out))
    }

    /// Virtual host settings as parsed from the config (`apachectl -S`).
    ///
    /// Each additional virtual host adds to the run time of this command.
    pub fn vhosts(&self) -> Result<VirtualHosts> {
        let out = self.runner.run(&self.ctl("-S"))?;
        let vhosts = parse_vhosts(&out);
        debug!(groups = vhosts.len(), "parsed vhosts");
        Ok(vhosts)
    }

    /// Send `signal` to httpd and report what it printed
    pub fn signal(&self, signal: Signal) -> Result<String> {
        let mut command = CommandLine::new(&self.ctl);
        if signal.is_process_signal() {
            command = command.arg("-k");
        }
        command = command.arg(signal.as_str());

        info!(%command, "signalling httpd");
        let out = self.runner.run_all(&command)?;

        // `configtest` reports "Syntax OK" on stderr, so stderr wins over
        // stdout regardless of the exit code
        let stderr = out.stderr.trim();
        let stdout = out.stdout.trim();
        let message = if !stderr.is_empty() {
            stderr.to_string()
        } else if !stdout.is_empty() {
            stdout.to_string()
        } else {
            format!("Command: \"{}\" completed successfully!", command)
        };

        Ok(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Start,
    Stop,
    Restart,
    Graceful,
    GracefulStop,
    ConfigTest,
    Status,
    FullStatus,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Start => "start",
            Signal::Stop => "stop",
            Signal::Restart => "restart",
            Signal::Graceful => "graceful",
            Signal::GracefulStop => "graceful-stop",
            Signal::ConfigTest => "configtest",
            Signal::Status => "status",
            Signal::FullStatus => "fullstatus",
        }
    }

    /// Sent with `-k`; the rest are plain apachectl subcommands
    pub fn is_process_signal(&self) -> bool {
        !matches!(self, Signal::ConfigTest | Signal::Status | Signal::FullStatus)
    }
}

impl FromStr for Signal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "start" => Ok(Signal::Start),
            "stop" => Ok(Signal::Stop),
            "restart" => Ok(Signal::Restart),
            "graceful" => Ok(Signal::Graceful),
            "graceful-stop" => Ok(Signal::GracefulStop),
            "configtest" => Ok(Signal::ConfigTest),
            "status" => Ok(Signal::Status),
            "fullstatus" => Ok(Signal::FullStatus),
            other => Err(Error::UnknownSignal(other.to_string())),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
