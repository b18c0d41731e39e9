use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use apacheconf::commands::{self, suse, Apache, ProcessRunner, Signal, Target, Toggle};
use apacheconf::sink::{write_config, ConfigSink, FileSink};
use apacheconf::status::{server_status, HttpStatusFetcher};
use apacheconf::{ConfigRenderer, Settings, TreeParser};
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let name_arg = |help: &'static str| Arg::new("name").help(help).required(true).index(1);

    Command::new("apacheconf")
        .about("Render Apache configuration and query apachectl")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("Settings file (defaults to <config dir>/apacheconf/config.json)"),
        )
        .arg(
            Arg::new("apachectl")
                .long("apachectl")
                .global(true)
                .help("Control binary to run, e.g. apache2ctl"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("render")
                .about("Render a JSON manifest to Apache configuration")
                .arg(
                    Arg::new("manifest")
                        .help("JSON manifest: a document, or a block body with --block")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("block")
                        .long("block")
                        .help("Render the manifest as the body of this block"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(clap::value_parser!(PathBuf))
                        .help("Write the result to this file with a managed header"),
                ),
        )
        .subcommand(Command::new("version").about("Server version (apachectl -v)"))
        .subcommand(Command::new("fullversion").about("Server build parameters (apachectl -V)"))
        .subcommand(Command::new("modules").about("Static and shared modules (apachectl -M)"))
        .subcommand(Command::new("servermods").about("Compiled-in modules (apachectl -l)"))
        .subcommand(Command::new("directives").about("Available directives (apachectl -L)"))
        .subcommand(Command::new("vhosts").about("Virtual host settings (apachectl -S)"))
        .subcommand(
            Command::new("signal")
                .about("Signal httpd to start, restart, stop, ...")
                .arg(name_arg(
                    "start, stop, restart, graceful, graceful-stop, configtest, \
                     status or fullstatus",
                )),
        )
        .subcommand(Command::new("enable-site").about("Run a2ensite").arg(name_arg("Site")))
        .subcommand(Command::new("disable-site").about("Run a2dissite").arg(name_arg("Site")))
        .subcommand(Command::new("enable-mod").about("Run a2enmod").arg(name_arg("Module")))
        .subcommand(Command::new("disable-mod").about("Run a2dismod").arg(name_arg("Module")))
        .subcommand(Command::new("enable-conf").about("Run a2enconf").arg(name_arg("Conf")))
        .subcommand(Command::new("disable-conf").about("Run a2disconf").arg(name_arg("Conf")))
        .subcommand(
            Command::new("check-site")
                .about("Is the site linked into sites-enabled?")
                .arg(name_arg("Site")),
        )
        .subcommand(
            Command::new("check-mod")
                .about("Is the module enabled?")
                .arg(name_arg("Module"))
                .arg(
                    Arg::new("suse")
                        .long("suse")
                        .action(ArgAction::SetTrue)
                        .help("Ask `a2enmod -l` instead of checking mods-enabled"),
                ),
        )
        .subcommand(
            Command::new("check-conf")
                .about("Is the conf linked into conf-enabled?")
                .arg(name_arg("Conf")),
        )
        .subcommand(
            Command::new("status")
                .about("Read the mod_status server-status page")
                .arg(
                    Arg::new("profile")
                        .long("profile")
                        .default_value("default")
                        .help("Status profile from the settings file"),
                ),
        )
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn name(matches: &ArgMatches) -> Result<&str> {
    matches
        .get_one::<String>("name")
        .map(String::as_str)
        .context("missing name argument")
}

fn render(settings: &Settings, matches: &ArgMatches) -> Result<()> {
    let manifest_path = matches
        .get_one::<String>("manifest")
        .context("missing manifest argument")?;

    let content = fs::read_to_string(manifest_path)
        .with_context(|| format!("Failed to read manifest {}", manifest_path))?;
    let manifest: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON manifest {}", manifest_path))?;

    let parser = TreeParser::new(&manifest);
    let renderer = ConfigRenderer::new();
    let sink = FileSink::new(&settings.managed_header);
    let output = matches.get_one::<PathBuf>("output");

    let text = match matches.get_one::<String>("block") {
        Some(block) => {
            let tree = parser.parse_tree(block)?;
            let text = renderer.render(block, &tree)?;
            if let Some(path) = output {
                sink.write(path, &text)?;
            }
            text
        }
        None => {
            let document = parser.parse_document()?;
            match output {
                Some(path) => write_config(&renderer, path, &document, &sink, true)?,
                None => renderer.render_document(&document)?,
            }
        }
    };

    if output.is_none() {
        print!("{}", text);
    }

    Ok(())
}

fn main() -> Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let mut settings = Settings::load(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))
        .context("Failed to load settings")?;
    if let Some(ctl) = matches.get_one::<String>("apachectl") {
        settings.apachectl = ctl.clone();
    }
    debug!(apachectl = %settings.apachectl, "settings ready");

    let runner = ProcessRunner;
    let apache = Apache::new(runner, settings.apachectl.clone());

    let Some((command, sub)) = matches.subcommand() else {
        return Ok(());
    };

    match command {
        "render" => render(&settings, sub)?,
        "version" => println!("{}", apache.version()?),
        "fullversion" => print_json(&apache.fullversion()?)?,
        "modules" => print_json(&apache.modules()?)?,
        "servermods" => print_json(&apache.servermods()?)?,
        "directives" => print_json(&apache.directives()?)?,
        "vhosts" => print_json(&apache.vhosts()?)?,
        "signal" => {
            let signal: Signal = name(sub)?.parse()?;
            println!("{}", apache.signal(signal)?);
        }
        "enable-site" => {
            print_json(&commands::toggle(&runner, Toggle::Enable, Target::Site, name(sub)?)?)?
        }
        "disable-site" => {
            print_json(&commands::toggle(&runner, Toggle::Disable, Target::Site, name(sub)?)?)?
        }
        "enable-mod" => {
            print_json(&commands::toggle(&runner, Toggle::Enable, Target::Mod, name(sub)?)?)?
        }
        "disable-mod" => {
            print_json(&commands::toggle(&runner, Toggle::Disable, Target::Mod, name(sub)?)?)?
        }
        "enable-conf" => {
            print_json(&commands::toggle(&runner, Toggle::Enable, Target::Conf, name(sub)?)?)?
        }
        "disable-conf" => {
            print_json(&commands::toggle(&runner, Toggle::Disable, Target::Conf, name(sub)?)?)?
        }
        "check-site" => {
            println!("{}", commands::check_site_enabled(&settings.sites_enabled_dir, name(sub)?))
        }
        "check-mod" => {
            let enabled = if sub.get_flag("suse") {
                suse::check_mod_enabled(&runner, name(sub)?)?
            } else {
                commands::check_mod_enabled(&settings.mods_enabled_dir, name(sub)?)
            };
            println!("{}", enabled);
        }
        "check-conf" => {
            println!("{}", commands::check_conf_enabled(&settings.conf_enabled_dir, name(sub)?))
        }
        "status" => {
            let profile_name = sub
                .get_one::<String>("profile")
                .map(String::as_str)
                .unwrap_or("default");
            let profile = settings.status_profile(profile_name)?;
            match server_status(&HttpStatusFetcher::new(), &profile) {
                Ok(status) => print_json(&status)?,
                Err(_) => println!("error"),
            }
        }
        other => anyhow::bail!("unknown command '{}'", other),
    }

    Ok(())
}
