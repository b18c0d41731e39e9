//! Parsers for the text printed by `apachectl` and friends.
//!
//! Each function takes the captured stdout of one command and returns a
//! structured value. None of them run anything.

use std::collections::BTreeMap;

use tracing::debug;

use crate::parser::types::*;

/// `apachectl -v`: `Server version: Apache/2.4.7 (Ubuntu)` → `Apache/2.4.7 (Ubuntu)`
pub fn parse_version(output: &str) -> Option<String> {
    let first = output.lines().next()?;
    first.split(": ").nth(1).map(str::to_string)
}

/// `apachectl -V`
pub fn parse_fullversion(output: &str) -> FullVersion {
    let mut ret = FullVersion::default();

    for line in output.lines() {
        if line.contains(": ") {
            let mut comps = line.split(": ");
            let key = comps.next().unwrap_or_default().trim().to_lowercase().replace(' ', "_");
            let value = comps.next().unwrap_or_default();
            // `compiled_with` is the define list; a line by that name would
            // shadow it once `info` is flattened
            if key == COMPILED_WITH {
                debug!(line, "skipping fullversion line that collides with the define list");
                continue;
            }
            ret.info.insert(key, value.trim().to_string());
        } else if line.contains(" -D") {
            ret.compiled_with.push(strip_define(line).to_string());
        }
    }

    ret
}

// Removes the leading `-D` flag and surrounding whitespace from ` -D APR_HAS_MMAP`
fn strip_define(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix("-D") {
        Some(rest) if line.len() > trimmed.len() && rest.starts_with(char::is_whitespace) => {
            rest.trim_start()
        }
        _ => line,
    }
}

/// `apachectl -M`
pub fn parse_modules(output: &str) -> LoadedModules {
    let mut ret = LoadedModules::default();

    for line in output.lines() {
        let Some(name) = line.split_whitespace().next() else {
            continue;
        };
        if line.contains("(static)") {
            ret.static_modules.push(name.to_string());
        }
        if line.contains("(shared)") {
            ret.shared.push(name.to_string());
        }
    }

    ret
}

/// `apachectl -l`
pub fn parse_servermods(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.is_empty() && line.contains(".c"))
        .map(|line| line.trim().to_string())
        .collect()
}

/// `apachectl -L`: directive name → description.
///
/// Continuation lines start with a tab; they are folded into their
/// directive and joined back with newlines.
pub fn parse_directives(output: &str) -> BTreeMap<String, String> {
    let folded = output.replace("\n\t", "\t");
    let mut ret = BTreeMap::new();

    for line in folded.lines() {
        if line.is_empty() {
            continue;
        }
        let mut comps = line.split('\t');
        let name = comps.next().unwrap_or_default();
        let description = comps.collect::<Vec<_>>().join("\n");
        ret.insert(name.to_string(), description);
    }

    ret
}

/// `apachectl -S`
pub fn parse_vhosts(output: &str) -> VirtualHosts {
    let mut ret = VirtualHosts::new();
    let mut current: Option<String> = None;

    for line in output.lines() {
        let comps: Vec<&str> = line.split_whitespace().collect();
        if comps.is_empty() {
            continue;
        }

        if line.contains("is a NameVirtualHost") {
            let name = comps[0].to_string();
            ret.insert(name.clone(), BTreeMap::new());
            current = Some(name);
            continue;
        }

        let Some(group) = current.as_ref().and_then(|name| ret.get_mut(name)) else {
            debug!(line, "skipping vhost line outside a NameVirtualHost group");
            continue;
        };

        match comps[0] {
            "default" if comps.len() >= 4 => {
                group.insert(
                    "default".to_string(),
                    VirtualHostEntry {
                        vhost: comps[2].to_string(),
                        conf: strip_parens(comps[3]),
                        port: None,
                    },
                );
            }
            "port" if comps.len() >= 5 => {
                group.insert(
                    comps[3].to_string(),
                    VirtualHostEntry {
                        vhost: comps[3].to_string(),
                        conf: strip_parens(comps[4]),
                        port: Some(comps[1].to_string()),
                    },
                );
            }
            _ => {}
        }
    }

    ret
}

fn strip_parens(text: &str) -> String {
    text.replace(['(', ')'], "")
}

/// SUSE `a2enmod -l`: whitespace separated list of enabled modules
pub fn parse_enabled_modules(output: &str) -> Vec<String> {
    output.split_whitespace().map(str::to_string).collect()
}
