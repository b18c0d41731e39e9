//! mod_status support: fetch `server-status?auto` and parse it.
//!
//! The server-status handler is disabled in a stock Apache install and has
//! to be enabled before any of this works.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::StatusCode;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::StatusProfile;
use crate::error::{Error, Result};

/// Scoreboard legend, in the order mod_status documents it
pub const SCOREBOARD_KEYS: [char; 11] = ['_', 'S', 'R', 'W', 'K', 'D', 'C', 'L', 'G', 'I', '.'];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatusValue {
    Integer(u64),
    Float(f64),
    Text(String),
}

/// Worker count per scoreboard state.
///
/// Starts with the legend in order; states outside it are appended as
/// they are first seen. Serializes as a JSON object in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct Scoreboard {
    counts: Vec<(char, u64)>,
}

impl Scoreboard {
    pub fn get(&self, state: char) -> Option<u64> {
        self.counts
            .iter()
            .find(|(key, _)| *key == state)
            .map(|&(_, count)| count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.counts.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    fn increment(&mut self, state: char) {
        match self.counts.iter_mut().find(|(key, _)| *key == state) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((state, 1)),
        }
    }
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self {
            counts: SCOREBOARD_KEYS.iter().map(|&key| (key, 0)).collect(),
        }
    }
}

impl Serialize for Scoreboard {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (state, count) in &self.counts {
            map.serialize_entry(state, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServerStatus {
    #[serde(rename = "Scoreboard")]
    pub scoreboard: Scoreboard,
    #[serde(flatten)]
    pub values: BTreeMap<String, StatusValue>,
}

/// Parse the machine readable (`?auto`) server-status page
pub fn parse_server_status(body: &str) -> ServerStatus {
    let mut status = ServerStatus::default();

    for line in body.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if key == "Scoreboard" {
            for state in value.chars() {
                status.scoreboard.increment(state);
            }
        } else {
            status.values.insert(key.to_string(), parse_status_value(value));
        }
    }

    status
}

fn parse_status_value(value: &str) -> StatusValue {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(int) = value.parse() {
            return StatusValue::Integer(int);
        }
    }
    match value.parse::<f64>() {
        Ok(float) => StatusValue::Float(float),
        Err(_) => StatusValue::Text(value.to_string()),
    }
}

/// Fetches the raw body of a server-status page
#[cfg_attr(test, mockall::automock)]
pub trait StatusFetcher {
    fn fetch(&self, profile: &StatusProfile) -> Result<String>;
}

/// Blocking HTTP fetcher
pub struct HttpStatusFetcher {
    client: reqwest::blocking::Client,
}

impl HttpStatusFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for HttpStatusFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpStatusFetcher {
    fn get(&self, url: &str, profile: &StatusProfile) -> reqwest::blocking::RequestBuilder {
        self.client
            .get(url)
            .timeout(Duration::from_secs(profile.timeout))
    }
}

impl StatusFetcher for HttpStatusFetcher {
    fn fetch(&self, profile: &StatusProfile) -> Result<String> {
        let url = auto_url(&profile.url);
        let fail = |reason: String| Error::Status {
            url: url.clone(),
            reason,
        };

        // Credentials are only sent in answer to a challenge, in whichever
        // scheme the server asked for
        let mut response = self
            .get(&url, profile)
            .send()
            .map_err(|e| fail(e.to_string()))?;
        if response.status() == StatusCode::UNAUTHORIZED && profile.has_credentials() {
            let challenges: Vec<String> = response
                .headers()
                .get_all(WWW_AUTHENTICATE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .map(str::to_string)
                .collect();
            let uri = request_uri(&url).map_err(fail)?;

            let request = match answer_challenge(profile, &challenges, &uri)? {
                Authorization::Basic => {
                    self.get(&url, profile).basic_auth(&profile.user, Some(&profile.password))
                }
                Authorization::Digest(header) => {
                    self.get(&url, profile).header(AUTHORIZATION, header)
                }
            };
            response = request.send().map_err(|e| fail(e.to_string()))?;
        }

        let http_status = response.status();
        if !http_status.is_success() {
            return Err(fail(format!("HTTP {}", http_status)));
        }

        response.text().map_err(|e| fail(e.to_string()))
    }
}

/// How to answer a `401` from the status page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Basic,
    /// Complete `Authorization` header value
    Digest(String),
}

/// Pick an answer to the server's `WWW-Authenticate` challenges.
///
/// Digest is preferred over Basic when both are offered. A non-empty
/// `profile.realm` must match the challenge's realm, otherwise the
/// credentials are not for this server and nothing is sent.
pub fn answer_challenge(
    profile: &StatusProfile,
    challenges: &[String],
    uri: &str,
) -> Result<Authorization> {
    let refuse = |reason: String| Error::Status {
        url: profile.url.clone(),
        reason,
    };
    let offered = |scheme: &str| {
        challenges.iter().find(|challenge| {
            challenge
                .trim_start()
                .get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        })
    };

    if let Some(challenge) = offered("Digest") {
        let mut prompt = digest_auth::parse(challenge)
            .map_err(|e| refuse(format!("bad digest challenge: {}", e)))?;
        check_realm(profile, &prompt.realm).map_err(refuse)?;

        let context = digest_auth::AuthContext::new(
            profile.user.as_str(),
            profile.password.as_str(),
            uri,
        );
        let answer = prompt
            .respond(&context)
            .map_err(|e| refuse(format!("cannot answer digest challenge: {}", e)))?;
        debug!(realm = %prompt.realm, "answering digest challenge");
        return Ok(Authorization::Digest(answer.to_header_string()));
    }

    if let Some(challenge) = offered("Basic") {
        let realm = challenge_realm(challenge).unwrap_or_default();
        check_realm(profile, realm).map_err(refuse)?;
        debug!(realm, "answering basic challenge");
        return Ok(Authorization::Basic);
    }

    Err(refuse(format!(
        "no supported authentication challenge in {:?}",
        challenges
    )))
}

fn check_realm(profile: &StatusProfile, realm: &str) -> std::result::Result<(), String> {
    if profile.realm.is_empty() || profile.realm == realm {
        Ok(())
    } else {
        Err(format!(
            "server asked for realm '{}', profile is for '{}'",
            realm, profile.realm
        ))
    }
}

// `Basic realm="status pages"` → `status pages`
fn challenge_realm(challenge: &str) -> Option<&str> {
    let rest = &challenge[challenge.find("realm=")? + "realm=".len()..];
    match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next(),
        None => rest.split(',').next().map(str::trim),
    }
}

// Path and query, as digest responses quote them
fn request_uri(url: &str) -> std::result::Result<String, String> {
    let parsed = reqwest::Url::parse(url).map_err(|e| e.to_string())?;
    Ok(match parsed.query() {
        Some(query) => format!("{}?{}", parsed.path(), query),
        None => parsed.path().to_string(),
    })
}

fn auto_url(url: &str) -> String {
    format!("{}?auto", url)
}

/// Fetch and parse the status page described by `profile`
pub fn server_status<F: StatusFetcher + ?Sized>(
    fetcher: &F,
    profile: &StatusProfile,
) -> Result<ServerStatus> {
    let body = fetcher.fetch(profile).map_err(|e| {
        warn!(url = %profile.url, error = %e, "server-status unavailable");
        e
    })?;
    Ok(parse_server_status(&body))
}
