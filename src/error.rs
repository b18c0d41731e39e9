//! Error types for apacheconf

use std::path::PathBuf;

use thiserror::Error;

/// Result type for apacheconf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for apacheconf
#[derive(Error, Debug)]
pub enum Error {
    /// Manifest value that has no directive-tree shape
    #[error("unsupported value at {path}: {reason}")]
    InvalidTree { path: String, reason: String },

    /// Top-level render called with a bare scalar or list
    #[error("<{block}> must be a mapping or a sequence of mappings, not a {shape}")]
    NotABlock { block: String, shape: &'static str },

    /// The reserved `this` key holds something other than a scalar
    #[error(
        "Apache section container <{block}> expects a scalar attribute in key \"this\", \
         got a {shape}"
    )]
    InvalidArgument { block: String, shape: &'static str },

    /// Tree nested past the renderer's depth limit
    #[error("<{block}> is nested deeper than {limit} levels")]
    NestingTooDeep { block: String, limit: usize },

    /// Failed to start an external command
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Command ran but its output could not be interpreted
    #[error("unexpected output from `{command}`: {detail}")]
    UnexpectedOutput { command: String, detail: String },

    /// Unknown apachectl signal name
    #[error(
        "unknown signal '{0}' (expected start, stop, restart, graceful, graceful-stop, \
         configtest, status or fullstatus)"
    )]
    UnknownSignal(String),

    /// server-status endpoint could not be fetched
    #[error("failed to fetch server status from {url}: {reason}")]
    Status { url: String, reason: String },

    /// Missing status profile
    #[error("no server-status profile named '{0}'")]
    UnknownProfile(String),

    /// Filesystem error with the path involved
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
