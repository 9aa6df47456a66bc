//! Domain-specific errors for the deploy pipeline

use std::path::PathBuf;
use std::process::ExitStatus;

use nod_schema::{ArchError, HashError, UrlError};
use thiserror::Error;

/// Every fatal condition a deployment can hit.
///
/// Configuration errors are raised before any external command runs;
/// command errors abort the run wherever they happen.
#[derive(Error, Debug)]
pub enum DeployError {
    /// The public URL has an unsupported shape.
    #[error(transparent)]
    UnsupportedUrl(#[from] UrlError),

    /// A `github:` public URL was given without a bootstrap URL.
    #[error("--bootstrap-url must be provided for github URLs")]
    MissingBootstrapUrl,

    /// An architecture identifier was rejected.
    #[error("invalid architecture: {0}")]
    InvalidArch(#[from] ArchError),

    /// The config file could not be read or parsed.
    #[error("failed to load config {}: {message}", path.display())]
    Config {
        /// Path of the config file.
        path: PathBuf,
        /// Parser or I/O message.
        message: String,
    },

    /// An external tool could not be located.
    #[error("could not find `{tool}` (set {env_var} or tools.{tool} in the config)")]
    ToolNotFound {
        /// Executable name.
        tool: &'static str,
        /// Environment variable that overrides the lookup.
        env_var: &'static str,
        /// Underlying lookup failure.
        #[source]
        source: which::Error,
    },

    /// An external tool could not be started.
    #[error("failed to execute {program}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An external tool exited unsuccessfully.
    #[error("{program} {} failed ({status})", args.join(" "))]
    CommandFailed {
        /// Program that failed.
        program: String,
        /// Arguments it was given.
        args: Vec<String>,
        /// Its exit status.
        status: ExitStatus,
    },

    /// An external tool printed something that was not UTF-8.
    #[error("{program} output was not valid UTF-8")]
    NonUtf8Output {
        /// Program whose output was rejected.
        program: String,
    },

    /// An external tool succeeded but printed nothing usable.
    #[error("{program} printed no output")]
    EmptyOutput {
        /// Program whose output was empty.
        program: String,
    },

    /// The content-hash tool printed something that is not an SRI hash.
    #[error("content hash tool returned an invalid hash: {0}")]
    InvalidHash(#[from] HashError),

    /// Reading or writing a file failed.
    #[error("I/O error on {}", path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl DeployError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = DeployError> = std::result::Result<T, E>;
