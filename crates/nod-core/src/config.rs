//! Deploy configuration.
//!
//! Settings come from three layers, highest priority first: command-line
//! flags (with their environment fallbacks, handled by the binary), an
//! optional TOML file, and built-in defaults. External tools are located
//! through the config file, then a per-tool environment variable, then
//! `PATH`.
//!
//! ```toml
//! arches = ["aarch64-linux"]
//! rsync_target = "user@host:/srv/bootstrap"
//! bootstrap_url = "https://example.com/bootstrap"
//!
//! [tools]
//! nix = "/nix/var/nix/profiles/default/bin/nix"
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use nod_schema::Arch;
use serde::Deserialize;

use crate::error::{DeployError, Result};

/// Contents of the optional config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    /// Architectures to build when none are given on the command line.
    #[serde(default)]
    pub arches: Vec<Arch>,
    /// Default rsync destination.
    pub rsync_target: Option<String>,
    /// Default bootstrap URL override.
    pub bootstrap_url: Option<String>,
    /// Explicit tool locations.
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Explicit executable paths, one per external tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    /// Path to `git`.
    pub git: Option<PathBuf>,
    /// Path to `nix`.
    pub nix: Option<PathBuf>,
    /// Path to `nix-hash`.
    pub nix_hash: Option<PathBuf>,
    /// Path to `rsync`.
    pub rsync: Option<PathBuf>,
}

impl DeployConfig {
    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Config`] if the file cannot be read, is not
    /// valid TOML, or contains unknown keys.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DeployError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// Parse config text; `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::Config`] on invalid TOML or unknown keys.
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| DeployError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

/// The external tools the pipeline drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Version control.
    Git,
    /// Build tool.
    Nix,
    /// Content-hash tool.
    NixHash,
    /// File synchronization.
    Rsync,
}

impl Tool {
    /// Executable name looked up on `PATH`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Nix => "nix",
            Self::NixHash => "nix-hash",
            Self::Rsync => "rsync",
        }
    }

    /// Environment variable overriding the executable path.
    pub fn env_var(self) -> &'static str {
        match self {
            Self::Git => "NOD_GIT",
            Self::Nix => "NOD_NIX",
            Self::NixHash => "NOD_NIX_HASH",
            Self::Rsync => "NOD_RSYNC",
        }
    }
}

impl ToolsConfig {
    /// Path configured for `tool`, if any.
    pub fn configured(&self, tool: Tool) -> Option<&Path> {
        match tool {
            Tool::Git => self.git.as_deref(),
            Tool::Nix => self.nix.as_deref(),
            Tool::NixHash => self.nix_hash.as_deref(),
            Tool::Rsync => self.rsync.as_deref(),
        }
    }

    /// Locate `tool`: config entry, then its environment variable, then `PATH`.
    ///
    /// `env` is the environment lookup, normally `std::env::var_os`. Only
    /// fixed variable names are looked up.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::ToolNotFound`] if the `PATH` search fails.
    pub fn locate(
        &self,
        tool: Tool,
        env: impl Fn(&'static str) -> Option<OsString>,
    ) -> Result<PathBuf> {
        if let Some(path) = self.configured(tool) {
            return Ok(path.to_path_buf());
        }
        if let Some(path) = env(tool.env_var()).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let found = which::which_in(tool.name(), env("PATH"), ".").map_err(|source| {
            DeployError::ToolNotFound {
                tool: tool.name(),
                env_var: tool.env_var(),
                source,
            }
        })?;
        tracing::debug!("located {} at {}", tool.name(), found.display());
        Ok(found)
    }
}
