//! `nix` and `nix-hash` backed [`BuildTool`] and [`ContentHasher`].

use std::path::{Path, PathBuf};

use nod_schema::SriHash;

use super::{BuildRequest, BuildTool, ContentHasher, ToolCommand};
use crate::error::{DeployError, Result};

/// Drives `nix build`.
#[derive(Debug, Clone)]
pub struct Nix {
    cmd: ToolCommand,
}

impl Nix {
    /// Use the `nix` executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            cmd: ToolCommand::new(program),
        }
    }
}

impl BuildTool for Nix {
    fn build(&self, repo_root: &Path, request: &BuildRequest) -> Result<PathBuf> {
        let mut invocation = self
            .cmd
            .invoke()
            .current_dir(repo_root)
            .args(["build", "--no-link", "--print-out-paths"]);
        if request.impure {
            invocation = invocation.arg("--impure");
        }
        invocation = invocation.arg(&request.installable);
        for (key, value) in &request.env {
            invocation = invocation.env(key, value);
        }

        let stdout = invocation.capture()?;
        // One line per output; the default output comes first.
        let out_path = stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| DeployError::EmptyOutput {
                program: self.cmd.program().display().to_string(),
            })?;
        Ok(PathBuf::from(out_path))
    }
}

/// Drives `nix-hash`.
#[derive(Debug, Clone)]
pub struct NixHash {
    cmd: ToolCommand,
}

impl NixHash {
    /// Use the `nix-hash` executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            cmd: ToolCommand::new(program),
        }
    }
}

impl ContentHasher for NixHash {
    fn hash_path(&self, path: &Path) -> Result<SriHash> {
        let stdout = self
            .cmd
            .invoke()
            .args(["--type", "sha256", "--sri"])
            .arg(path)
            .capture()?;
        Ok(SriHash::parse(&stdout)?)
    }
}
