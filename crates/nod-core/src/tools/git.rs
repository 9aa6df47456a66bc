//! `git` backed [`Vcs`].

use std::path::{Path, PathBuf};

use super::{ToolCommand, Vcs};
use crate::error::{DeployError, Result};

/// Drives the `git` executable.
#[derive(Debug, Clone)]
pub struct Git {
    cmd: ToolCommand,
}

impl Git {
    /// Use the `git` executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            cmd: ToolCommand::new(program),
        }
    }
}

impl Vcs for Git {
    fn repo_root(&self) -> Result<PathBuf> {
        let root = self
            .cmd
            .invoke()
            .args(["rev-parse", "--show-toplevel"])
            .capture()?;
        if root.is_empty() {
            return Err(DeployError::EmptyOutput {
                program: self.cmd.program().display().to_string(),
            });
        }
        Ok(PathBuf::from(root))
    }

    fn archive(&self, repo_root: &Path, prefix: &str, output: &Path, rev: &str) -> Result<()> {
        self.cmd
            .invoke()
            .current_dir(repo_root)
            .args(["archive", "--prefix", prefix, "--output"])
            .arg(output)
            .arg(rev)
            .run()
    }

    fn add(&self, repo_root: &Path, path: &Path) -> Result<()> {
        self.cmd
            .invoke()
            .current_dir(repo_root)
            .arg("add")
            .arg(path)
            .run()
    }
}
