//! External tool capabilities.
//!
//! The pipeline never spawns processes itself. It talks to four narrow
//! traits, one method per subcommand it needs. The command-backed
//! implementations live in the submodules; tests swap in recording fakes.

use std::path::{Path, PathBuf};

use nod_schema::SriHash;

use crate::error::Result;

pub mod command;
pub mod git;
pub mod nix;
pub mod rsync;

#[cfg(test)]
pub(crate) mod fake;

pub use command::ToolCommand;
pub use git::Git;
pub use nix::{Nix, NixHash};
pub use rsync::Rsync;

/// Version control operations.
pub trait Vcs {
    /// Absolute path of the repository containing the working directory.
    fn repo_root(&self) -> Result<PathBuf>;

    /// Write an archive of `rev` to `output`, every entry prefixed with `prefix`.
    fn archive(&self, repo_root: &Path, prefix: &str, output: &Path, rev: &str) -> Result<()>;

    /// Stage `path` in the index.
    fn add(&self, repo_root: &Path, path: &Path) -> Result<()>;
}

/// A single `nix build` of one installable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Flake installable, e.g. `.#bootstrapZip-aarch64-linux`.
    pub installable: String,
    /// Allow the evaluation to read the environment.
    pub impure: bool,
    /// Extra environment for the build process.
    pub env: Vec<(String, String)>,
}

impl BuildRequest {
    /// A pure build of `installable`.
    pub fn pure(installable: impl Into<String>) -> Self {
        Self {
            installable: installable.into(),
            impure: false,
            env: Vec::new(),
        }
    }

    /// An impure build of `installable` that sees `env`.
    pub fn impure(installable: impl Into<String>, env: Vec<(String, String)>) -> Self {
        Self {
            installable: installable.into(),
            impure: true,
            env,
        }
    }
}

/// Builds installables and reports where the output landed.
pub trait BuildTool {
    /// Build without creating a result link and return the output path.
    fn build(&self, repo_root: &Path, request: &BuildRequest) -> Result<PathBuf>;
}

/// Computes content hashes of build artifacts.
pub trait ContentHasher {
    /// SHA-256 hash of `path` in SRI form.
    fn hash_path(&self, path: &Path) -> Result<SriHash>;
}

/// Copies artifacts to a destination.
pub trait Syncer {
    /// Transfer every source to `dest`.
    fn sync(&self, sources: &[PathBuf], dest: &str) -> Result<()>;
}
