//! Collect produced artifacts and ship them to the destination.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::reporter::Reporter;
use crate::tools::Syncer;

/// Ordered list of artifacts produced by a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadManifest {
    paths: Vec<PathBuf>,
}

impl UploadManifest {
    /// Empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an artifact.
    pub fn push(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    /// Artifacts in the order they were produced.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of artifacts.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether nothing was produced.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over the artifacts.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }
}

impl fmt::Display for UploadManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, path) in self.paths.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{}'", path.display())?;
        }
        f.write_str("]")
    }
}

/// Where to send artifacts, and how.
#[derive(Debug, Clone)]
pub struct UploadTarget<S> {
    /// Transfer implementation.
    pub syncer: S,
    /// Destination passed verbatim to the syncer (local dir, ssh path, ...).
    pub dest: String,
}

/// What [`upload`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Every artifact was transferred to `dest`.
    Uploaded {
        /// The destination.
        dest: String,
    },
    /// No destination was given; nothing was transferred.
    DryRun,
}

/// Transfer the manifest in one syncer call, or report it when there is
/// no target.
///
/// # Errors
///
/// Propagates the syncer's failure.
pub fn upload<S, R>(
    target: Option<&UploadTarget<S>>,
    reporter: &R,
    manifest: &UploadManifest,
) -> Result<UploadOutcome>
where
    S: Syncer,
    R: Reporter + ?Sized,
{
    let Some(target) = target else {
        reporter.info(&format!("Would have uploaded {manifest}"));
        return Ok(UploadOutcome::DryRun);
    };

    reporter.info("uploading artifacts...");
    target.syncer.sync(manifest.paths(), &target.dest)?;
    tracing::info!("uploaded {} artifacts to {}", manifest.len(), target.dest);
    Ok(UploadOutcome::Uploaded {
        dest: target.dest.clone(),
    })
}
