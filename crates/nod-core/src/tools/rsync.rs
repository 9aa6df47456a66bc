//! `rsync` backed [`Syncer`].

use std::path::PathBuf;

use super::{Syncer, ToolCommand};
use crate::error::Result;

/// Drives `rsync --progress`.
#[derive(Debug, Clone)]
pub struct Rsync {
    cmd: ToolCommand,
}

impl Rsync {
    /// Use the `rsync` executable at `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            cmd: ToolCommand::new(program),
        }
    }
}

impl Syncer for Rsync {
    fn sync(&self, sources: &[PathBuf], dest: &str) -> Result<()> {
        self.cmd
            .invoke()
            .arg("--progress")
            .args(sources)
            .arg(dest)
            .run()
    }
}
