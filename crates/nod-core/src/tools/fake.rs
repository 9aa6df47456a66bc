//! Recording fakes for the tool capabilities.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;

use nod_schema::SriHash;

use super::{BuildRequest, BuildTool, ContentHasher, Syncer, Vcs};
use crate::error::{DeployError, Result};
use crate::reporter::Reporter;

pub(crate) const HASH_A: &str = "sha256-X2EcgGX4R3oAC6BPZkKG325XQ0ctrWNAJtDX5fCsflE=";
pub(crate) const HASH_B: &str = "sha256-07HMxXQuQEUx7N9l/UV6yNqhYC7kYf2KxSjzAEF7M40=";

/// One observed tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    RepoRoot,
    Archive { prefix: String, output: PathBuf, rev: String },
    Add(PathBuf),
    Build(BuildRequest),
    Hash(PathBuf),
    Sync { sources: Vec<PathBuf>, dest: String },
}

pub(crate) type CallLog = Rc<RefCell<Vec<Call>>>;

fn failed(program: &str) -> DeployError {
    DeployError::EmptyOutput {
        program: program.to_string(),
    }
}

pub(crate) struct FakeVcs {
    pub(crate) root: PathBuf,
    pub(crate) log: CallLog,
}

impl Vcs for FakeVcs {
    fn repo_root(&self) -> Result<PathBuf> {
        self.log.borrow_mut().push(Call::RepoRoot);
        Ok(self.root.clone())
    }

    fn archive(&self, repo_root: &Path, prefix: &str, output: &Path, rev: &str) -> Result<()> {
        assert_eq!(repo_root, self.root);
        self.log.borrow_mut().push(Call::Archive {
            prefix: prefix.to_string(),
            output: output.to_path_buf(),
            rev: rev.to_string(),
        });
        Ok(())
    }

    fn add(&self, repo_root: &Path, path: &Path) -> Result<()> {
        assert_eq!(repo_root, self.root);
        self.log.borrow_mut().push(Call::Add(path.to_path_buf()));
        Ok(())
    }
}

/// Returns `/nix/store/fake-<installable>` and fails for installables in `fail`.
pub(crate) struct FakeNix {
    pub(crate) log: CallLog,
    pub(crate) fail: HashSet<String>,
}

impl BuildTool for FakeNix {
    fn build(&self, _repo_root: &Path, request: &BuildRequest) -> Result<PathBuf> {
        self.log.borrow_mut().push(Call::Build(request.clone()));
        if self.fail.contains(&request.installable) {
            return Err(failed("nix"));
        }
        let name = request.installable.trim_start_matches(".#");
        Ok(PathBuf::from(format!("/nix/store/fake-{name}")))
    }
}

/// Hashes paths containing `x86_64` as [`HASH_B`], everything else as [`HASH_A`].
pub(crate) struct FakeHasher {
    pub(crate) log: CallLog,
}

impl ContentHasher for FakeHasher {
    fn hash_path(&self, path: &Path) -> Result<SriHash> {
        self.log.borrow_mut().push(Call::Hash(path.to_path_buf()));
        let hash = if path.to_string_lossy().contains("x86_64") {
            HASH_B
        } else {
            HASH_A
        };
        Ok(SriHash::parse(hash)?)
    }
}

pub(crate) struct FakeSyncer {
    pub(crate) log: CallLog,
}

impl Syncer for FakeSyncer {
    fn sync(&self, sources: &[PathBuf], dest: &str) -> Result<()> {
        self.log.borrow_mut().push(Call::Sync {
            sources: sources.to_vec(),
            dest: dest.to_string(),
        });
        Ok(())
    }
}

/// Collects reported lines as `info: …`, `warn: …` and `diff: …`.
#[derive(Default)]
pub(crate) struct RecordingReporter {
    pub(crate) lines: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, msg: &str) {
        self.lines.lock().unwrap().push(format!("info: {msg}"));
    }
    fn warning(&self, msg: &str) {
        self.lines.lock().unwrap().push(format!("warn: {msg}"));
    }
    fn diff(&self, old: &str, new: &str) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("diff: {old} => {new}"));
    }
}

/// Fresh fakes sharing one call log, rooted at `root`.
pub(crate) fn fakes(root: &Path) -> (CallLog, FakeVcs, FakeNix, FakeHasher, FakeSyncer) {
    let log = CallLog::default();
    (
        log.clone(),
        FakeVcs {
            root: root.to_path_buf(),
            log: log.clone(),
        },
        FakeNix {
            log: log.clone(),
            fail: HashSet::new(),
        },
        FakeHasher { log: log.clone() },
        FakeSyncer { log },
    )
}
