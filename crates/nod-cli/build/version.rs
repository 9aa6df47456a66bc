//! Pure helpers for the build script.

use std::path::{Path, PathBuf};

/// Files under `git_dir` whose changes can alter `git describe` output:
/// the current branch pointer, tags, packed refs and the index (for the
/// dirty marker). Only files that exist are returned, since cargo treats a
/// missing watched path as always changed.
pub(crate) fn watched_files(git_dir: &Path) -> Vec<PathBuf> {
    let head = git_dir.join("HEAD");
    let mut files = vec![
        git_dir.join("packed-refs"),
        git_dir.join("refs").join("tags"),
        git_dir.join("index"),
    ];
    let branch = std::fs::read_to_string(&head)
        .ok()
        .and_then(|contents| contents.trim().strip_prefix("ref: ").map(str::to_string));
    if let Some(branch) = branch {
        files.push(git_dir.join(branch));
    }
    files.insert(0, head);
    files.retain(|path| path.exists());
    files
}

/// Version string from `git describe` output: `v1.2.0-3-gabc` → `1.2.0-3-gabc`.
pub(crate) fn from_describe(raw: &str) -> Option<String> {
    let version = raw.trim().trim_start_matches('v');
    (!version.is_empty()).then(|| version.to_string())
}
