//! Keep the checked-in proot attrs files in step with fresh builds.
//!
//! A file is rewritten and staged only when its bytes differ from the
//! rendered snippet, so re-running a deployment with unchanged build
//! outputs touches neither the working tree nor the index.

use std::path::Path;

use nod_schema::{Arch, ProotAttrs};

use crate::error::{DeployError, Result};
use crate::paths;
use crate::reporter::Reporter;
use crate::tools::Vcs;

/// What [`sync_attrs`] did to the attrs file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrsOutcome {
    /// The file did not exist and was written.
    Created,
    /// The file differed and was overwritten.
    Updated,
    /// The file already matched.
    Unchanged,
}

impl AttrsOutcome {
    /// Whether the file was written and staged.
    pub fn written(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// Bring the attrs file for `arch` under `repo_root` up to date with `attrs`.
///
/// # Errors
///
/// Returns [`DeployError::Io`] if the file cannot be read or written, or the
/// error of the `add` call if staging fails.
pub fn sync_attrs<V, R>(
    vcs: &V,
    reporter: &R,
    repo_root: &Path,
    arch: &Arch,
    attrs: &ProotAttrs,
) -> Result<AttrsOutcome>
where
    V: Vcs + ?Sized,
    R: Reporter + ?Sized,
{
    let path = paths::attrs_path(repo_root, arch);
    let text = normalize_newlines(&attrs.render());

    let outcome = match read_existing(&path)? {
        None => {
            reporter.warning(&format!("{} not present; creating", path.display()));
            AttrsOutcome::Created
        }
        Some(old) if old != text.as_bytes() => {
            reporter.info(&format!("updating contents of {}", path.display()));
            reporter.diff(&String::from_utf8_lossy(&old), &text);
            AttrsOutcome::Updated
        }
        Some(_) => {
            reporter.info(&format!("no changes needed to {}", path.display()));
            return Ok(AttrsOutcome::Unchanged);
        }
    };

    write_attrs(&path, &text)?;
    reporter.info(&format!("adding {} to git index", path.display()));
    vcs.add(repo_root, &path)?;
    tracing::debug!(?outcome, "attrs for {arch} written");
    Ok(outcome)
}

fn read_existing(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DeployError::io(path, e)),
    }
}

fn write_attrs(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| DeployError::io(parent, e))?;
    }
    std::fs::write(path, text).map_err(|e| DeployError::io(path, e))
}

/// Force `\n` line endings.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::fake::{Call, HASH_A, HASH_B, RecordingReporter, fakes};
    use nod_schema::SriHash;
    use std::time::{Duration, UNIX_EPOCH};

    fn attrs(hash: &str) -> ProotAttrs {
        let arch: Arch = "aarch64-linux".parse().unwrap();
        ProotAttrs::new(
            "https://example.com/bootstrap",
            &arch,
            SriHash::parse(hash).unwrap(),
        )
    }

    fn arch() -> Arch {
        "aarch64-linux".parse().unwrap()
    }

    #[test]
    fn creates_missing_file_and_stages_it() {
        let tmp = tempfile::tempdir().unwrap();
        let (log, vcs, ..) = fakes(tmp.path());
        let reporter = RecordingReporter::default();

        let outcome = sync_attrs(&vcs, &reporter, tmp.path(), &arch(), &attrs(HASH_A)).unwrap();

        let path = paths::attrs_path(tmp.path(), &arch());
        assert_eq!(outcome, AttrsOutcome::Created);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), attrs(HASH_A).render());
        assert_eq!(*log.borrow(), vec![Call::Add(path.clone())]);
        assert_eq!(
            reporter.lines()[0],
            format!("warn: {} not present; creating", path.display())
        );
    }

    #[test]
    fn second_run_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        let (log, vcs, ..) = fakes(tmp.path());
        let reporter = RecordingReporter::default();
        let path = paths::attrs_path(tmp.path(), &arch());

        sync_attrs(&vcs, &reporter, tmp.path(), &arch(), &attrs(HASH_A)).unwrap();
        // Backdate the file so any rewrite shows up as a new mtime.
        let past = UNIX_EPOCH + Duration::from_secs(1_000_000);
        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(past)
            .unwrap();
        log.borrow_mut().clear();

        let outcome = sync_attrs(&vcs, &reporter, tmp.path(), &arch(), &attrs(HASH_A)).unwrap();

        assert_eq!(outcome, AttrsOutcome::Unchanged);
        assert!(log.borrow().is_empty(), "nothing staged on the second run");
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), past);
        assert_eq!(
            reporter.lines().last().unwrap(),
            &format!("info: no changes needed to {}", path.display())
        );
    }

    #[test]
    fn differing_file_is_overwritten_with_lf_endings() {
        let tmp = tempfile::tempdir().unwrap();
        let (log, vcs, ..) = fakes(tmp.path());
        let reporter = RecordingReporter::default();
        let path = paths::attrs_path(tmp.path(), &arch());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let stale = attrs(HASH_B).render().replace('\n', "\r\n");
        std::fs::write(&path, &stale).unwrap();

        let outcome = sync_attrs(&vcs, &reporter, tmp.path(), &arch(), &attrs(HASH_A)).unwrap();

        assert_eq!(outcome, AttrsOutcome::Updated);
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, attrs(HASH_A).render().into_bytes());
        assert!(!written.contains(&b'\r'));
        assert_eq!(*log.borrow(), vec![Call::Add(path.clone())]);

        let lines = reporter.lines();
        assert_eq!(lines[0], format!("info: updating contents of {}", path.display()));
        assert_eq!(lines[1], format!("diff: {stale} => {}", attrs(HASH_A).render()));
        assert_eq!(lines[2], format!("info: adding {} to git index", path.display()));
    }

    #[test]
    fn crlf_copy_of_same_content_still_counts_as_changed() {
        let tmp = tempfile::tempdir().unwrap();
        let (_log, vcs, ..) = fakes(tmp.path());
        let path = paths::attrs_path(tmp.path(), &arch());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, attrs(HASH_A).render().replace('\n', "\r\n")).unwrap();

        let outcome = sync_attrs(
            &vcs,
            &crate::reporter::NullReporter,
            tmp.path(),
            &arch(),
            &attrs(HASH_A),
        )
        .unwrap();
        assert_eq!(outcome, AttrsOutcome::Updated);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), attrs(HASH_A).render());
    }

    #[test]
    fn only_unchanged_is_not_written() {
        assert!(AttrsOutcome::Created.written());
        assert!(AttrsOutcome::Updated.written());
        assert!(!AttrsOutcome::Unchanged.written());
    }

    #[test]
    fn normalizes_stray_carriage_returns() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
    }
}
