//! Source snapshot of the repository, served as the channel tarball.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::paths;
use crate::reporter::Reporter;
use crate::tools::Vcs;

/// Archive `HEAD` to `<repo_root>/source.tar.gz` and return its path.
///
/// # Errors
///
/// Propagates the archive command's failure.
pub fn package_source<V, R>(vcs: &V, reporter: &R, repo_root: &Path) -> Result<PathBuf>
where
    V: Vcs + ?Sized,
    R: Reporter + ?Sized,
{
    reporter.info("creating tarball of current HEAD");
    let output = paths::source_archive_path(repo_root);
    vcs.archive(repo_root, paths::SOURCE_PREFIX, &output, paths::SOURCE_REV)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NullReporter;
    use crate::tools::fake::{Call, fakes};

    #[test]
    fn archives_head_with_prefix() {
        let (log, vcs, ..) = fakes(Path::new("/repo"));

        let out = package_source(&vcs, &NullReporter, Path::new("/repo")).unwrap();

        assert_eq!(out, PathBuf::from("/repo/source.tar.gz"));
        assert_eq!(
            *log.borrow(),
            vec![Call::Archive {
                prefix: "nix-on-droid/".into(),
                output: PathBuf::from("/repo/source.tar.gz"),
                rev: "HEAD".into(),
            }]
        );
    }
}
