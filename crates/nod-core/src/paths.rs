//! Repository-relative locations and fixed names used by the pipeline.
//!
//! Every function takes the repository root explicitly; nothing here looks
//! at the process working directory.

use std::path::{Path, PathBuf};

use nod_schema::Arch;

/// Directory holding the generated proot attrs, relative to the repo root.
pub const ATTRS_DIR: &str = "modules/environment/login/proot-attrs";

/// File name of the source snapshot written by `git archive`.
pub const SOURCE_ARCHIVE: &str = "source.tar.gz";

/// Directory prefix for every path inside the source snapshot.
pub const SOURCE_PREFIX: &str = "nix-on-droid/";

/// Revision the source snapshot is taken from.
pub const SOURCE_REV: &str = "HEAD";

/// Location of the static proot binary inside its build output.
pub const PROOT_BINARY: &str = "bin/proot-static";

/// Proot attrs file for `arch`: `<root>/modules/environment/login/proot-attrs/<arch>.nix`
pub fn attrs_path(repo_root: &Path, arch: &Arch) -> PathBuf {
    repo_root.join(ATTRS_DIR).join(format!("{arch}.nix"))
}

/// Source snapshot path: `<root>/source.tar.gz`
pub fn source_archive_path(repo_root: &Path) -> PathBuf {
    repo_root.join(SOURCE_ARCHIVE)
}

/// Flake installable building the static proot for `arch`.
pub fn proot_installable(arch: &Arch) -> String {
    format!(".#prootTermux-{arch}")
}

/// Flake installable building the bootstrap zip for `arch`.
pub fn bootstrap_installable(arch: &Arch) -> String {
    format!(".#bootstrapZip-{arch}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attrs_path_is_keyed_by_arch() {
        let arch: Arch = "x86_64-linux".parse().unwrap();
        assert_eq!(
            attrs_path(Path::new("/repo"), &arch),
            PathBuf::from("/repo/modules/environment/login/proot-attrs/x86_64-linux.nix")
        );
    }

    #[test]
    fn installables() {
        let arch: Arch = "aarch64-linux".parse().unwrap();
        assert_eq!(proot_installable(&arch), ".#prootTermux-aarch64-linux");
        assert_eq!(bootstrap_installable(&arch), ".#bootstrapZip-aarch64-linux");
    }
}
