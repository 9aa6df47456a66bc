//! Per-architecture builds: the static proot and the bootstrap zip.

use std::path::{Path, PathBuf};

use nod_schema::{Arch, SriHash, bootstrap_zip_name};

use crate::error::Result;
use crate::paths;
use crate::resolve::DerivedUrls;
use crate::tools::{BuildRequest, BuildTool, ContentHasher};

/// Environment variable carrying the channel URL into the bootstrap build.
pub const CHANNEL_URL_ENV: &str = "NIX_ON_DROID_CHANNEL_URL";

/// Environment variable carrying the flake URL into the bootstrap build.
pub const FLAKE_URL_ENV: &str = "NIX_ON_DROID_FLAKE_URL";

/// A built proot and the hash recorded for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProotBuild {
    /// Build output directory.
    pub out_path: PathBuf,
    /// SRI hash of `bin/proot-static` inside it.
    pub hash: SriHash,
}

/// Build the static proot for `arch` and hash its binary.
///
/// # Errors
///
/// Propagates build and hash tool failures.
pub fn build_proot<B, H>(build: &B, hasher: &H, repo_root: &Path, arch: &Arch) -> Result<ProotBuild>
where
    B: BuildTool + ?Sized,
    H: ContentHasher + ?Sized,
{
    let out_path = build.build(
        repo_root,
        &BuildRequest::pure(paths::proot_installable(arch)),
    )?;
    let hash = hasher.hash_path(&out_path.join(paths::PROOT_BINARY))?;
    tracing::debug!("proot for {arch}: {} ({hash})", out_path.display());
    Ok(ProotBuild { out_path, hash })
}

/// Build the bootstrap zip for `arch` and return the path of the zip itself.
///
/// The evaluation is impure: it reads the channel and flake URLs from the
/// environment, which is set on the build process only.
///
/// # Errors
///
/// Propagates build tool failures.
pub fn build_bootstrap_zip<B>(
    build: &B,
    repo_root: &Path,
    arch: &Arch,
    urls: &DerivedUrls,
) -> Result<PathBuf>
where
    B: BuildTool + ?Sized,
{
    let request = BuildRequest::impure(
        paths::bootstrap_installable(arch),
        vec![
            (CHANNEL_URL_ENV.to_string(), urls.channel_url.clone()),
            (FLAKE_URL_ENV.to_string(), urls.flake_url.clone()),
        ],
    );
    let out_path = build.build(repo_root, &request)?;
    Ok(out_path.join(bootstrap_zip_name(arch)))
}
