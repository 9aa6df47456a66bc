//! Stamps the binary with the `git describe` of the checkout it is built
//! from, and tells cargo which git files invalidate that stamp.

use std::path::Path;
use std::process::Command;

mod version;

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout).ok()
}

fn main() {
    println!("cargo:rerun-if-changed=build");

    // Outside a checkout (e.g. a packaged crate) only the crate version is known.
    if let Some(git_dir) = git(&["rev-parse", "--absolute-git-dir"]) {
        for file in version::watched_files(Path::new(git_dir.trim())) {
            println!("cargo:rerun-if-changed={}", file.display());
        }
    }

    let version = git(&["describe", "--tags", "--always", "--dirty=-dev"])
        .and_then(|raw| version::from_describe(&raw))
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    println!("cargo:rustc-env=NOD_DEPLOY_VERSION={version}");
}
