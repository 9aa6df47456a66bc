//! nod-deploy - build and publish nix-on-droid bootstrap archives
//!
//! The binary is a thin layer over [`nod_core`]: it merges command-line
//! flags with the optional config file, locates the external tools and
//! hands everything to [`Deployer`].

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use nod_core::config::{DeployConfig, Tool};
use nod_core::tools::{Git, Nix, NixHash, Rsync};
use nod_core::upload::UploadTarget;
use nod_core::{ConsoleReporter, DeployReport, DeployRequest, Deployer};
use nod_schema::Arch;

const LONG_ABOUT: &str = "\
Builds bootstrap zip balls and the source tarball (for use as a channel or \
flake). If --rsync-target is given, uploads them to that destination, whose \
contents should be reachable by the Android device under PUBLIC_URL.

Examples:

  $ nod-deploy 'https://example.com/bootstrap/source.tar.gz' --rsync-target 'user@host:/path/to/bootstrap'
  $ nod-deploy 'github:USER/nix-on-droid/BRANCH' --rsync-target 'user@host:/path/to/bootstrap' --bootstrap-url 'https://example.com/bootstrap/'
  $ nod-deploy 'file:///data/local/tmp/n-o-d/archive.tar.gz'

The file:// form is useful for testing; the path is on the device running \
the app, not on the build machine.";

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "nod-deploy")]
#[command(author, version = env!("NOD_DEPLOY_VERSION"))]
#[command(about = "Build and publish nix-on-droid bootstrap archives", long_about = LONG_ABOUT)]
pub struct Cli {
    /// The flake URL for this build: an http(s) URL, a file URL, or github:OWNER/REPO/REF
    pub public_url: String,

    /// Where bootstrap zips and the source tarball are copied to (passed verbatim to rsync)
    #[arg(long, env = "NOD_RSYNC_TARGET")]
    pub rsync_target: Option<String>,

    /// URL where bootstrap zips are served. Defaults to the folder part of PUBLIC_URL
    #[arg(long, env = "NOD_BOOTSTRAP_URL")]
    pub bootstrap_url: Option<String>,

    /// Architectures to build for [default: aarch64-linux,x86_64-linux]
    #[arg(long, value_delimiter = ',')]
    pub arches: Vec<Arch>,

    /// Optional TOML config file
    #[arg(long, env = "NOD_DEPLOY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug output, including every command run
    #[arg(short, long)]
    pub verbose: bool,
}

/// Run a deployment as described by `cli`.
///
/// URLs are validated before any external tool is looked up, so a bad
/// invocation fails without touching the repository.
///
/// # Errors
///
/// Returns configuration errors and the first failing pipeline step.
pub fn run(cli: &Cli) -> Result<DeployReport> {
    let config = match &cli.config {
        Some(path) => DeployConfig::load(path)?,
        None => DeployConfig::default(),
    };

    let bootstrap_url = cli.bootstrap_url.as_deref().or(config.bootstrap_url.as_deref());
    let arches = if cli.arches.is_empty() {
        config.arches.clone()
    } else {
        cli.arches.clone()
    };
    let request = DeployRequest::new(&cli.public_url, bootstrap_url, arches)?;

    let locate = |tool: Tool| {
        config
            .tools
            .locate(tool, std::env::var_os)
            .with_context(|| format!("cannot run {}", tool.name()))
    };
    let git = Git::new(locate(Tool::Git)?);
    let nix = Nix::new(locate(Tool::Nix)?);
    let nix_hash = NixHash::new(locate(Tool::NixHash)?);

    let upload = match cli.rsync_target.as_ref().or(config.rsync_target.as_ref()) {
        Some(dest) => Some(UploadTarget {
            syncer: Rsync::new(locate(Tool::Rsync)?),
            dest: dest.clone(),
        }),
        None => None,
    };

    let report = Deployer::new(git, nix, nix_hash, upload, ConsoleReporter::stdout())
        .run(&request)
        .context("deployment failed")?;
    let staged = report.arches.iter().filter(|a| a.attrs.written()).count();
    tracing::debug!(
        "deployed {} artifacts from {} ({staged} attrs files staged)",
        report.manifest.len(),
        report.repo_root.display()
    );
    for artifact in report.manifest.iter() {
        tracing::debug!("artifact {}", artifact.display());
    }
    Ok(report)
}
