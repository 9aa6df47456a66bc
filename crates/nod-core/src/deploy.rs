//! End-to-end deployment: resolve, build, sync attrs, package, upload.
//!
//! [`Deployer`] is generic over every external tool so the whole pipeline
//! can run against fakes. It never changes the process working directory;
//! the repository root is looked up once and handed to each step.

use std::path::PathBuf;

use nod_schema::{Arch, ProotAttrs, PublicUrl, SriHash};

use crate::attrs::{AttrsOutcome, sync_attrs};
use crate::build::{build_bootstrap_zip, build_proot};
use crate::error::Result;
use crate::reporter::Reporter;
use crate::resolve::{DerivedUrls, resolve};
use crate::source::package_source;
use crate::tools::{BuildTool, ContentHasher, Syncer, Vcs};
use crate::upload::{UploadManifest, UploadOutcome, UploadTarget, upload};

/// A validated deployment request.
///
/// Construction parses the public URL and resolves the derived URLs, so
/// configuration errors surface before any tool is located or run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    /// The parsed public URL.
    pub public_url: PublicUrl,
    /// URLs derived from it.
    pub urls: DerivedUrls,
    /// Architectures to build, in order.
    pub arches: Vec<Arch>,
}

impl DeployRequest {
    /// Validate a request. An empty `arches` selects the default set.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::UnsupportedUrl`](crate::DeployError::UnsupportedUrl)
    /// or [`DeployError::MissingBootstrapUrl`](crate::DeployError::MissingBootstrapUrl).
    pub fn new(public_url: &str, bootstrap_url: Option<&str>, arches: Vec<Arch>) -> Result<Self> {
        let public_url = PublicUrl::parse(public_url)?;
        let urls = resolve(&public_url, bootstrap_url)?;
        let arches = if arches.is_empty() {
            Arch::defaults()
        } else {
            arches
        };
        Ok(Self {
            public_url,
            urls,
            arches,
        })
    }
}

/// Per-architecture result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchReport {
    /// The architecture.
    pub arch: Arch,
    /// Hash recorded for its proot.
    pub proot_hash: SriHash,
    /// What happened to its attrs file.
    pub attrs: AttrsOutcome,
    /// Path of its bootstrap zip.
    pub bootstrap_zip: PathBuf,
}

/// Summary of a completed deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    /// Repository the deployment ran in.
    pub repo_root: PathBuf,
    /// Derived URLs.
    pub urls: DerivedUrls,
    /// One entry per architecture, in build order.
    pub arches: Vec<ArchReport>,
    /// Every produced artifact.
    pub manifest: UploadManifest,
    /// Whether the artifacts were transferred.
    pub upload: UploadOutcome,
}

/// Runs a deployment against a set of tool capabilities.
#[derive(Debug)]
pub struct Deployer<V, B, H, S, R> {
    vcs: V,
    build: B,
    hasher: H,
    upload: Option<UploadTarget<S>>,
    reporter: R,
}

impl<V, B, H, S, R> Deployer<V, B, H, S, R>
where
    V: Vcs,
    B: BuildTool,
    H: ContentHasher,
    S: Syncer,
    R: Reporter,
{
    /// Assemble a deployer. `upload` of `None` means a dry run.
    pub fn new(vcs: V, build: B, hasher: H, upload: Option<UploadTarget<S>>, reporter: R) -> Self {
        Self {
            vcs,
            build,
            hasher,
            upload,
            reporter,
        }
    }

    /// Run every step of the deployment. The first failure aborts the run;
    /// attrs already written and staged for earlier architectures stay so.
    ///
    /// # Errors
    ///
    /// Returns the first tool or I/O error encountered.
    pub fn run(&self, request: &DeployRequest) -> Result<DeployReport> {
        let urls = &request.urls;
        self.reporter
            .info(&format!("channel_url = {}", urls.channel_url));
        self.reporter.info(&format!("flake_url = {}", urls.flake_url));
        self.reporter.info(&format!("base_url = {}", urls.base_url));
        self.reporter
            .info(&format!("bootstrap_url = {}", urls.bootstrap_url));

        let repo_root = self.vcs.repo_root()?;
        tracing::info!("deploying {} from {}", request.public_url, repo_root.display());

        let mut manifest = UploadManifest::new();
        let mut arches = Vec::with_capacity(request.arches.len());

        for arch in &request.arches {
            self.reporter.info(&format!("building {arch} proot..."));
            let proot = build_proot(&self.build, &self.hasher, &repo_root, arch)?;

            let attrs = ProotAttrs::new(&urls.bootstrap_url, arch, proot.hash.clone());
            let outcome = sync_attrs(&self.vcs, &self.reporter, &repo_root, arch, &attrs)?;

            let zip = build_bootstrap_zip(&self.build, &repo_root, arch, urls)?;
            manifest.push(&zip);

            arches.push(ArchReport {
                arch: arch.clone(),
                proot_hash: proot.hash,
                attrs: outcome,
                bootstrap_zip: zip,
            });
        }

        let source = package_source(&self.vcs, &self.reporter, &repo_root)?;
        manifest.push(source);

        let upload = upload(self.upload.as_ref(), &self.reporter, &manifest)?;

        Ok(DeployReport {
            repo_root,
            urls: urls.clone(),
            arches,
            manifest,
            upload,
        })
    }
}
