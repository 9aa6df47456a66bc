//! Core of `nod-deploy`.
//!
//! Builds the proot and bootstrap zips for each architecture, keeps the
//! proot attrs files in the repository current, snapshots the source and
//! uploads the lot. All external programs sit behind the traits in
//! [`tools`]; [`deploy::Deployer`] drives them in order.

pub mod attrs;
pub mod build;
pub mod config;
pub mod deploy;
pub mod error;
pub mod paths;
pub mod resolve;
pub mod source;
pub mod tools;
pub mod upload;

pub mod reporter;

pub use deploy::{DeployReport, DeployRequest, Deployer};
pub use error::{DeployError, Result};
pub use reporter::{ConsoleReporter, NullReporter, Reporter};
