//! Derive the channel, flake, base and bootstrap URLs from the public URL.

use nod_schema::PublicUrl;

use crate::error::{DeployError, Result};

/// URLs every later step of a deployment works from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedUrls {
    /// Where the device fetches the distribution source.
    pub channel_url: String,
    /// What the bootstrap is configured to use as its flake.
    pub flake_url: String,
    /// The public URL without its final path segment.
    pub base_url: String,
    /// Where the bootstrap zips are served.
    pub bootstrap_url: String,
}

/// Resolve the derived URL set for `public_url`.
///
/// `bootstrap_override` replaces the default bootstrap URL (the base URL).
///
/// # Errors
///
/// Returns [`DeployError::MissingBootstrapUrl`] for `github:` URLs without
/// an override, since GitHub archive URLs have no directory to serve zips
/// from.
pub fn resolve(public_url: &PublicUrl, bootstrap_override: Option<&str>) -> Result<DerivedUrls> {
    let raw = public_url.to_string();

    let channel_url = match public_url {
        PublicUrl::GitHub {
            owner,
            repo,
            git_ref,
        } => {
            if bootstrap_override.is_none() {
                return Err(DeployError::MissingBootstrapUrl);
            }
            format!("https://github.com/{owner}/{repo}/archive/{git_ref}.tar.gz")
        }
        PublicUrl::Direct { .. } => raw.clone(),
    };

    let flake_url = local_flake_path(&raw).unwrap_or_else(|| raw.clone());
    let base_url = base_url(&raw).to_string();
    let bootstrap_url = bootstrap_override.map_or_else(|| base_url.clone(), str::to_string);

    Ok(DerivedUrls {
        channel_url,
        flake_url,
        base_url,
        bootstrap_url,
    })
}

/// `url` with everything from its last `/` onwards removed.
///
/// ```
/// use nod_core::resolve::base_url;
///
/// assert_eq!(base_url("https://example.com/bootstrap/source.tar.gz"), "https://example.com/bootstrap");
/// assert_eq!(base_url("no-slash"), "no-slash");
/// ```
pub fn base_url(url: &str) -> &str {
    url.rfind('/').map_or(url, |i| &url[..i])
}

/// For local and CI testing the device unpacks `file:///<dir>/archive.tar.gz`
/// to `/<dir>/unpacked`, and the flake has to point there.
fn local_flake_path(url: &str) -> Option<String> {
    let dir = url
        .strip_prefix("file:///")?
        .strip_suffix("/archive.tar.gz")?;
    if dir.is_empty() {
        return None;
    }
    Some(format!("/{dir}/unpacked"))
}
