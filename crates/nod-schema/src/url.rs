//! The public URL a deployment is published under.
//!
//! Three shapes are accepted:
//!
//! | Input | Variant |
//! |---|---|
//! | `github:OWNER/REPO/REF` | [`PublicUrl::GitHub`] |
//! | `http://…`, `https://…` | [`PublicUrl::Direct`] |
//! | `file://…` | [`PublicUrl::Direct`] |
//!
//! Anything else is rejected at parse time, so downstream code matches the
//! variants exhaustively instead of re-inspecting strings.

use std::fmt;

/// URL scheme of a [`PublicUrl::Direct`] URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// `http://`
    Http,
    /// `https://`
    Https,
    /// `file://`
    File,
}

impl Scheme {
    /// Scheme name without the `://` separator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
            Self::File => "file",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed public URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PublicUrl {
    /// A branch or tag of a GitHub repository.
    GitHub {
        /// Repository owner. May itself contain `/`.
        owner: String,
        /// Repository name.
        repo: String,
        /// Branch, tag or commit.
        git_ref: String,
    },
    /// A URL the device fetches as-is.
    Direct {
        /// The URL scheme.
        scheme: Scheme,
        /// Everything after `://`.
        rest: String,
    },
}

/// Errors produced when parsing a [`PublicUrl`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// The input is not one of the accepted shapes.
    #[error("unsupported url {0}")]
    Unsupported(String),
}

impl PublicUrl {
    /// Parse a public URL.
    ///
    /// For `github:` URLs the ref is the last `/`-separated segment and the
    /// repository the one before it; all three parts must be non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::Unsupported`] for any other shape.
    ///
    /// # Example
    ///
    /// ```
    /// use nod_schema::PublicUrl;
    ///
    /// let url = PublicUrl::parse("github:alice/proj/main").unwrap();
    /// assert!(matches!(url, PublicUrl::GitHub { ref git_ref, .. } if git_ref == "main"));
    /// assert!(PublicUrl::parse("ftp://example.com/x").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, UrlError> {
        let unsupported = || UrlError::Unsupported(input.to_string());

        if let Some(path) = input.strip_prefix("github:") {
            let mut parts = path.rsplitn(3, '/');
            let git_ref = parts.next().ok_or_else(unsupported)?;
            let repo = parts.next().ok_or_else(unsupported)?;
            let owner = parts.next().ok_or_else(unsupported)?;
            if owner.is_empty() || repo.is_empty() || git_ref.is_empty() {
                return Err(unsupported());
            }
            return Ok(Self::GitHub {
                owner: owner.to_string(),
                repo: repo.to_string(),
                git_ref: git_ref.to_string(),
            });
        }

        let (scheme, rest) = input.split_once("://").ok_or_else(unsupported)?;
        let scheme = match scheme {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            "file" => Scheme::File,
            _ => return Err(unsupported()),
        };
        Ok(Self::Direct {
            scheme,
            rest: rest.to_string(),
        })
    }
}

impl fmt::Display for PublicUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GitHub {
                owner,
                repo,
                git_ref,
            } => write!(f, "github:{owner}/{repo}/{git_ref}"),
            Self::Direct { scheme, rest } => write!(f, "{scheme}://{rest}"),
        }
    }
}

impl std::str::FromStr for PublicUrl {
    type Err = UrlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
