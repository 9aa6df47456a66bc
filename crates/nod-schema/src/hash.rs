//! SRI content hashes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize};

/// Algorithm prefix of the only SRI form the pipeline produces.
const SHA256_PREFIX: &str = "sha256-";

/// Length in bytes of a SHA-256 digest.
const SHA256_LEN: usize = 32;

/// A validated SHA-256 hash in SRI form (`sha256-<base64 digest>`).
///
/// This is what `nix-hash --type sha256 --sri` prints and what the proot
/// attrs file records. Validation happens at construction so malformed tool
/// output never reaches a file checked into the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SriHash(String);

/// Errors produced when parsing an [`SriHash`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    /// The string does not start with `sha256-`.
    #[error("expected a sha256 SRI hash, got '{0}'")]
    MissingPrefix(String),

    /// The payload is not valid standard base64.
    #[error("invalid base64 digest in '{0}'")]
    InvalidBase64(String),

    /// The payload decodes to the wrong number of bytes.
    #[error("expected a 32-byte digest, got {len} bytes in '{hash}'")]
    WrongLength {
        /// The rejected hash string.
        hash: String,
        /// Number of decoded bytes.
        len: usize,
    },
}

impl SriHash {
    /// Parse and validate an SRI string. Surrounding whitespace is ignored,
    /// so raw command output can be passed in directly.
    ///
    /// # Errors
    ///
    /// Returns a [`HashError`] if the prefix is missing, the digest is not
    /// base64, or it does not decode to exactly 32 bytes.
    pub fn parse(s: &str) -> Result<Self, HashError> {
        let s = s.trim();
        let Some(digest) = s.strip_prefix(SHA256_PREFIX) else {
            return Err(HashError::MissingPrefix(s.to_string()));
        };

        let bytes = STANDARD
            .decode(digest)
            .map_err(|_| HashError::InvalidBase64(s.to_string()))?;
        if bytes.len() != SHA256_LEN {
            return Err(HashError::WrongLength {
                hash: s.to_string(),
                len: bytes.len(),
            });
        }

        Ok(Self(s.to_string()))
    }

    /// Return the SRI string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for SriHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for SriHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SriHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for SriHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
