//! Architecture identifiers.

/// Target architecture a bootstrap is built for.
///
/// The identifier is an opaque nix system string such as `aarch64-linux`.
/// It ends up inside installable names (`.#bootstrapZip-<arch>`), file names
/// (`bootstrap-<arch>.zip`) and the attrs path (`proot-attrs/<arch>.nix`),
/// so it must be non-empty and free of path separators and whitespace.
///
/// # Example
///
/// ```
/// use nod_schema::Arch;
///
/// let arch: Arch = "aarch64-linux".parse().unwrap();
/// assert_eq!(arch.as_str(), "aarch64-linux");
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Arch(String);

/// Architectures built when the caller does not name any.
pub const DEFAULT_ARCHES: [&str; 2] = ["aarch64-linux", "x86_64-linux"];

/// Errors produced when parsing an [`Arch`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ArchError {
    /// The identifier was empty.
    #[error("architecture must not be empty")]
    Empty,

    /// The identifier contained a character that cannot appear in a file name.
    #[error("invalid character {ch:?} in architecture '{arch}'")]
    InvalidChar {
        /// The rejected identifier.
        arch: String,
        /// The first offending character.
        ch: char,
    },
}

impl Arch {
    /// Create a validated architecture identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ArchError::Empty`] for an empty string and
    /// [`ArchError::InvalidChar`] if it contains `/`, `\` or whitespace.
    pub fn new(s: impl Into<String>) -> Result<Self, ArchError> {
        let s = s.into();
        if s.is_empty() {
            return Err(ArchError::Empty);
        }
        if let Some(ch) = s
            .chars()
            .find(|c| *c == '/' || *c == '\\' || c.is_whitespace())
        {
            return Err(ArchError::InvalidChar { arch: s, ch });
        }
        Ok(Self(s))
    }

    /// The default architecture set, in build order.
    pub fn defaults() -> Vec<Self> {
        DEFAULT_ARCHES.iter().map(|a| Self((*a).to_string())).collect()
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Arch {
    type Err = ArchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Arch {
    type Error = ArchError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Arch> for String {
    fn from(arch: Arch) -> Self {
        arch.0
    }
}

impl AsRef<str> for Arch {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_in_build_order() {
        let arches = Arch::defaults();
        let names: Vec<_> = arches.iter().map(Arch::as_str).collect();
        assert_eq!(names, ["aarch64-linux", "x86_64-linux"]);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(Arch::new(""), Err(ArchError::Empty));
    }

    #[test]
    fn rejects_path_separators() {
        let err = "../etc".parse::<Arch>().unwrap_err();
        assert!(matches!(err, ArchError::InvalidChar { ch: '/', .. }));
        assert!("x86_64 linux".parse::<Arch>().is_err());
    }

    #[test]
    fn deserialize_validates() {
        let ok: Vec<Arch> = serde_json::from_str(r#"["armv7l-linux"]"#).unwrap();
        assert_eq!(ok[0].as_str(), "armv7l-linux");
        assert!(serde_json::from_str::<Vec<Arch>>(r#"[""]"#).is_err());
    }
}
