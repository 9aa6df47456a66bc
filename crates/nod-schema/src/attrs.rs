//! The generated proot attrs file.

use crate::{Arch, SriHash};

/// Header line marking an attrs file as generated.
pub const GENERATED_HEADER: &str =
    "# WARNING: This file is autogenerated by the deploy script. Any changes will be overridden";

/// The per-architecture proot attrs snippet checked into the repository.
///
/// The rendered form is a small nix attribute set telling the app where to
/// download the bootstrap zip and which hash the bundled proot binary has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProotAttrs {
    /// Download URL of the bootstrap zip.
    pub url: String,
    /// SRI hash of the static proot binary.
    pub hash: SriHash,
}

impl ProotAttrs {
    /// Build the attrs for `arch`, joining the bootstrap base URL with the
    /// conventional zip file name.
    pub fn new(bootstrap_url: &str, arch: &Arch, hash: SriHash) -> Self {
        Self {
            url: format!("{bootstrap_url}/{}", bootstrap_zip_name(arch)),
            hash,
        }
    }

    /// Render the file contents. Lines are `\n`-terminated except the last.
    pub fn render(&self) -> String {
        format!(
            "{GENERATED_HEADER}\n{{\n    url = \"{}\";\n    hash = \"{}\";\n}}",
            self.url, self.hash
        )
    }
}

/// File name of the bootstrap zip for `arch`, e.g. `bootstrap-aarch64-linux.zip`.
pub fn bootstrap_zip_name(arch: &Arch) -> String {
    format!("bootstrap-{arch}.zip")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nix_attrset() {
        let arch: Arch = "aarch64-linux".parse().unwrap();
        let hash = SriHash::parse("sha256-AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=").unwrap();
        let attrs = ProotAttrs::new("https://example.com/bootstrap", &arch, hash);

        let expected = "\
# WARNING: This file is autogenerated by the deploy script. Any changes will be overridden
{
    url = \"https://example.com/bootstrap/bootstrap-aarch64-linux.zip\";
    hash = \"sha256-AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=\";
}";
        assert_eq!(attrs.render(), expected);
    }

    #[test]
    fn bootstrap_url_is_joined_verbatim() {
        // A trailing slash on the override is kept, as the device fetches
        // the URL exactly as written.
        let arch: Arch = "x86_64-linux".parse().unwrap();
        let hash = SriHash::parse("sha256-AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=").unwrap();
        let attrs = ProotAttrs::new("https://cdn.example/b/", &arch, hash);
        assert_eq!(attrs.url, "https://cdn.example/b//bootstrap-x86_64-linux.zip");
    }
}
