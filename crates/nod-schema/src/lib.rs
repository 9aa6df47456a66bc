//! Shared value types for the nix-on-droid deploy pipeline.
//!
//! Everything here is pure data: parsing and rendering, no I/O.

pub mod arch;
pub mod attrs;
pub mod hash;
pub mod url;

// Re-exports
pub use arch::*;
pub use attrs::{GENERATED_HEADER, ProotAttrs, bootstrap_zip_name};
pub use hash::*;
pub use url::{PublicUrl, Scheme, UrlError};
