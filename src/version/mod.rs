//! Version model for update checking
//!
//! # Modules
//!
//! - [`semver`]: Four-component versions and update severity classification
//! - [`info`]: Per-check version metadata and the remote metadata document

pub mod info;
pub mod semver;

pub use info::{MetadataDocument, VersionInfo};
pub use semver::{SemanticVersion, UpdateSeverity, parse_severity, severity};
