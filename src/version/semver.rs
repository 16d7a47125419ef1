use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VersionError;

/// Number of numeric components in a version (major.minor.patch.revision)
pub const VERSION_ARITY: usize = 4;

/// Four-component application version.
///
/// Ordering is lexicographic by component, which the derived `Ord` provides
/// through field declaration order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub revision: u64,
}

/// Category of an available update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateSeverity {
    Major,
    Minor,
    Patch,
    Revision,
    /// Latest is not strictly newer than current
    None,
}

impl SemanticVersion {
    pub const fn new(major: u64, minor: u64, patch: u64, revision: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            revision,
        }
    }

    fn components(&self) -> [u64; VERSION_ARITY] {
        [self.major, self.minor, self.patch, self.revision]
    }
}

/// Parse a version string into a SemanticVersion, normalizing partial versions.
///
/// Handles partial versions like "1" or "1.2" by padding with zeros, the way
/// store metadata usually omits trailing components. More than four
/// components, empty components and non-numeric components are rejected.
/// Does NOT strip a 'v' prefix.
///
/// Examples:
/// - "1" -> 1.0.0.0
/// - "1.2.3" -> 1.2.3.0
/// - "1.2.3.4" -> 1.2.3.4
impl FromStr for SemanticVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(VersionError::invalid(s, "empty version"));
        }

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() > VERSION_ARITY {
            return Err(VersionError::invalid(
                s,
                format!(
                    "expected at most {} components, found {}",
                    VERSION_ARITY,
                    parts.len()
                ),
            ));
        }

        let mut components = [0u64; VERSION_ARITY];
        for (slot, part) in components.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionError::invalid(
                    s,
                    format!("component {part:?} is not a non-negative integer"),
                ));
            }
            *slot = part
                .parse()
                .map_err(|_| VersionError::invalid(s, format!("component {part:?} overflows")))?;
        }

        let [major, minor, patch, revision] = components;
        Ok(Self::new(major, minor, patch, revision))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.patch, self.revision
        )
    }
}

impl TryFrom<String> for SemanticVersion {
    type Error = VersionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SemanticVersion> for String {
    fn from(value: SemanticVersion) -> Self {
        value.to_string()
    }
}

impl UpdateSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateSeverity::Major => "major",
            UpdateSeverity::Minor => "minor",
            UpdateSeverity::Patch => "patch",
            UpdateSeverity::Revision => "revision",
            UpdateSeverity::None => "none",
        }
    }

    const BY_COMPONENT: [UpdateSeverity; VERSION_ARITY] = [
        UpdateSeverity::Major,
        UpdateSeverity::Minor,
        UpdateSeverity::Patch,
        UpdateSeverity::Revision,
    ];
}

impl fmt::Display for UpdateSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the update from `current` to `latest`.
///
/// Returns the category of the first (left to right) component that differs,
/// or `UpdateSeverity::None` unless `latest` is strictly greater.
pub fn severity(current: &SemanticVersion, latest: &SemanticVersion) -> UpdateSeverity {
    if latest <= current {
        return UpdateSeverity::None;
    }

    current
        .components()
        .iter()
        .zip(latest.components())
        .position(|(c, l)| *c != l)
        .map(|i| UpdateSeverity::BY_COMPONENT[i])
        .unwrap_or(UpdateSeverity::None)
}

/// Parse both version strings and classify the update between them
pub fn parse_severity(current: &str, latest: &str) -> Result<UpdateSeverity, VersionError> {
    let current: SemanticVersion = current.parse()?;
    let latest: SemanticVersion = latest.parse()?;
    Ok(severity(&current, &latest))
}
