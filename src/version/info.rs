//! Version metadata for a single check cycle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VersionError;
use crate::version::semver::{SemanticVersion, UpdateSeverity, severity};

/// Parsed metadata describing the installed and the available release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub current_installed: SemanticVersion,
    pub latest_available: SemanticVersion,
    pub minimum_required: Option<SemanticVersion>,
    pub release_notes_key: String,
    /// When the latest version was published, if the source reports it
    pub release_date: Option<DateTime<Utc>>,
}

impl VersionInfo {
    pub fn new(current_installed: SemanticVersion, latest_available: SemanticVersion) -> Self {
        Self {
            current_installed,
            latest_available,
            minimum_required: None,
            release_notes_key: String::new(),
            release_date: None,
        }
    }

    pub fn with_minimum_required(mut self, minimum: SemanticVersion) -> Self {
        self.minimum_required = Some(minimum);
        self
    }

    pub fn with_release_notes_key(mut self, key: impl Into<String>) -> Self {
        self.release_notes_key = key.into();
        self
    }

    pub fn with_release_date(mut self, date: DateTime<Utc>) -> Self {
        self.release_date = Some(date);
        self
    }

    pub fn severity(&self) -> UpdateSeverity {
        severity(&self.current_installed, &self.latest_available)
    }

    /// Whether the installed version is below the required floor
    pub fn below_minimum(&self) -> bool {
        self.minimum_required
            .is_some_and(|minimum| self.current_installed < minimum)
    }
}

/// Remote metadata document as published by a release source.
///
/// Versions stay as strings until [`MetadataDocument::into_version_info`] so
/// that a malformed value aborts the check instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDocument {
    pub latest_version: String,
    #[serde(default)]
    pub minimum_version: Option<String>,
    #[serde(default)]
    pub release_notes_key: Option<String>,
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
}

impl MetadataDocument {
    pub fn into_version_info(
        self,
        current_installed: SemanticVersion,
    ) -> Result<VersionInfo, VersionError> {
        let latest_available: SemanticVersion = self.latest_version.parse()?;
        let minimum_required = self
            .minimum_version
            .as_deref()
            .map(str::parse::<SemanticVersion>)
            .transpose()?;

        Ok(VersionInfo {
            current_installed,
            latest_available,
            minimum_required,
            release_notes_key: self.release_notes_key.unwrap_or_default(),
            release_date: self.release_date,
        })
    }
}
