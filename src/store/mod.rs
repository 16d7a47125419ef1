//! Persisted prompt history
//!
//! # Modules
//!
//! - [`sqlite`]: SQLite-backed [`PersistenceStore`]

pub mod sqlite;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::version::semver::SemanticVersion;

/// Local record of prior prompts, loaded at check start and written at check end
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationState {
    pub last_prompted_version: Option<SemanticVersion>,
    pub last_prompt_timestamp: Option<DateTime<Utc>>,
    pub skipped_versions: BTreeSet<SemanticVersion>,
}

impl InstallationState {
    pub fn has_skipped(&self, version: &SemanticVersion) -> bool {
        self.skipped_versions.contains(version)
    }
}

/// Trait for loading and saving the installation state
#[cfg_attr(test, automock)]
pub trait PersistenceStore: Send + Sync + 'static {
    /// Load the stored state, or the empty state if nothing was saved yet
    fn load(&self) -> Result<InstallationState, PersistError>;

    /// Replace the stored state
    fn save(&self, state: &InstallationState) -> Result<(), PersistError>;

    /// Remove any stored state
    fn clear(&self) -> Result<(), PersistError>;
}
