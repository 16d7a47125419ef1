//! Metadata fetching trait and a local JSON implementation

use std::path::{Path, PathBuf};

#[cfg(test)]
use mockall::automock;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::version::info::{MetadataDocument, VersionInfo};
use crate::version::semver::SemanticVersion;

/// Trait for retrieving version metadata for the running application
///
/// Implementations own their retry and timeout policy; the check cycle only
/// consumes the final result.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch(&self) -> Result<VersionInfo, FetchError>;
}

/// Reads a [`MetadataDocument`] from a JSON file on disk
pub struct JsonFileFetcher {
    path: PathBuf,
    current_installed: SemanticVersion,
}

impl JsonFileFetcher {
    pub fn new(path: &Path, current_installed: SemanticVersion) -> Self {
        Self {
            path: path.to_path_buf(),
            current_installed,
        }
    }
}

#[async_trait::async_trait]
impl MetadataFetcher for JsonFileFetcher {
    async fn fetch(&self) -> Result<VersionInfo, FetchError> {
        debug!("Reading version metadata from {:?}", self.path);

        let bytes = tokio::fs::read(&self.path).await.inspect_err(|e| {
            warn!("Failed to read metadata {:?}: {}", self.path, e);
        })?;

        let document: MetadataDocument = serde_json::from_slice(&bytes).inspect_err(|e| {
            warn!("Failed to parse metadata {:?}: {}", self.path, e);
        })?;

        Ok(document.into_version_info(self.current_installed)?)
    }
}
