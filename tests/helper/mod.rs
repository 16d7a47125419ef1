//! Check cycle test utilities

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use release_nudge::engine::Interaction;
use release_nudge::error::FetchError;
use release_nudge::fetch::MetadataFetcher;
use release_nudge::present::PresentationAdapter;
use release_nudge::rules::AlertType;
use release_nudge::store::sqlite::SqliteStore;
use release_nudge::version::{SemanticVersion, VersionInfo};

/// Fetcher whose metadata can be swapped between check cycles
pub struct StubFetcher {
    info: Mutex<VersionInfo>,
}

impl StubFetcher {
    pub fn new(info: VersionInfo) -> Self {
        Self {
            info: Mutex::new(info),
        }
    }

    pub fn set(&self, info: VersionInfo) {
        *self.info.lock().unwrap() = info;
    }
}

#[async_trait]
impl MetadataFetcher for StubFetcher {
    async fn fetch(&self) -> Result<VersionInfo, FetchError> {
        Ok(self.info.lock().unwrap().clone())
    }
}

/// Adapter that records every alert it is asked to present
pub struct RecordingAdapter {
    response: Option<Interaction>,
    presented: Mutex<Vec<(AlertType, SemanticVersion)>>,
}

impl RecordingAdapter {
    pub fn answering(response: Option<Interaction>) -> Self {
        Self {
            response,
            presented: Mutex::new(Vec::new()),
        }
    }

    pub fn presented(&self) -> Vec<(AlertType, SemanticVersion)> {
        self.presented.lock().unwrap().clone()
    }
}

#[async_trait]
impl PresentationAdapter for RecordingAdapter {
    async fn present(&self, alert_type: AlertType, info: &VersionInfo) -> Option<Interaction> {
        self.presented
            .lock()
            .unwrap()
            .push((alert_type, info.latest_available));
        self.response
    }
}

pub fn v(s: &str) -> SemanticVersion {
    s.parse().unwrap()
}

pub fn version_info(current: &str, latest: &str) -> VersionInfo {
    VersionInfo::new(v(current), v(latest))
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 9, 0, 0).unwrap()
}

/// Creates a SqliteStore in a fresh temp dir; keep the TempDir alive
pub fn temp_store() -> (TempDir, SqliteStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteStore::new(&temp_dir.path().join("state.db"), "com.example.app").unwrap();
    (temp_dir, store)
}
