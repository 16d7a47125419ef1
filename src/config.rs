use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::engine::decision::DecisionEngine;
use crate::error::ConfigError;
use crate::rules::{Rules, RulesManager};

/// Days a release must be public before users are prompted about it
pub const DEFAULT_RELEASED_FOR_DAYS: u32 = 1;

/// Application id used when the configuration does not name one
pub const DEFAULT_APP_ID: &str = "default";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct NudgeConfig {
    pub app_id: String,
    pub released_for_days: u32,
    pub rules: RulesConfig,
}

impl Default for NudgeConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            released_for_days: DEFAULT_RELEASED_FOR_DAYS,
            rules: RulesConfig::default(),
        }
    }
}

/// Per-severity rules; unset entries inherit `global`, then the default
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    pub global: Option<RulesEntry>,
    pub major: Option<RulesEntry>,
    pub minor: Option<RulesEntry>,
    pub patch: Option<RulesEntry>,
    pub revision: Option<RulesEntry>,
}

/// Either a preset name (`"critical"`) or explicit rules
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RulesEntry {
    Preset(String),
    Explicit(Rules),
}

impl RulesEntry {
    fn resolve(&self) -> Result<Rules, ConfigError> {
        match self {
            RulesEntry::Preset(name) => Rules::preset(name),
            RulesEntry::Explicit(rules) => Ok(*rules),
        }
    }
}

fn resolve(entry: &Option<RulesEntry>) -> Result<Option<Rules>, ConfigError> {
    entry.as_ref().map(RulesEntry::resolve).transpose()
}

impl NudgeConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load configuration, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the rules section and build the manager
    pub fn rules_manager(&self) -> Result<RulesManager, ConfigError> {
        let mut builder = RulesManager::builder();
        if let Some(rules) = resolve(&self.rules.global)? {
            builder = builder.global(rules);
        }
        if let Some(rules) = resolve(&self.rules.major)? {
            builder = builder.major(rules);
        }
        if let Some(rules) = resolve(&self.rules.minor)? {
            builder = builder.minor(rules);
        }
        if let Some(rules) = resolve(&self.rules.patch)? {
            builder = builder.patch(rules);
        }
        if let Some(rules) = resolve(&self.rules.revision)? {
            builder = builder.revision(rules);
        }
        Ok(builder.build())
    }

    pub fn decision_engine(&self) -> DecisionEngine {
        DecisionEngine::new().with_released_for_days(self.released_for_days)
    }
}

/// Returns the path to the data directory for release-nudge.
/// Uses $XDG_DATA_HOME/release-nudge if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/release-nudge,
/// or ./release-nudge if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the state database.
pub fn db_path() -> PathBuf {
    data_dir().join("state.db")
}

/// Returns the directory for log files.
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Returns the path to the configuration file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("release-nudge")
}
