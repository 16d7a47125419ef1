use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("Invalid version format {input:?}: {reason}")]
    InvalidVersionFormat { input: String, reason: String },
}

impl VersionError {
    pub(crate) fn invalid(input: &str, reason: impl Into<String>) -> Self {
        VersionError::InvalidVersionFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid metadata: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidVersion(#[from] VersionError),

    #[error("Metadata unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("Corrupt installation state: {0}")]
    Corrupt(String),

    #[error("Timestamp {0} cannot be stored")]
    TimestampOutOfRange(chrono::DateTime<chrono::Utc>),
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    InvalidVersion(VersionError),

    #[error("Fetch failed: {0}")]
    Fetch(FetchError),

    #[error("Persistence failed: {0}")]
    Persist(#[from] PersistError),

    #[error("An update check is already in progress")]
    InProgress,
}

impl From<VersionError> for CheckError {
    fn from(e: VersionError) -> Self {
        CheckError::InvalidVersion(e)
    }
}

impl From<FetchError> for CheckError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::InvalidVersion(e) => CheckError::InvalidVersion(e),
            other => CheckError::Fetch(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown rules preset: {0}")]
    UnknownPreset(String),
}
