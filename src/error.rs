use std::{io, path::PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("malformed date key: {0:?}")]
    MalformedKey(String),

    #[error("write at least one thing you're grateful for, or a short summary of the day")]
    EmptySubmission,

    #[error("invalid storage key {0:?}: keys cannot contain path separators")]
    InvalidKey(String),

    #[error("storage slot '{key}' unavailable: {source}")]
    Storage {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode entries: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to read config {path:?}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, JournalError>;
