use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Track '{track}' not found in chart (available: {available})")]
    TrackNotFound { track: String, available: String },

    #[error("Invalid track name: {0}")]
    InvalidTrackName(String),

    #[error("Track '{track}' is not sorted by time at note {index}")]
    UnsortedNotes { track: String, index: usize },

    #[error("Invalid setting {key} = {value}")]
    InvalidSetting { key: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
