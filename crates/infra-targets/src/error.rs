//! Error types for infra-targets

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] infra_fs::Error),

    #[error("Existing config at {path} is not valid JSON: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Existing config at {path} has an unexpected shape at '{pointer}' (expected an object)")]
    UnexpectedShape { path: PathBuf, pointer: String },

    #[error("Required key {section}.{key} is missing from the infrastructure config")]
    MissingKey { section: String, key: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn missing(section: &str, key: &str) -> Self {
        Self::MissingKey {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}
