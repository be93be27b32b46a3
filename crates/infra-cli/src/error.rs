//! Error types for infra-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error reading or parsing the infrastructure config
    #[error(transparent)]
    Config(#[from] infra_config::Error),

    /// Error generating or merging a target document
    #[error(transparent)]
    Targets(#[from] infra_targets::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
