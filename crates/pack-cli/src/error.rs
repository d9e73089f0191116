//! Error types for pack-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from pack-core
    #[error(transparent)]
    Core(#[from] pack_core::Error),

    /// Error from pack-meta
    #[error(transparent)]
    Meta(#[from] pack_meta::Error),

    /// Error from pack-fs
    #[error(transparent)]
    Fs(#[from] pack_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output could not be rendered
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A validation report held errors
    #[error("validation failed with {errors} error(s)")]
    ValidationFailed { errors: usize },

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
