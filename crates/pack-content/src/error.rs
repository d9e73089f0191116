//! Error types for pack-content

/// Result type for pack-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pack-content operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to parse {format} content: {message}")]
    ParseError { format: String, message: String },

    #[error("Failed to render {format} content: {message}")]
    RenderError { format: String, message: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unexpected structure in {format} document: {message}")]
    InvalidStructure { format: String, message: String },
}

impl Error {
    pub fn parse(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn render(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RenderError {
            format: format.into(),
            message: message.into(),
        }
    }

    pub fn structure(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            format: format.into(),
            message: message.into(),
        }
    }
}
