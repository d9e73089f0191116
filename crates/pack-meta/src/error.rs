//! Error types for pack-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] pack_fs::Error),

    #[error("Pack descriptor not found at {path}")]
    DescriptorNotFound { path: PathBuf },

    #[error("Invalid YAML in {path}: {message}")]
    DescriptorParse { path: PathBuf, message: String },

    #[error("Invalid pack name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("Invalid version requirement '{requirement}': {reason}")]
    InvalidRequirement { requirement: String, reason: String },
}
