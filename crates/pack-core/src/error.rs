//! Error types for pack-core

use std::path::PathBuf;

/// Result type for pack-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pack-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A pack file could not be copied into the installation
    #[error("Failed to copy {from} to {to}: {cause}")]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        cause: pack_fs::Error,
    },

    /// Two installed files map to the same manifest path
    #[error("Duplicate manifest path: {path}")]
    DuplicateManifestPath { path: String },

    /// No install manifest in the installation root
    #[error("Install manifest not found at {path}")]
    ManifestNotFound { path: PathBuf },

    /// Requested team file is not in the pack
    #[error("Team file not found: {name}")]
    TeamFileNotFound { name: String },

    /// Team file names must not contain directories
    #[error("Invalid team file name '{name}': expected a plain file name")]
    InvalidTeamFileName { name: String },

    /// Installation directory names must be a single path component
    #[error("Invalid installation directory '{name}': expected a plain directory name")]
    InvalidInstallDir { name: String },

    /// Refused to replace a directory outside the target project
    #[error("Refusing to replace {path}: not an installation directory inside {target}")]
    UnsafeInstallRoot { path: PathBuf, target: PathBuf },

    /// Pack source failed validation; install refuses to proceed
    #[error("Pack validation failed with {} error(s): {}", errors.len(), errors.join("; "))]
    InvalidPack { errors: Vec<String> },

    /// The host registry holds an entry that is not a pack registration
    #[error("Invalid host entry for '{id}': {message}")]
    InvalidHostEntry { id: String, message: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from pack-fs
    #[error(transparent)]
    Fs(#[from] pack_fs::Error),

    /// Metadata error from pack-meta
    #[error(transparent)]
    Meta(#[from] pack_meta::Error),

    /// Content error from pack-content
    #[error(transparent)]
    Content(#[from] pack_content::Error),
}
