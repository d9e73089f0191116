//! Installation engine for expansion packs
//!
//! `pack-core` sits above the Layer 0 crates and below the CLI:
//!
//! ```text
//!                  pack-cli
//!                     |
//!                 pack-core
//!                     |
//!      +--------------+--------------+
//!      |              |              |
//!   pack-fs       pack-meta     pack-content
//! ```
//!
//! - **FileSyncPlanner** decides which pack files are copied where
//! - **ManifestBuilder** records and later checks installed fingerprints
//! - **HostConfigMerger** registers the pack in the host configuration
//! - **InstallationValidator** checks packs and installations
//! - **Installer** runs the phases in order
//!
//! # Example
//!
//! ```ignore
//! use pack_core::{InstallOptions, InstallationContext, Installer};
//!
//! let ctx = InstallationContext::new(pack_root, target_root);
//! let report = Installer::new(&ctx).install(&InstallOptions::default())?;
//! println!("{} files", report.manifest.files.len());
//! ```

pub mod context;
pub mod error;
pub mod host;
pub mod installer;
pub mod manifest;
pub mod sync;
pub mod teams;
pub mod validate;

pub use context::InstallationContext;
pub use error::{Error, Result};
pub use host::{
    HostConfigEntry, HostConfigMerger, HostMergePlan, MergeMode, MergeOutcome, REGISTRY_KEY,
};
pub use installer::{InstallOptions, InstallPreview, InstallReport, Installer};
pub use manifest::{DriftReport, FileRecord, INSTALL_TYPE, InstallManifest, ManifestBuilder};
pub use sync::{FileSyncPlanner, InstalledFile, PlannedCopy, SyncOutcome, SyncPlan};
pub use teams::{copy_team_file, list_team_files};
pub use validate::{InstallationValidator, ValidationReport};
