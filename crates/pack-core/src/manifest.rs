//! Install manifest: the record of what an installation wrote
//!
//! The manifest lists every installed category file with the fingerprint of
//! its bytes right after the copy. A later drift check recomputes the
//! fingerprints and reports what changed, without touching the manifest.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use pack_fs::{ConfigStore, Fingerprint, InstallLayout, fingerprint_file};
use pack_meta::PackDescriptor;
use serde::{Deserialize, Serialize};

use crate::context::InstallationContext;
use crate::error::{Error, Result};
use crate::sync::InstalledFile;

/// `install_type` written by this installer
pub const INSTALL_TYPE: &str = "expansion-pack";

/// One installed file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to the target root, forward slashes
    pub path: String,
    /// Content fingerprint at install time
    pub hash: Fingerprint,
    /// Modified since install
    #[serde(default)]
    pub modified: bool,
}

/// Contents of `install-manifest.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallManifest {
    /// Pack version
    pub version: String,
    pub installed_at: DateTime<Utc>,
    pub install_type: String,
    pub expansion_pack_id: String,
    pub expansion_pack_name: String,
    #[serde(default)]
    pub ides_setup: Vec<String>,
    #[serde(default)]
    pub files: Vec<FileRecord>,
}

impl InstallManifest {
    pub fn record(&self, path: &str) -> Option<&FileRecord> {
        self.files.iter().find(|r| r.path == path)
    }

    /// Copy of the manifest with `modified` set on the records a drift check
    /// flagged.
    pub fn with_drift(&self, drift: &DriftReport) -> Self {
        let modified: HashSet<&str> = drift.modified.iter().map(String::as_str).collect();
        let mut marked = self.clone();
        for record in &mut marked.files {
            record.modified = modified.contains(record.path.as_str());
        }
        marked
    }

    /// First path that appears more than once, if any.
    pub fn duplicate_path(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.files
            .iter()
            .map(|r| r.path.as_str())
            .find(|path| !seen.insert(*path))
    }
}

/// Result of comparing a manifest against the disk
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriftReport {
    /// Records whose current fingerprint differs
    pub modified: Vec<String>,
    /// Records whose file no longer exists
    pub missing: Vec<String>,
    /// Records that still match
    pub unchanged: usize,
}

impl DriftReport {
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty() && self.missing.is_empty()
    }
}

/// Builds, stores and checks install manifests
pub struct ManifestBuilder;

impl ManifestBuilder {
    /// One record per installed file, fingerprinted from the destination.
    pub fn build(
        descriptor: &PackDescriptor,
        ctx: &InstallationContext,
        installed: &[InstalledFile],
    ) -> Result<InstallManifest> {
        let mut seen = HashSet::new();
        let mut files = Vec::with_capacity(installed.len());

        for file in installed {
            if !seen.insert(file.relative_path.as_str()) {
                return Err(Error::DuplicateManifestPath {
                    path: file.relative_path.clone(),
                });
            }
            let native = file.absolute.to_native();
            let hash = fingerprint_file(&native).map_err(|e| pack_fs::Error::io(&native, e))?;
            files.push(FileRecord {
                path: file.relative_path.clone(),
                hash,
                modified: false,
            });
        }

        Ok(InstallManifest {
            version: descriptor.version.clone(),
            installed_at: Utc::now(),
            install_type: INSTALL_TYPE.to_string(),
            expansion_pack_id: descriptor.id().to_string(),
            expansion_pack_name: descriptor.title().to_string(),
            ides_setup: ctx.ide_targets.clone(),
            files,
        })
    }

    /// Write the manifest into the installation root, replacing any previous one.
    pub fn write(manifest: &InstallManifest, layout: &InstallLayout) -> Result<()> {
        let path = layout.manifest_path();
        ConfigStore::new().save(&path, manifest)?;
        tracing::info!(path = %path, files = manifest.files.len(), "wrote install manifest");
        Ok(())
    }

    pub fn load(layout: &InstallLayout) -> Result<InstallManifest> {
        let path = layout.manifest_path();
        if !path.is_file() {
            return Err(Error::ManifestNotFound {
                path: path.to_native(),
            });
        }
        Ok(ConfigStore::new().load(&path)?)
    }

    /// Recompute every record's fingerprint and report differences.
    pub fn check_drift(manifest: &InstallManifest, layout: &InstallLayout) -> Result<DriftReport> {
        let mut report = DriftReport::default();

        for record in &manifest.files {
            let native = layout.resolve_record(&record.path).to_native();
            match fingerprint_file(&native) {
                Ok(current) if current == record.hash => report.unchanged += 1,
                Ok(_) => {
                    tracing::debug!(path = %record.path, "modified since install");
                    report.modified.push(record.path.clone());
                }
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    report.missing.push(record.path.clone());
                }
                Err(e) => return Err(pack_fs::Error::io(native, e).into()),
            }
        }

        Ok(report)
    }
}
