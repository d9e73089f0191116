//! InstallationValidator: structural checks of a pack and of an installation
//!
//! Checks never stop at the first problem. Structural problems are collected
//! as errors, advisory ones as warnings, and drift is listed separately. Only
//! unexpected I/O failures abort with `Err`.

use pack_fs::{ConfigStore, NormalizedPath, PackPath, io};
use pack_meta::{CategorySpec, PackDescriptor};
use serde::Serialize;

use crate::context::InstallationContext;
use crate::error::{Error, Result};
use crate::host::HostConfigMerger;
use crate::manifest::{INSTALL_TYPE, InstallManifest, ManifestBuilder};

/// Aggregated result of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Installed files changed since install
    pub modified: Vec<String>,
}

impl ValidationReport {
    fn new() -> Self {
        Self::default()
    }

    fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    fn finish(mut self) -> Self {
        self.valid = self.errors.is_empty();
        self
    }
}

/// Validates pack sources and installations against the category table
pub struct InstallationValidator<'a> {
    ctx: &'a InstallationContext,
    categories: &'a [CategorySpec],
}

impl<'a> InstallationValidator<'a> {
    pub fn new(ctx: &'a InstallationContext, categories: &'a [CategorySpec]) -> Self {
        Self { ctx, categories }
    }

    /// Check the pack source tree.
    pub fn validate_pack(&self) -> Result<ValidationReport> {
        let mut report = ValidationReport::new();
        let root = &self.ctx.pack_root;

        for file in PackPath::required_pack_files() {
            if !root.join(file.as_str()).is_file() {
                report.error(format!("Missing required file: {file}"));
            }
        }

        for category in self.categories {
            let dir = root.join(&category.source_dir);
            let Some(files) = io::list_files(&dir)? else {
                if category.required {
                    report.error(format!("Missing required directory: {}", category.source_dir));
                }
                continue;
            };

            let matching = files
                .iter()
                .filter_map(NormalizedPath::file_name)
                .filter(|name| category.matches(name))
                .count();
            if matching == 0 {
                if category.non_empty {
                    report.error(format!(
                        "No {} files ({}) found in {} directory",
                        category.name,
                        category.extension_list(),
                        category.source_dir
                    ));
                } else if category.name == "agents" {
                    report.warning("No agent files found in agents directory");
                }
            }
        }

        let descriptor_path = self.ctx.descriptor_path();
        if descriptor_path.is_file() {
            match PackDescriptor::load(&descriptor_path) {
                Ok(descriptor) => {
                    for (kind, empty) in [
                        ("agents", descriptor.agents.is_empty()),
                        ("tasks", descriptor.tasks.is_empty()),
                        ("templates", descriptor.templates.is_empty()),
                    ] {
                        if empty {
                            report.warning(format!(
                                "No {kind} defined in {}",
                                PackPath::Descriptor
                            ));
                        }
                    }
                }
                Err(pack_meta::Error::Fs(e)) => return Err(e.into()),
                Err(e) => report.error(format!("Invalid {}: {e}", PackPath::Descriptor)),
            }
        }

        tracing::debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "validated pack"
        );
        Ok(report.finish())
    }

    /// Check an existing installation in the target project.
    pub fn validate_installation(&self) -> Result<ValidationReport> {
        let mut report = ValidationReport::new();
        let layout = self.ctx.resolve_layout()?;
        let root = layout.root();

        if !root.is_dir() {
            report.error(format!("Installation directory not found: {}", layout.dir_name()));
            return Ok(report.finish());
        }

        let manifest = match self.load_manifest(&layout.manifest_path())? {
            Ok(manifest) => Some(manifest),
            Err(message) => {
                report.error(message);
                None
            }
        };

        let descriptor_path = layout.descriptor_path();
        let installed = if !descriptor_path.is_file() {
            report.error(format!("Missing installed {}", PackPath::Descriptor));
            None
        } else {
            match PackDescriptor::load(&descriptor_path) {
                Ok(descriptor) => Some(descriptor),
                Err(pack_meta::Error::Fs(e)) => return Err(e.into()),
                Err(e) => {
                    report.error(format!("Invalid installed {}: {e}", PackPath::Descriptor));
                    None
                }
            }
        };

        let Some(manifest) = manifest else {
            return Ok(report.finish());
        };

        if manifest.install_type != INSTALL_TYPE {
            report.warning(format!(
                "Unexpected install type '{}' (expected '{INSTALL_TYPE}')",
                manifest.install_type
            ));
        }

        if let Some(descriptor) = &installed {
            if manifest.expansion_pack_id != descriptor.id() {
                report.error(format!(
                    "Manifest pack id '{}' does not match installed descriptor '{}'",
                    manifest.expansion_pack_id,
                    descriptor.id()
                ));
            }
            if manifest.version != descriptor.version {
                report.error(format!(
                    "Manifest version {} does not match installed descriptor version {}",
                    manifest.version, descriptor.version
                ));
            }
        }

        if let Some(path) = manifest.duplicate_path() {
            report.error(format!("Duplicate manifest entry: {path}"));
        }

        let drift = ManifestBuilder::check_drift(&manifest, &layout)?;
        for path in drift.missing {
            report.error(format!("Missing installed file: {path}"));
        }
        report.modified = drift.modified;

        let id = installed
            .as_ref()
            .map(|d| d.id().to_string())
            .unwrap_or_else(|| manifest.expansion_pack_id.clone());
        if let Some(host_path) = &self.ctx.host_config_path {
            if !host_path.is_file() {
                report.warning(format!("Host configuration not found: {host_path}"));
            } else {
                match HostConfigMerger::new(self.ctx).lookup(&id) {
                    Ok(None) => report.warning(format!(
                        "Pack '{id}' is not registered in host configuration {host_path}"
                    )),
                    Ok(Some(entry)) if entry.version != manifest.version => {
                        report.warning(format!(
                            "Host configuration lists '{id}' at version {}, installed version is {}",
                            entry.version, manifest.version
                        ));
                    }
                    Ok(Some(_)) => {}
                    Err(e @ (Error::InvalidHostEntry { .. } | Error::Content(_))) => {
                        report.warning(format!("Unreadable host registration for '{id}': {e}"));
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        tracing::debug!(
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            modified = report.modified.len(),
            "validated installation"
        );
        Ok(report.finish())
    }

    /// The manifest, or a report message when it is absent or unreadable.
    fn load_manifest(
        &self,
        path: &NormalizedPath,
    ) -> Result<std::result::Result<InstallManifest, String>> {
        if !path.is_file() {
            return Ok(Err(format!("Missing {}", PackPath::Manifest)));
        }
        match ConfigStore::new().load(path) {
            Ok(manifest) => Ok(Ok(manifest)),
            Err(e @ pack_fs::Error::ConfigParse { .. }) => {
                Ok(Err(format!("Invalid {}: {e}", PackPath::Manifest)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_validity_follows_errors() {
        let mut report = ValidationReport::new();
        report.warning("advisory");
        report.modified.push(".p/agents/a.md".into());
        assert!(report.clone().finish().valid);

        report.error("broken");
        assert!(!report.finish().valid);
    }
}
