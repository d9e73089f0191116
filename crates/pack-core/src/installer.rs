//! Installer: runs an installation end to end
//!
//! Phases run in a fixed order: validate the pack, plan the copies, replace
//! the installation directory, write the manifest, register with the host.
//! A fatal error in any phase stops the run before the later ones.

use pack_meta::{CategorySpec, PackDescriptor, default_categories};
use serde::Serialize;

use crate::context::InstallationContext;
use crate::error::{Error, Result};
use crate::host::{HostConfigMerger, MergeMode, MergeOutcome};
use crate::manifest::{InstallManifest, ManifestBuilder};
use crate::sync::{FileSyncPlanner, SyncPlan};
use crate::validate::InstallationValidator;

/// Knobs of a single install run
#[derive(Debug, Clone)]
pub struct InstallOptions {
    pub categories: Vec<CategorySpec>,
    /// Host framework version to check `supported-versions` against
    pub framework_version: Option<String>,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            framework_version: None,
        }
    }
}

/// What an install did
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    #[serde(skip)]
    pub descriptor: PackDescriptor,
    pub manifest: InstallManifest,
    pub merge: MergeOutcome,
    /// A previous installation was replaced
    pub reinstalled: bool,
    pub skipped_categories: Vec<String>,
    pub warnings: Vec<String>,
}

/// What an install would do
#[derive(Debug, Clone)]
pub struct InstallPreview {
    pub descriptor: PackDescriptor,
    pub plan: SyncPlan,
    pub merge: MergeOutcome,
    /// Unified diff of the host document, when it would change
    pub host_diff: Option<String>,
    pub warnings: Vec<String>,
}

pub struct Installer<'a> {
    ctx: &'a InstallationContext,
}

impl<'a> Installer<'a> {
    pub fn new(ctx: &'a InstallationContext) -> Self {
        Self { ctx }
    }

    /// Install the pack into the target project.
    pub fn install(&self, options: &InstallOptions) -> Result<InstallReport> {
        let (descriptor, mut warnings) = self.prepare(options)?;
        let layout = self.ctx.layout_for(descriptor.id());

        let planner = FileSyncPlanner::new(options.categories.clone());
        let plan = planner.plan(self.ctx, &layout)?;
        tracing::info!(pack = descriptor.id(), files = plan.copies.len(), "installing");
        let outcome = planner.execute(&plan)?;

        let manifest = ManifestBuilder::build(&descriptor, self.ctx, &outcome.files)?;
        ManifestBuilder::write(&manifest, &layout)?;

        let mode = merge_mode(outcome.replaced_existing);
        let merge = HostConfigMerger::new(self.ctx).merge(&descriptor, &layout, mode)?;
        if let MergeOutcome::Skipped { reason } = &merge {
            warnings.push(format!("Host integration skipped: {reason}"));
        }

        tracing::info!(pack = descriptor.id(), version = %descriptor.version, "install complete");
        Ok(InstallReport {
            descriptor,
            manifest,
            merge,
            reinstalled: outcome.replaced_existing,
            skipped_categories: plan.skipped_categories,
            warnings,
        })
    }

    /// Plan the install without touching the target.
    pub fn preview(&self, options: &InstallOptions) -> Result<InstallPreview> {
        let (descriptor, mut warnings) = self.prepare(options)?;
        let layout = self.ctx.layout_for(descriptor.id());
        let plan = FileSyncPlanner::new(options.categories.clone()).plan(self.ctx, &layout)?;

        let mode = merge_mode(layout.root().is_dir());
        let merger = HostConfigMerger::new(self.ctx);
        let host = merger.plan(&descriptor, &layout, mode)?;
        if let MergeOutcome::Skipped { reason } = &host.outcome {
            warnings.push(format!("Host integration skipped: {reason}"));
        }
        let host_diff = merger.render_diff(&descriptor, &layout, mode)?;

        Ok(InstallPreview {
            descriptor,
            plan,
            merge: host.outcome,
            host_diff,
            warnings,
        })
    }

    /// Validate the pack and collect advisory warnings.
    fn prepare(&self, options: &InstallOptions) -> Result<(PackDescriptor, Vec<String>)> {
        let report = InstallationValidator::new(self.ctx, &options.categories).validate_pack()?;
        if !report.valid {
            return Err(Error::InvalidPack {
                errors: report.errors,
            });
        }
        let descriptor = self.ctx.load_descriptor()?;
        let mut warnings = report.warnings;

        let framework = self.ctx.host_framework_dir();
        if !framework.is_dir() {
            warnings.push(format!(
                "Host framework directory {framework} not found; install the host framework first"
            ));
        }

        if let Some(version) = &options.framework_version {
            if !descriptor.is_compatible_with(version)? {
                warnings.push(format!(
                    "{} {} supports host versions {}, found {version}",
                    descriptor.id(),
                    descriptor.version,
                    descriptor.supported_versions.as_deref().unwrap_or("*"),
                ));
            }
        }

        for warning in &warnings {
            tracing::warn!("{warning}");
        }
        Ok((descriptor, warnings))
    }
}

/// An existing installation switches the host merge to reinstall semantics.
fn merge_mode(existing: bool) -> MergeMode {
    if existing {
        MergeMode::Reinstall
    } else {
        MergeMode::Register
    }
}
