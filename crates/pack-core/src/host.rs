//! HostConfigMerger: registers a pack in the host configuration
//!
//! The host document keeps a registry under [`REGISTRY_KEY`] with at most one
//! entry per pack id. Merging parses the document, upserts the entry through
//! the format handler and writes the document back only when it changed.
//! Host integration is optional: a missing document is skipped with a warning.

use pack_content::{DiffStats, Format, RegistryHandler, unified_diff};
use pack_fs::{InstallLayout, NormalizedPath, io};
use pack_meta::PackDescriptor;
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::context::InstallationContext;
use crate::error::{Error, Result};

/// Top-level key of the pack registry in host documents
pub const REGISTRY_KEY: &str = "expansionPacks";

/// A pack's registration in the host document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostConfigEntry {
    /// Entries written by other tools may omit the flag
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default)]
    pub version: String,
    #[serde(rename = "slashPrefix", default, skip_serializing_if = "Option::is_none")]
    pub slash_prefix: Option<String>,
    #[serde(default)]
    pub agents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Installation directory, relative to the target root
    #[serde(default)]
    pub path: String,
}

fn enabled_by_default() -> bool {
    true
}

impl HostConfigEntry {
    pub fn from_descriptor(descriptor: &PackDescriptor, layout: &InstallLayout) -> Self {
        Self {
            enabled: true,
            version: descriptor.version.clone(),
            slash_prefix: descriptor.slash_prefix.clone(),
            agents: descriptor.agent_ids().into_iter().map(str::to_string).collect(),
            domain: descriptor.domain.clone(),
            path: layout.dir_name().to_string(),
        }
    }
}

/// How an existing registration is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Add the entry if absent, never overwrite
    Register,
    /// Overwrite an existing entry when the pack version is newer
    Reinstall,
}

/// What a merge did to the host document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeOutcome {
    Skipped { reason: String },
    Inserted,
    Updated { from: String, to: String },
    Unchanged,
}

impl MergeOutcome {
    pub fn changed(&self) -> bool {
        matches!(self, Self::Inserted | Self::Updated { .. })
    }
}

impl std::fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skipped { reason } => write!(f, "skipped ({reason})"),
            Self::Inserted => write!(f, "registered"),
            Self::Updated { from, to } => write!(f, "updated {from} -> {to}"),
            Self::Unchanged => write!(f, "already registered"),
        }
    }
}

/// A computed but not yet written merge
#[derive(Debug, Clone)]
pub struct HostMergePlan {
    /// Host document, `None` when the merge is skipped
    pub path: Option<NormalizedPath>,
    pub outcome: MergeOutcome,
    pub before: String,
    pub after: String,
}

impl HostMergePlan {
    fn skipped(reason: String) -> Self {
        Self {
            path: None,
            outcome: MergeOutcome::Skipped { reason },
            before: String::new(),
            after: String::new(),
        }
    }

    pub fn stats(&self) -> DiffStats {
        DiffStats::compute(&self.before, &self.after)
    }
}

/// Reads and updates the pack registry of the host document
pub struct HostConfigMerger<'a> {
    ctx: &'a InstallationContext,
}

impl<'a> HostConfigMerger<'a> {
    pub fn new(ctx: &'a InstallationContext) -> Self {
        Self { ctx }
    }

    /// Host document and its format, or the reason host integration is off.
    fn open(&self) -> std::result::Result<(NormalizedPath, Format), String> {
        let Some(path) = &self.ctx.host_config_path else {
            return Err("no host configuration".to_string());
        };
        if let Some(parent) = path.parent() {
            if !parent.is_dir() {
                return Err(format!("host configuration directory {parent} does not exist"));
            }
        }
        if !path.is_file() {
            return Err(format!("host configuration {path} does not exist"));
        }
        let extension = path.extension().unwrap_or("");
        match Format::from_extension(extension) {
            Some(format) => Ok((path.clone(), format)),
            None => Err(format!("unsupported host configuration format '.{extension}'")),
        }
    }

    /// Compute the merge without writing anything.
    pub fn plan(
        &self,
        descriptor: &PackDescriptor,
        layout: &InstallLayout,
        mode: MergeMode,
    ) -> Result<HostMergePlan> {
        let (path, format) = match self.open() {
            Ok(found) => found,
            Err(reason) => return Ok(HostMergePlan::skipped(reason)),
        };
        let handler = format.handler();
        let before = io::read_text(&path)?;
        let id = descriptor.id();

        let existing = handler.get_entry(&before, REGISTRY_KEY, id)?;
        let wanted = HostConfigEntry::from_descriptor(descriptor, layout);

        let outcome = match (&existing, mode) {
            (None, _) => MergeOutcome::Inserted,
            (Some(_), MergeMode::Register) => MergeOutcome::Unchanged,
            (Some(current), MergeMode::Reinstall) => {
                let recorded = current
                    .get("version")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                if is_version_bump(&recorded, &wanted.version) {
                    MergeOutcome::Updated {
                        from: recorded,
                        to: wanted.version.clone(),
                    }
                } else {
                    MergeOutcome::Unchanged
                }
            }
        };

        let after = if outcome.changed() {
            let entry = serde_json::to_value(&wanted).map_err(|e| Error::InvalidHostEntry {
                id: id.to_string(),
                message: e.to_string(),
            })?;
            handler.upsert_entry(&before, REGISTRY_KEY, id, &entry)?
        } else {
            before.clone()
        };

        // Upsert can be a textual no-op when the entry already matches
        let outcome = if outcome.changed() && after == before {
            MergeOutcome::Unchanged
        } else {
            outcome
        };

        Ok(HostMergePlan {
            path: Some(path),
            outcome,
            before,
            after,
        })
    }

    /// Register the pack in the host document.
    ///
    /// The document is only rewritten when the outcome is `Inserted` or
    /// `Updated`.
    pub fn merge(
        &self,
        descriptor: &PackDescriptor,
        layout: &InstallLayout,
        mode: MergeMode,
    ) -> Result<MergeOutcome> {
        let plan = self.plan(descriptor, layout, mode)?;
        match (&plan.outcome, &plan.path) {
            (MergeOutcome::Skipped { reason }, _) => {
                tracing::warn!(%reason, "skipping host integration");
            }
            (outcome, Some(path)) if outcome.changed() => {
                io::write_text(path, &plan.after)?;
                tracing::info!(path = %path, %outcome, "updated host configuration");
            }
            _ => tracing::debug!("host configuration already up to date"),
        }
        Ok(plan.outcome)
    }

    /// Unified diff of the change a merge would make, `None` when host
    /// integration is skipped or nothing would change.
    pub fn render_diff(
        &self,
        descriptor: &PackDescriptor,
        layout: &InstallLayout,
        mode: MergeMode,
    ) -> Result<Option<String>> {
        let plan = self.plan(descriptor, layout, mode)?;
        let (Some(path), true) = (&plan.path, plan.outcome.changed()) else {
            return Ok(None);
        };
        Ok(Some(unified_diff(
            &plan.before,
            &plan.after,
            &format!("a/{path}"),
            &format!("b/{path}"),
        )))
    }

    /// The registration of `id`, if host integration is configured and the
    /// document holds one.
    pub fn lookup(&self, id: &str) -> Result<Option<HostConfigEntry>> {
        let Ok((path, format)) = self.open() else {
            return Ok(None);
        };
        let text = io::read_text(&path)?;
        let Some(value) = format.handler().get_entry(&text, REGISTRY_KEY, id)? else {
            return Ok(None);
        };
        let entry = serde_json::from_value(value).map_err(|e| Error::InvalidHostEntry {
            id: id.to_string(),
            message: e.to_string(),
        })?;
        Ok(Some(entry))
    }
}

/// `wanted` is a newer semver than `recorded`. An unreadable recorded version
/// counts as older.
fn is_version_bump(recorded: &str, wanted: &str) -> bool {
    match (Version::parse(recorded), Version::parse(wanted)) {
        (Ok(recorded), Ok(wanted)) => wanted > recorded,
        (Err(_), Ok(_)) => true,
        _ => false,
    }
}
