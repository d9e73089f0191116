//! Explicit inputs of an installation run
//!
//! Every component receives an [`InstallationContext`] instead of consulting
//! the process working directory.

use pack_fs::{DEFAULT_HOST_CONFIGS, InstallLayout, NormalizedPath, PackPath, is_plain_file_name};
use pack_meta::PackDescriptor;

use crate::{Error, Result};

/// Where the pack comes from, where it goes, and which host document it
/// registers in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationContext {
    /// Root of the pack source tree (holds `config.yaml`)
    pub pack_root: NormalizedPath,
    /// Project the pack is installed into
    pub target_root: NormalizedPath,
    /// Host configuration document, if host integration is wanted
    pub host_config_path: Option<NormalizedPath>,
    /// Installation directory name; defaults to `.<pack-id>`
    pub install_dir_name: Option<String>,
    /// IDE integrations recorded in the manifest
    pub ide_targets: Vec<String>,
}

impl InstallationContext {
    pub fn new(pack_root: NormalizedPath, target_root: NormalizedPath) -> Self {
        Self {
            pack_root,
            target_root,
            host_config_path: None,
            install_dir_name: None,
            ide_targets: Vec::new(),
        }
    }

    pub fn with_host_config(mut self, path: Option<NormalizedPath>) -> Self {
        self.host_config_path = path;
        self
    }

    /// Install into `<target>/<name>` instead of `.<pack-id>`.
    ///
    /// `name` must be a single directory name; `.`, `..` and anything with a
    /// separator are rejected since reinstalling removes that directory.
    pub fn with_install_dir(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if !is_plain_file_name(&name) {
            return Err(Error::InvalidInstallDir { name });
        }
        self.install_dir_name = Some(name);
        Ok(self)
    }

    /// IDE targets are kept sorted and unique.
    pub fn with_ide_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut targets: Vec<String> = targets.into_iter().map(Into::into).collect();
        targets.sort();
        targets.dedup();
        self.ide_targets = targets;
        self
    }

    /// First default host document that exists under `target_root`.
    pub fn discover_host_config(target_root: &NormalizedPath) -> Option<NormalizedPath> {
        DEFAULT_HOST_CONFIGS
            .iter()
            .map(|candidate| target_root.join(candidate))
            .find(NormalizedPath::is_file)
    }

    /// The pack descriptor in the pack root.
    pub fn descriptor_path(&self) -> NormalizedPath {
        self.pack_root.join(PackPath::Descriptor.as_str())
    }

    pub fn load_descriptor(&self) -> Result<PackDescriptor> {
        Ok(PackDescriptor::load(&self.descriptor_path())?)
    }

    /// Installation layout for a pack id.
    pub fn layout_for(&self, pack_id: &str) -> InstallLayout {
        let dir_name = self
            .install_dir_name
            .clone()
            .unwrap_or_else(|| InstallLayout::default_dir_name(pack_id));
        InstallLayout::new(self.target_root.clone(), dir_name)
    }

    /// Installation layout of an existing or upcoming installation.
    ///
    /// An explicit directory name wins. Otherwise the pack id comes from the
    /// pack descriptor, and without a pack source the target is searched for
    /// an installed manifest.
    pub fn resolve_layout(&self) -> Result<InstallLayout> {
        if let Some(name) = &self.install_dir_name {
            return Ok(InstallLayout::new(self.target_root.clone(), name.clone()));
        }
        if !self.descriptor_path().is_file() {
            let mut found = InstallLayout::discover(&self.target_root)?;
            if !found.is_empty() {
                if found.len() > 1 {
                    tracing::warn!(
                        target_root = %self.target_root,
                        count = found.len(),
                        using = found[0].dir_name(),
                        "several installations found, pass an installation directory to choose"
                    );
                }
                return Ok(found.swap_remove(0));
            }
        }
        let descriptor = self.load_descriptor()?;
        Ok(self.layout_for(descriptor.id()))
    }

    /// Directory of the host framework in the target project.
    pub fn host_framework_dir(&self) -> NormalizedPath {
        self.target_root.join(PackPath::HostFrameworkDir.as_str())
    }
}
