//! On-disk layout of an installation
//!
//! An installation lives in `<target>/<dir_name>/` and holds one directory per
//! installed category, the copied descriptor and the install manifest.

use crate::{NormalizedPath, PackPath, Result, io, is_plain_file_name};

/// Path resolution for one installation directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    target_root: NormalizedPath,
    dir_name: String,
}

impl InstallLayout {
    /// Layout for `dir_name` inside `target_root`.
    pub fn new(target_root: NormalizedPath, dir_name: impl Into<String>) -> Self {
        Self {
            target_root,
            dir_name: dir_name.into(),
        }
    }

    /// Default installation directory name for a pack id (`.<id>`).
    pub fn default_dir_name(pack_id: &str) -> String {
        format!(".{pack_id}")
    }

    /// Installations found under `target_root`: hidden directories holding
    /// an install manifest, sorted by name.
    pub fn discover(target_root: &NormalizedPath) -> Result<Vec<Self>> {
        let mut found = Vec::new();
        for dir in io::list_dirs(target_root)? {
            let Some(name) = dir.file_name().filter(|n| n.starts_with('.')) else {
                continue;
            };
            let layout = Self::new(target_root.clone(), name);
            if layout.is_contained() && layout.manifest_path().is_file() {
                found.push(layout);
            }
        }
        Ok(found)
    }

    /// Whether the installation root is a direct child of the target.
    ///
    /// Removing the root is only allowed when this holds.
    pub fn is_contained(&self) -> bool {
        is_plain_file_name(&self.dir_name)
    }

    /// The project the pack is installed into.
    pub fn target_root(&self) -> &NormalizedPath {
        &self.target_root
    }

    /// Name of the installation directory, relative to the target.
    pub fn dir_name(&self) -> &str {
        &self.dir_name
    }

    /// The installation root.
    pub fn root(&self) -> NormalizedPath {
        self.target_root.join(&self.dir_name)
    }

    /// Directory receiving a category's files.
    pub fn category_dir(&self, dest_dir: &str) -> NormalizedPath {
        self.root().join(dest_dir)
    }

    /// Location of the install manifest.
    pub fn manifest_path(&self) -> NormalizedPath {
        self.root().join(PackPath::Manifest.as_str())
    }

    /// Location of the copied pack descriptor.
    pub fn descriptor_path(&self) -> NormalizedPath {
        self.root().join(PackPath::Descriptor.as_str())
    }

    /// Manifest-style path (relative to the target) for an absolute path.
    pub fn record_path(&self, absolute: &NormalizedPath) -> Option<String> {
        absolute.relative_to(&self.target_root)
    }

    /// Absolute path for a manifest-style relative path.
    pub fn resolve_record(&self, relative: &str) -> NormalizedPath {
        self.target_root.join(relative)
    }
}
