//! Well-known file and directory names of packs and installations.

use std::path::Path;

/// Standard pack and installation filesystem markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackPath {
    /// The pack descriptor (`config.yaml`), in the pack root and the installation root
    Descriptor,
    /// The install manifest written into the installation root
    Manifest,
    /// Primary pack documentation
    Readme,
    /// Agent-facing pack documentation
    AgentGuide,
    /// Directory holding team bundles (`*.txt`)
    TeamsDir,
    /// The host framework's own directory in a target project
    HostFrameworkDir,
}

impl PackPath {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Descriptor => "config.yaml",
            Self::Manifest => "install-manifest.yaml",
            Self::Readme => "README.md",
            Self::AgentGuide => "CLAUDE.md",
            Self::TeamsDir => "teams",
            Self::HostFrameworkDir => ".bmad-core",
        }
    }

    /// Top-level files a pack source tree must contain.
    pub fn required_pack_files() -> &'static [PackPath] {
        &[Self::Descriptor, Self::Readme, Self::AgentGuide]
    }
}

impl AsRef<Path> for PackPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for PackPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for PackPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Host configuration documents looked for under the target, in order.
pub const DEFAULT_HOST_CONFIGS: &[&str] = &[".bmad-core/core-config.yaml", "bmad-config.json"];
