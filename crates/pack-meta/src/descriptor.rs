//! Pack descriptor parsing for `config.yaml` files.
//!
//! The descriptor identifies a pack and declares the agents, tasks,
//! templates and slash commands it ships. It lives in the pack root and is
//! copied verbatim into every installation.
//!
//! # Example YAML
//!
//! ```yaml
//! name: bmad-odoo-dev
//! version: 1.2.0
//! short-title: Odoo Development Pack
//! description: Agents and workflows for Odoo addon development
//! author: Odoo Team
//! slashPrefix: OdooMethod
//! domain: odoo
//! supported-versions: ">=4.0.0"
//! agents:
//!   - odoo-analyst
//!   - id: odoo-architect
//!     description: Designs addon structure
//! tasks:
//!   - create-addon.md
//! templates:
//!   - addon-spec.yaml
//! commands:
//!   - create-addon
//! ```

use std::path::Path;

use semver::{Version, VersionReq};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};
use pack_fs::{NormalizedPath, io};

/// Complete pack descriptor loaded from `config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PackDescriptor {
    /// Pack id (e.g., "bmad-odoo-dev").
    pub name: String,
    /// Semver version string.
    pub version: String,
    /// Short human-readable title.
    #[serde(rename = "short-title", default, skip_serializing_if = "Option::is_none")]
    pub short_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Prefix for slash commands (e.g., "OdooMethod").
    #[serde(rename = "slashPrefix", default, skip_serializing_if = "Option::is_none")]
    pub slash_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Semver requirement on the host framework version.
    #[serde(
        rename = "supported-versions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub supported_versions: Option<String>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub agents: Vec<Declared>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub tasks: Vec<Declared>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub templates: Vec<Declared>,
    #[serde(default, deserialize_with = "nullable_list")]
    pub commands: Vec<Declared>,
}

/// An item declared by the descriptor: either a bare id or an id with a
/// description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Declared {
    Id(String),
    Detailed {
        #[serde(alias = "name")]
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl Declared {
    pub fn id(&self) -> &str {
        match self {
            Declared::Id(id) => id,
            Declared::Detailed { id, .. } => id,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Declared::Id(_) => None,
            Declared::Detailed { description, .. } => description.as_deref(),
        }
    }
}

/// `key:` with no value is null in YAML; treat it as an empty list.
fn nullable_list<'de, D>(deserializer: D) -> std::result::Result<Vec<Declared>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Declared>>::deserialize(deserializer)?.unwrap_or_default())
}

impl PackDescriptor {
    /// Parse and validate a descriptor from YAML text.
    ///
    /// `origin` is only used for error messages.
    pub fn from_yaml(content: &str, origin: &Path) -> Result<Self> {
        let descriptor: Self =
            serde_yaml::from_str(content).map_err(|e| Error::DescriptorParse {
                path: origin.to_path_buf(),
                message: e.to_string(),
            })?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Load and validate the descriptor at `path`.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::DescriptorNotFound {
                path: path.to_native(),
            });
        }
        let content = io::read_text(path)?;
        let descriptor = Self::from_yaml(&content, &path.to_native())?;
        tracing::debug!(
            id = %descriptor.name,
            version = %descriptor.version,
            "loaded pack descriptor"
        );
        Ok(descriptor)
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidName {
                name: self.name.clone(),
                reason: "name must not be empty".to_string(),
            });
        }
        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::InvalidName {
                name: self.name.clone(),
                reason: "name must contain only ASCII alphanumeric characters, hyphens, or underscores"
                    .to_string(),
            });
        }

        self.semver()?;

        if let Some(requirement) = &self.supported_versions {
            VersionReq::parse(requirement).map_err(|e| Error::InvalidRequirement {
                requirement: requirement.clone(),
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }

    /// The pack id used for the installation directory and host registry.
    pub fn id(&self) -> &str {
        &self.name
    }

    /// Title for display, falling back to the id.
    pub fn title(&self) -> &str {
        self.short_title.as_deref().unwrap_or(&self.name)
    }

    /// Parsed semver version.
    pub fn semver(&self) -> Result<Version> {
        Version::parse(&self.version).map_err(|e| Error::InvalidVersion {
            version: self.version.clone(),
            reason: e.to_string(),
        })
    }

    /// Whether the pack supports the given host framework version.
    ///
    /// A descriptor without `supported-versions` is compatible with any host.
    pub fn is_compatible_with(&self, host_version: &str) -> Result<bool> {
        let Some(requirement) = &self.supported_versions else {
            return Ok(true);
        };
        let requirement = VersionReq::parse(requirement).map_err(|e| Error::InvalidRequirement {
            requirement: requirement.clone(),
            reason: e.to_string(),
        })?;
        let version = Version::parse(host_version).map_err(|e| Error::InvalidVersion {
            version: host_version.to_string(),
            reason: e.to_string(),
        })?;
        Ok(requirement.matches(&version))
    }

    pub fn agent_ids(&self) -> Vec<&str> {
        self.agents.iter().map(Declared::id).collect()
    }

    /// Agent invocations as typed by users (`*odoo-analyst`).
    pub fn agent_invocations(&self) -> Vec<String> {
        self.agents.iter().map(|a| format!("*{}", a.id())).collect()
    }

    /// Slash commands as typed by users (`*OdooMethod create-addon`).
    pub fn slash_commands(&self) -> Vec<String> {
        self.commands
            .iter()
            .map(|c| match &self.slash_prefix {
                Some(prefix) => format!("*{} {}", prefix, c.id()),
                None => format!("*{}", c.id()),
            })
            .collect()
    }
}
