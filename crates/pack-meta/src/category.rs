//! Content categories
//!
//! Every kind of pack content (agents, tasks, templates, ...) is described by
//! one [`CategorySpec`] row. The installer and validator iterate the table
//! generically, so adding a category is a data change.

use serde::{Deserialize, Serialize};

/// One row of the category table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Category name used in reports (e.g., "agents").
    pub name: String,
    /// Directory in the pack root holding the sources.
    pub source_dir: String,
    /// Directory inside the installation root receiving the copies.
    pub dest_dir: String,
    /// Accepted file extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// The pack must provide this directory.
    #[serde(default)]
    pub required: bool,
    /// The directory must hold at least one matching file.
    #[serde(default)]
    pub non_empty: bool,
    /// Files of this category are copied into the installation.
    #[serde(default = "default_installed")]
    pub installed: bool,
}

fn default_installed() -> bool {
    true
}

impl CategorySpec {
    /// A required, installed category whose source and destination
    /// directories share its name.
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            source_dir: name.to_string(),
            dest_dir: name.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            required: true,
            non_empty: false,
            installed: true,
        }
    }

    /// Zero matching files is an error rather than a warning.
    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Validated and listed, but not copied into the installation.
    pub fn not_installed(mut self) -> Self {
        self.installed = false;
        self
    }

    /// Whether `file_name` passes the extension filter (case-insensitive).
    pub fn matches(&self, file_name: &str) -> bool {
        let Some((stem, ext)) = file_name.rsplit_once('.') else {
            return false;
        };
        !stem.is_empty() && self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }

    /// Extension filter rendered for messages (`.yaml/.yml`).
    pub fn extension_list(&self) -> String {
        self.extensions
            .iter()
            .map(|e| format!(".{e}"))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// The built-in category table.
pub fn default_categories() -> Vec<CategorySpec> {
    vec![
        CategorySpec::new("agents", &["md"]),
        CategorySpec::new("tasks", &["md"]),
        CategorySpec::new("templates", &["yaml", "yml"]).optional(),
        CategorySpec::new("checklists", &["md"]).optional(),
        CategorySpec::new("data", &["md"]).optional(),
        CategorySpec::new("teams", &["txt"]).non_empty().not_installed(),
    ]
}
