//! Format detection and handler trait

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::handlers::{JsonHandler, TomlHandler, YamlHandler};

/// Supported host document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Like [`Format::from_extension`], but unknown extensions are an error.
    pub fn require(ext: &str) -> Result<Self> {
        Self::from_extension(ext).ok_or_else(|| Error::UnsupportedFormat(ext.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Json => "JSON",
            Self::Toml => "TOML",
        }
    }

    /// Handler for this format
    pub fn handler(&self) -> Box<dyn RegistryHandler> {
        match self {
            Self::Yaml => Box::new(YamlHandler::new()),
            Self::Json => Box::new(JsonHandler::new()),
            Self::Toml => Box::new(TomlHandler::new()),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Reads and upserts entries of a keyed registry section.
///
/// The registry lives under a top-level key. It is either a map keyed by
/// entry id, or (older layout) a list of maps carrying the id in `name`.
/// Entries are exchanged as JSON objects regardless of the document format.
pub trait RegistryHandler: Send + Sync {
    /// Format identifier
    fn format(&self) -> Format;

    /// Parse the whole document into a format-neutral tree for comparison.
    fn normalize(&self, source: &str) -> Result<Value>;

    /// The entry registered under `id`, if any.
    fn get_entry(&self, source: &str, registry: &str, id: &str) -> Result<Option<Value>>;

    /// Insert or replace the entry for `id`, creating the registry section
    /// when it is missing. Returns the new document text.
    fn upsert_entry(&self, source: &str, registry: &str, id: &str, entry: &Value)
    -> Result<String>;
}

/// Entry fields as an object, rejecting anything else.
pub(crate) fn entry_object<'a>(format: Format, entry: &'a Value) -> Result<&'a Map<String, Value>> {
    entry
        .as_object()
        .ok_or_else(|| Error::structure(format.name(), "registry entry must be an object"))
}

/// Entry shape for the list layout: `name` first, then the entry fields.
pub(crate) fn named_entry(id: &str, entry: &Map<String, Value>) -> Map<String, Value> {
    let mut named = Map::new();
    named.insert("name".to_string(), Value::String(id.to_string()));
    for (key, value) in entry {
        if key != "name" {
            named.insert(key.clone(), value.clone());
        }
    }
    named
}
