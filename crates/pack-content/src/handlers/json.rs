//! JSON format handler
//!
//! Key order is kept (`preserve_order`), so re-serializing only changes the
//! registry entry and the whitespace of documents that were not already
//! pretty-printed with two spaces.

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::format::{Format, RegistryHandler, entry_object, named_entry};

/// Handler for JSON files
#[derive(Debug, Default)]
pub struct JsonHandler;

impl JsonHandler {
    pub fn new() -> Self {
        Self
    }

    fn parse_root(source: &str) -> Result<Map<String, Value>> {
        if source.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(source).map_err(|e| Error::parse("JSON", e.to_string()))? {
            Value::Object(map) => Ok(map),
            _ => Err(Error::structure("JSON", "root must be an object")),
        }
    }
}

impl RegistryHandler for JsonHandler {
    fn format(&self) -> Format {
        Format::Json
    }

    fn normalize(&self, source: &str) -> Result<Value> {
        Ok(Value::Object(Self::parse_root(source)?))
    }

    fn get_entry(&self, source: &str, registry: &str, id: &str) -> Result<Option<Value>> {
        let root = Self::parse_root(source)?;
        let entry = match root.get(registry) {
            Some(Value::Object(entries)) => entries.get(id).cloned(),
            Some(Value::Array(entries)) => entries
                .iter()
                .find(|e| e.get("name").and_then(Value::as_str) == Some(id))
                .cloned(),
            _ => None,
        };
        Ok(entry)
    }

    fn upsert_entry(
        &self,
        source: &str,
        registry: &str,
        id: &str,
        entry: &Value,
    ) -> Result<String> {
        let fields = entry_object(Format::Json, entry)?;
        let mut root = Self::parse_root(source)?;

        let section = root
            .entry(registry.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if section.is_null() {
            *section = Value::Object(Map::new());
        }

        match section {
            Value::Object(entries) => {
                // Existing keys keep their position
                entries.insert(id.to_string(), Value::Object(fields.clone()));
            }
            Value::Array(entries) => {
                let named = Value::Object(named_entry(id, fields));
                match entries
                    .iter_mut()
                    .find(|e| e.get("name").and_then(Value::as_str) == Some(id))
                {
                    Some(existing) => *existing = named,
                    None => entries.push(named),
                }
            }
            _ => {
                return Err(Error::structure(
                    "JSON",
                    format!("'{registry}' must be an object or an array"),
                ));
            }
        }

        let mut rendered = serde_json::to_string_pretty(&Value::Object(root))
            .map_err(|e| Error::render("JSON", e.to_string()))?;
        if source.is_empty() || source.ends_with('\n') {
            rendered.push('\n');
        }
        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_insert_creates_registry() {
        let handler = JsonHandler::new();
        let out = handler
            .upsert_entry("{\n  \"user\": 1\n}\n", "expansionPacks", "p", &json!({"enabled": true}))
            .unwrap();
        assert_eq!(
            out,
            "{\n  \"user\": 1,\n  \"expansionPacks\": {\n    \"p\": {\n      \"enabled\": true\n    }\n  }\n}\n"
        );
    }

    #[test]
    fn test_json_trailing_newline_follows_source() {
        let handler = JsonHandler::new();
        let out = handler
            .upsert_entry("{}", "expansionPacks", "p", &json!({}))
            .unwrap();
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn test_json_root_must_be_object() {
        let handler = JsonHandler::new();
        let err = handler
            .upsert_entry("[1, 2]", "expansionPacks", "p", &json!({}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidStructure { .. }));
    }

    #[test]
    fn test_json_entry_must_be_object() {
        let handler = JsonHandler::new();
        assert!(
            handler
                .upsert_entry("{}", "expansionPacks", "p", &json!("nope"))
                .is_err()
        );
    }
}
