//! TOML format handler using toml_edit for format preservation

use serde_json::Value;
use toml_edit::{Array, ArrayOfTables, DocumentMut, InlineTable, Item, Table};

use crate::error::{Error, Result};
use crate::format::{Format, RegistryHandler, entry_object, named_entry};

/// Handler for TOML files using toml_edit for format preservation
#[derive(Debug, Default)]
pub struct TomlHandler;

impl TomlHandler {
    pub fn new() -> Self {
        Self
    }

    fn parse_doc(source: &str) -> Result<DocumentMut> {
        source
            .parse()
            .map_err(|e: toml_edit::TomlError| Error::parse("TOML", e.to_string()))
    }

    /// Replace the contents of `table` with `fields`, keeping its decor.
    fn fill_table(table: &mut Table, fields: &serde_json::Map<String, Value>) {
        table.clear();
        for (key, value) in fields {
            if let Some(v) = json_to_toml(value) {
                table.insert(key.as_str(), Item::Value(v));
            }
        }
    }
}

fn json_to_toml(value: &Value) -> Option<toml_edit::Value> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some((*b).into()),
        Value::Number(n) => n
            .as_i64()
            .map(toml_edit::Value::from)
            .or_else(|| n.as_f64().map(toml_edit::Value::from)),
        Value::String(s) => Some(s.as_str().into()),
        Value::Array(items) => {
            let array: Array = items.iter().filter_map(json_to_toml).collect();
            Some(toml_edit::Value::Array(array))
        }
        Value::Object(map) => {
            let mut table = InlineTable::new();
            for (key, value) in map {
                if let Some(v) = json_to_toml(value) {
                    table.insert(key.as_str(), v);
                }
            }
            Some(toml_edit::Value::InlineTable(table))
        }
    }
}

fn table_to_json(table: &Table) -> Value {
    let mut map = serde_json::Map::new();
    let mut keys: Vec<_> = table.iter().map(|(k, _)| k.to_string()).collect();
    keys.sort();

    for key in keys {
        if let Some(item) = table.get(&key) {
            map.insert(key, item_to_json(item));
        }
    }
    Value::Object(map)
}

fn item_to_json(item: &Item) -> Value {
    match item {
        Item::Value(v) => value_to_json(v),
        Item::Table(t) => table_to_json(t),
        Item::ArrayOfTables(arr) => Value::Array(arr.iter().map(table_to_json).collect()),
        Item::None => Value::Null,
    }
}

fn value_to_json(v: &toml_edit::Value) -> Value {
    match v {
        toml_edit::Value::String(s) => Value::String(s.value().to_string()),
        toml_edit::Value::Integer(i) => Value::Number((*i.value()).into()),
        toml_edit::Value::Float(f) => serde_json::Number::from_f64(*f.value())
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml_edit::Value::Boolean(b) => Value::Bool(*b.value()),
        toml_edit::Value::Datetime(d) => Value::String(d.to_string()),
        toml_edit::Value::Array(arr) => Value::Array(arr.iter().map(value_to_json).collect()),
        toml_edit::Value::InlineTable(t) => {
            let mut map = serde_json::Map::new();
            let mut keys: Vec<_> = t.iter().map(|(k, _)| k.to_string()).collect();
            keys.sort();
            for key in keys {
                if let Some(v) = t.get(&key) {
                    map.insert(key, value_to_json(v));
                }
            }
            Value::Object(map)
        }
    }
}

fn find_named<'a>(tables: &'a mut ArrayOfTables, id: &str) -> Option<&'a mut Table> {
    tables
        .iter_mut()
        .find(|t| t.get("name").and_then(Item::as_str) == Some(id))
}

impl RegistryHandler for TomlHandler {
    fn format(&self) -> Format {
        Format::Toml
    }

    fn normalize(&self, source: &str) -> Result<Value> {
        Ok(table_to_json(Self::parse_doc(source)?.as_table()))
    }

    fn get_entry(&self, source: &str, registry: &str, id: &str) -> Result<Option<Value>> {
        let doc = Self::parse_doc(source)?;
        let entry = match doc.get(registry) {
            Some(Item::Table(entries)) => entries.get(id).map(item_to_json),
            Some(Item::Value(toml_edit::Value::InlineTable(entries))) => {
                entries.get(id).map(value_to_json)
            }
            Some(Item::ArrayOfTables(entries)) => entries
                .iter()
                .find(|t| t.get("name").and_then(Item::as_str) == Some(id))
                .map(table_to_json),
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
        let fields = entry_object(Format::Toml, entry)?;
        let mut doc = Self::parse_doc(source)?;

        let section = doc.entry(registry).or_insert_with(|| {
            let mut table = Table::new();
            table.set_implicit(true);
            Item::Table(table)
        });

        match section {
            Item::Table(entries) => match entries.get_mut(id).and_then(Item::as_table_mut) {
                Some(existing) => Self::fill_table(existing, fields),
                None => {
                    let mut table = Table::new();
                    Self::fill_table(&mut table, fields);
                    entries.insert(id, Item::Table(table));
                }
            },
            Item::Value(toml_edit::Value::InlineTable(entries)) => {
                if let Some(value) = json_to_toml(&Value::Object(fields.clone())) {
                    entries.insert(id, value);
                }
            }
            Item::ArrayOfTables(entries) => {
                let named = named_entry(id, fields);
                match find_named(entries, id) {
                    Some(existing) => Self::fill_table(existing, &named),
                    None => {
                        let mut table = Table::new();
                        Self::fill_table(&mut table, &named);
                        entries.push(table);
                    }
                }
            }
            _ => {
                return Err(Error::structure(
                    "TOML",
                    format!("'{registry}' must be a table or an array of tables"),
                ));
            }
        }

        Ok(doc.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toml_insert_keeps_comments() {
        let handler = TomlHandler::new();
        let source = "# host settings\nname = \"host\" # inline\n";
        let out = handler
            .upsert_entry(
                source,
                "expansionPacks",
                "p",
                &json!({"enabled": true, "agents": ["a", "b"]}),
            )
            .unwrap();

        assert!(out.starts_with("# host settings\nname = \"host\" # inline\n"));
        assert!(out.contains("[expansionPacks.p]"));
        assert!(!out.contains("[expansionPacks]\n"));
        let entry = handler.get_entry(&out, "expansionPacks", "p").unwrap().unwrap();
        assert_eq!(entry, json!({"agents": ["a", "b"], "enabled": true}));
    }

    #[test]
    fn test_toml_scalar_registry_rejected() {
        let handler = TomlHandler::new();
        let err = handler
            .upsert_entry("expansionPacks = 3\n", "expansionPacks", "p", &json!({}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidStructure { .. }));
    }
}
