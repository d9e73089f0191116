//! YAML format handler using serde_yaml
//!
//! serde_yaml drops comments and formatting on a round trip, so upserts are
//! applied to the text. Only the lines of the upserted entry are replaced (or
//! appended to the registry block); sibling entries and everything outside
//! the registry keep their bytes. Every candidate text is parsed again and
//! compared with the expected tree. When the entry splice does not reproduce
//! it, the whole registry block is rendered instead, and as a last resort
//! (flow mappings, anchors, unusual indentation) the whole document.
//!
//! Example:
//! ```yaml
//! # Host settings
//! markdownExploder: true
//!
//! expansionPacks:
//!   bmad-odoo-dev:
//!     enabled: true
//!     version: 1.2.0
//!
//! devLoadAlwaysFiles: []
//! ```

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{Error, Result};
use crate::format::{Format, RegistryHandler, entry_object, named_entry};

/// A line that starts a new top-level node
static TOP_LEVEL_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s#-]").expect("Invalid top-level line regex"));

/// Indentation used for the entries of a registry block that has none yet
const DEFAULT_INDENT: usize = 2;

/// One line of the source, with its byte offsets
struct Line<'a> {
    start: usize,
    end: usize,
    text: &'a str,
}

impl<'a> Line<'a> {
    fn split(source: &'a str, range: Range<usize>) -> Vec<Self> {
        let mut offset = range.start;
        source[range]
            .split_inclusive('\n')
            .map(|raw| {
                let line = Line {
                    start: offset,
                    end: offset + raw.len(),
                    text: raw.trim_end_matches(['\n', '\r']),
                };
                offset = line.end;
                line
            })
            .collect()
    }

    fn indent(&self) -> usize {
        self.text.len() - self.text.trim_start_matches(' ').len()
    }

    /// Not blank and not a comment
    fn is_content(&self) -> bool {
        let trimmed = self.text.trim_start();
        !trimmed.is_empty() && !trimmed.starts_with('#')
    }

    fn is_sequence_item(&self) -> bool {
        let rest = self.text.trim_start_matches(' ');
        rest == "-" || rest.starts_with("- ")
    }
}

/// Where the upserted entry lives in a block registry
enum EntryShape {
    /// `<id>:` key of a mapping
    Keyed,
    /// `- name: <id>` item of a sequence; `None` appends
    Listed(Option<usize>),
}

/// Source range the rendered entry replaces, and its indentation
struct EntrySlot {
    span: Range<usize>,
    indent: usize,
}

/// Handler for YAML files using serde_yaml
#[derive(Debug, Default)]
pub struct YamlHandler;

impl YamlHandler {
    pub fn new() -> Self {
        Self
    }

    fn parse_root(source: &str) -> Result<Mapping> {
        if source.trim().is_empty() {
            return Ok(Mapping::new());
        }
        match serde_yaml::from_str(source).map_err(|e| Error::parse("YAML", e.to_string()))? {
            YamlValue::Mapping(map) => Ok(map),
            YamlValue::Null => Ok(Mapping::new()),
            _ => Err(Error::structure("YAML", "root must be a mapping")),
        }
    }

    /// Byte range of the top-level `key:` block, trailing blank and comment
    /// lines excluded.
    fn block_span(source: &str, key: &str) -> Result<Option<Range<usize>>> {
        let escaped = regex::escape(key);
        let key_line = Regex::new(&format!(
            r#"^(?:{escaped}|"{escaped}"|'{escaped}')[ \t]*:(?:[ \t]|$)"#
        ))
        .map_err(|e| Error::parse("YAML", e.to_string()))?;

        let mut offset = 0;
        let mut start = None;
        let mut end = 0;
        for line in source.split_inclusive('\n') {
            let line_start = offset;
            offset += line.len();
            let content = line.trim_end_matches(['\n', '\r']);

            match start {
                None => {
                    if key_line.is_match(content) {
                        start = Some(line_start);
                        end = offset;
                    }
                }
                Some(_) => {
                    if TOP_LEVEL_LINE.is_match(content) {
                        break;
                    }
                    let trimmed = content.trim_start();
                    if !trimmed.is_empty() && !trimmed.starts_with('#') {
                        end = offset;
                    }
                }
            }
        }

        Ok(start.map(|s| s..end))
    }

    /// Render `key: value` as a standalone block ending in a newline.
    fn render_block(key: &str, value: &YamlValue) -> Result<String> {
        let mut single = Mapping::new();
        single.insert(YamlValue::String(key.to_string()), value.clone());
        serde_yaml::to_string(&single).map_err(|e| Error::render("YAML", e.to_string()))
    }

    fn splice(source: &str, span: Option<Range<usize>>, block: &str) -> String {
        match span {
            Some(span) => {
                let mut out = String::with_capacity(source.len() + block.len());
                out.push_str(&source[..span.start]);
                out.push_str(block);
                out.push_str(&source[span.end..]);
                out
            }
            None => {
                let mut out = source.to_string();
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(block);
                out
            }
        }
    }

    fn position_in_sequence(items: &[YamlValue], id: &str) -> Option<usize> {
        items
            .iter()
            .position(|item| item.get("name").and_then(YamlValue::as_str) == Some(id))
    }

    /// Locate the entry inside a block-style registry spanning `block`.
    ///
    /// Returns `None` when the registry is written inline (`key: {...}`) or
    /// its lines do not have the expected shape.
    fn entry_slot(
        source: &str,
        block: Range<usize>,
        id: &str,
        shape: &EntryShape,
    ) -> Result<Option<EntrySlot>> {
        let lines = Line::split(source, block.clone());
        let Some((header, children)) = lines.split_first() else {
            return Ok(None);
        };
        let inline = header
            .text
            .split_once(':')
            .map(|(_, rest)| rest.trim())
            .unwrap_or_default();
        if !inline.is_empty() && !inline.starts_with('#') {
            return Ok(None);
        }

        let content: Vec<&Line> = children.iter().filter(|l| l.is_content()).collect();
        let Some(first) = content.first() else {
            let indent = match shape {
                EntryShape::Keyed => DEFAULT_INDENT,
                EntryShape::Listed(_) => 0,
            };
            return Ok(Some(EntrySlot {
                span: block.end..block.end,
                indent,
            }));
        };
        let indent = first.indent();
        let append = EntrySlot {
            span: block.end..block.end,
            indent,
        };

        let starts: Vec<usize> = match shape {
            EntryShape::Keyed => {
                if indent == 0 {
                    return Ok(None);
                }
                let escaped = regex::escape(id);
                let key_line = Regex::new(&format!(
                    r#"^ {{{indent}}}(?:{escaped}|"{escaped}"|'{escaped}')[ \t]*:(?:[ \t]|$)"#
                ))
                .map_err(|e| Error::parse("YAML", e.to_string()))?;
                content
                    .iter()
                    .enumerate()
                    .filter(|(_, l)| key_line.is_match(l.text))
                    .map(|(i, _)| i)
                    .collect()
            }
            EntryShape::Listed(_) => {
                if !first.is_sequence_item() {
                    return Ok(None);
                }
                content
                    .iter()
                    .enumerate()
                    .filter(|(_, l)| l.indent() == indent && l.is_sequence_item())
                    .map(|(i, _)| i)
                    .collect()
            }
        };

        let start = match shape {
            EntryShape::Keyed => match starts.as_slice() {
                [] => return Ok(Some(append)),
                [only] => *only,
                _ => return Ok(None),
            },
            EntryShape::Listed(None) => return Ok(Some(append)),
            EntryShape::Listed(Some(index)) => match starts.get(*index) {
                Some(start) => *start,
                None => return Ok(None),
            },
        };

        // The entry runs until the next line at or above its own indentation
        let mut last = start;
        for (i, line) in content.iter().enumerate().skip(start + 1) {
            if line.indent() <= indent {
                break;
            }
            last = i;
        }
        Ok(Some(EntrySlot {
            span: content[start].start..content[last].end,
            indent,
        }))
    }

    /// Render the entry as YAML lines indented by `indent` spaces.
    fn render_entry(
        id: &str,
        fields: &serde_json::Map<String, Value>,
        shape: &EntryShape,
        indent: usize,
    ) -> Result<String> {
        let text = match shape {
            EntryShape::Keyed => {
                Self::render_block(id, &to_yaml(&Value::Object(fields.clone()))?)?
            }
            EntryShape::Listed(_) => {
                let item = to_yaml(&Value::Object(named_entry(id, fields)))?;
                serde_yaml::to_string(&YamlValue::Sequence(vec![item]))
                    .map_err(|e| Error::render("YAML", e.to_string()))?
            }
        };
        let pad = " ".repeat(indent);
        Ok(text
            .lines()
            .map(|line| format!("{pad}{line}\n"))
            .collect())
    }

    fn splice_entry(source: &str, slot: &EntrySlot, rendered: &str) -> String {
        let mut out = String::with_capacity(source.len() + rendered.len() + 1);
        out.push_str(&source[..slot.span.start]);
        if slot.span.start > 0 && !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(rendered);
        out.push_str(&source[slot.span.end..]);
        out
    }
}

fn to_yaml(value: &Value) -> Result<YamlValue> {
    serde_yaml::to_value(value).map_err(|e| Error::render("YAML", e.to_string()))
}

/// Convert a YAML tree into JSON, ordering mapping keys.
fn yaml_to_json_sorted(value: &YamlValue) -> Value {
    match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)
            } else {
                Value::Null
            }
        }
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(items) => Value::Array(items.iter().map(yaml_to_json_sorted).collect()),
        YamlValue::Mapping(map) => {
            let mut entries: Vec<(String, Value)> = map
                .iter()
                .map(|(k, v)| {
                    let key = match k {
                        YamlValue::String(s) => s.clone(),
                        other => serde_yaml::to_string(other)
                            .map(|s| s.trim_end().to_string())
                            .unwrap_or_default(),
                    };
                    (key, yaml_to_json_sorted(v))
                })
                .collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().collect())
        }
        YamlValue::Tagged(tagged) => yaml_to_json_sorted(&tagged.value),
    }
}

impl RegistryHandler for YamlHandler {
    fn format(&self) -> Format {
        Format::Yaml
    }

    fn normalize(&self, source: &str) -> Result<Value> {
        Ok(yaml_to_json_sorted(&YamlValue::Mapping(Self::parse_root(
            source,
        )?)))
    }

    fn get_entry(&self, source: &str, registry: &str, id: &str) -> Result<Option<Value>> {
        let root = Self::parse_root(source)?;
        let entry = match root.get(registry) {
            Some(YamlValue::Mapping(entries)) => entries.get(id),
            Some(YamlValue::Sequence(entries)) => entries
                .iter()
                .find(|e| e.get("name").and_then(YamlValue::as_str) == Some(id)),
            _ => None,
        };
        Ok(entry.map(yaml_to_json_sorted))
    }

    fn upsert_entry(
        &self,
        source: &str,
        registry: &str,
        id: &str,
        entry: &Value,
    ) -> Result<String> {
        let fields = entry_object(Format::Yaml, entry)?;
        let mut root = Self::parse_root(source)?;
        let registry_key = YamlValue::String(registry.to_string());

        let mut section = match root.get(registry) {
            None | Some(YamlValue::Null) => YamlValue::Mapping(Mapping::new()),
            Some(existing) => existing.clone(),
        };
        let shape = match &mut section {
            YamlValue::Mapping(entries) => {
                entries.insert(
                    YamlValue::String(id.to_string()),
                    to_yaml(&Value::Object(fields.clone()))?,
                );
                EntryShape::Keyed
            }
            YamlValue::Sequence(entries) => {
                let named = to_yaml(&Value::Object(named_entry(id, fields)))?;
                let position = Self::position_in_sequence(entries, id);
                match position {
                    Some(index) => entries[index] = named,
                    None => entries.push(named),
                }
                EntryShape::Listed(position)
            }
            _ => {
                return Err(Error::structure(
                    "YAML",
                    format!("'{registry}' must be a mapping or a sequence"),
                ));
            }
        };
        root.insert(registry_key, section.clone());
        let expected = yaml_to_json_sorted(&YamlValue::Mapping(root.clone()));
        let reproduces = |text: &str| matches!(self.normalize(text), Ok(actual) if actual == expected);

        let span = Self::block_span(source, registry)?;
        if let Some(block) = span.clone() {
            if let Some(slot) = Self::entry_slot(source, block, id, &shape)? {
                let rendered = Self::render_entry(id, fields, &shape, slot.indent)?;
                let spliced = Self::splice_entry(source, &slot, &rendered);
                if reproduces(&spliced) {
                    return Ok(spliced);
                }
                tracing::debug!(registry, id, "entry splice did not reproduce the document");
            }
        }

        let block = Self::render_block(registry, &section)?;
        let spliced = Self::splice(source, span, &block);
        if reproduces(&spliced) {
            return Ok(spliced);
        }
        tracing::debug!(
            registry,
            "text splice did not reproduce the document, re-serializing"
        );
        serde_yaml::to_string(&YamlValue::Mapping(root))
            .map_err(|e| Error::render("YAML", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_block_span_stops_at_next_key() {
        let source = "a: 1\nexpansionPacks:\n  p:\n    enabled: true\n\n# about b\nb: 2\n";
        let span = YamlHandler::block_span(source, "expansionPacks")
            .unwrap()
            .unwrap();
        assert_eq!(&source[span], "expansionPacks:\n  p:\n    enabled: true\n");
    }

    #[test]
    fn test_block_span_accepts_quoted_key_and_list_items() {
        let source = "\"expansionPacks\":\n- name: p\n- name: q\nother: x\n";
        let span = YamlHandler::block_span(source, "expansionPacks")
            .unwrap()
            .unwrap();
        assert_eq!(&source[span], "\"expansionPacks\":\n- name: p\n- name: q\n");
    }

    #[test]
    fn test_block_span_ignores_nested_and_prefixed_keys() {
        let source = "outer:\n  expansionPacks: {}\nexpansionPacksOld: 1\n";
        assert!(
            YamlHandler::block_span(source, "expansionPacks")
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_yaml_normalize_key_order() {
        let handler = YamlHandler::new();
        let norm1 = handler.normalize("b: 2\na: 1\n").unwrap();
        let norm2 = handler.normalize("a: 1\nb: 2\n").unwrap();
        assert_eq!(norm1, norm2);
    }

    #[test]
    fn test_yaml_parse_error() {
        let handler = YamlHandler::new();
        assert!(handler.normalize("invalid: yaml: content: [unclosed").is_err());
    }

    #[test]
    fn test_new_entry_leaves_sibling_bytes_alone() {
        let handler = YamlHandler::new();
        let source = "# Core\nexpansionPacks:\n  other-pack:\n    # pinned by ops\n    enabled: true\n    version: \"2.0\"\n\nmarkdownExploder: true\n";
        let out = handler
            .upsert_entry(
                source,
                "expansionPacks",
                "bmad-example",
                &json!({"enabled": true, "version": "1.0.0"}),
            )
            .unwrap();

        assert!(
            out.starts_with("# Core\nexpansionPacks:\n  other-pack:\n    # pinned by ops\n    enabled: true\n    version: \"2.0\"\n  bmad-example:\n    enabled: true\n"),
            "{out}"
        );
        assert!(out.ends_with("\n\nmarkdownExploder: true\n"), "{out}");
        let doc = handler.normalize(&out).unwrap();
        assert_eq!(doc["expansionPacks"]["other-pack"]["version"], "2.0");
        assert_eq!(doc["expansionPacks"]["bmad-example"]["version"], "1.0.0");
    }

    #[test]
    fn test_existing_entry_is_replaced_between_siblings() {
        let handler = YamlHandler::new();
        let source = "expansionPacks:\n  first:\n    enabled: false # keep\n  bmad-example:\n    enabled: false\n    version: 0.1.0\n  last:\n    version: '3'\n";
        let out = handler
            .upsert_entry(
                source,
                "expansionPacks",
                "bmad-example",
                &json!({"enabled": true, "version": "1.0.0"}),
            )
            .unwrap();

        assert!(
            out.starts_with("expansionPacks:\n  first:\n    enabled: false # keep\n  bmad-example:\n    enabled: true\n"),
            "{out}"
        );
        assert!(out.ends_with("\n  last:\n    version: '3'\n"), "{out}");
        assert!(!out.contains("0.1.0"), "{out}");
    }

    #[test]
    fn test_sequence_item_is_replaced_in_place() {
        let handler = YamlHandler::new();
        let source = "expansionPacks:\n- name: a # first\n  enabled: true\n- name: bmad-example\n  version: 0.1.0\n- name: c\n  note: \"keep\"\n";
        let out = handler
            .upsert_entry(
                source,
                "expansionPacks",
                "bmad-example",
                &json!({"enabled": true, "version": "1.0.0"}),
            )
            .unwrap();

        assert!(
            out.starts_with("expansionPacks:\n- name: a # first\n  enabled: true\n- name: bmad-example\n  enabled: true\n"),
            "{out}"
        );
        assert!(out.ends_with("\n- name: c\n  note: \"keep\"\n"), "{out}");
        let doc = handler.normalize(&out).unwrap();
        assert_eq!(doc["expansionPacks"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_empty_registry_key_gets_indented_entry() {
        let handler = YamlHandler::new();
        let out = handler
            .upsert_entry("expansionPacks:\nother: 1\n", "expansionPacks", "p", &json!({"enabled": true}))
            .unwrap();
        assert_eq!(out, "expansionPacks:\n  p:\n    enabled: true\nother: 1\n");
    }

    #[test]
    fn test_flow_registry_is_rewritten() {
        let handler = YamlHandler::new();
        let source = "a: 1\nexpansionPacks: {other: {enabled: false}}\n";
        let out = handler
            .upsert_entry(source, "expansionPacks", "p", &json!({"enabled": true}))
            .unwrap();

        assert!(out.starts_with("a: 1\n"));
        let entries = handler.normalize(&out).unwrap();
        assert_eq!(entries["expansionPacks"]["other"]["enabled"], false);
        assert_eq!(entries["expansionPacks"]["p"]["enabled"], true);
    }
}
