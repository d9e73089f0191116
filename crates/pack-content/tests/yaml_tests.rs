//! Tests for YAML registry editing

use pack_content::{Format, RegistryHandler, YamlHandler};
use pretty_assertions::assert_eq;
use serde_json::json;

const HOST: &str = r#"# Core configuration
markdownExploder: true
prd:
  prdFile: docs/prd.md   # keep me

expansionPacks:
  bmad-2d-phaser:
    enabled: true
    version: 1.0.0

devLoadAlwaysFiles:
  - docs/coding-standards.md
"#;

fn entry(version: &str) -> serde_json::Value {
    json!({
        "enabled": true,
        "version": version,
        "slashPrefix": "OdooMethod",
        "agents": ["odoo-analyst", "odoo-architect"],
        "domain": "odoo",
        "path": ".bmad-odoo-dev",
    })
}

#[test]
fn test_insert_keeps_unrelated_text_byte_for_byte() {
    let handler = YamlHandler::new();
    let out = handler
        .upsert_entry(HOST, "expansionPacks", "bmad-odoo-dev", &entry("1.2.0"))
        .unwrap();

    let (head, _) = HOST.split_once("expansionPacks:").unwrap();
    let (_, tail) = HOST.split_once("\ndevLoadAlwaysFiles:").unwrap();
    assert!(out.starts_with(head), "prefix changed:\n{out}");
    assert!(out.ends_with(&format!("\ndevLoadAlwaysFiles:{tail}")), "suffix changed:\n{out}");
    assert!(out.contains("# keep me"));
}

#[test]
fn test_insert_keeps_other_entries() {
    let handler = YamlHandler::new();
    let out = handler
        .upsert_entry(HOST, "expansionPacks", "bmad-odoo-dev", &entry("1.2.0"))
        .unwrap();

    let tree = handler.normalize(&out).unwrap();
    assert_eq!(tree["expansionPacks"]["bmad-2d-phaser"]["version"], "1.0.0");
    assert_eq!(tree["expansionPacks"]["bmad-odoo-dev"]["domain"], "odoo");
    assert_eq!(tree["prd"]["prdFile"], "docs/prd.md");
}

#[test]
fn test_upsert_is_idempotent() {
    let handler = YamlHandler::new();
    let once = handler
        .upsert_entry(HOST, "expansionPacks", "bmad-odoo-dev", &entry("1.2.0"))
        .unwrap();
    let twice = handler
        .upsert_entry(&once, "expansionPacks", "bmad-odoo-dev", &entry("1.2.0"))
        .unwrap();

    assert_eq!(once, twice);
    assert_eq!(twice.matches("bmad-odoo-dev:").count(), 1);
}

#[test]
fn test_update_replaces_entry_in_place() {
    let handler = YamlHandler::new();
    let first = handler
        .upsert_entry(HOST, "expansionPacks", "bmad-odoo-dev", &entry("1.2.0"))
        .unwrap();
    let second = handler
        .upsert_entry(&first, "expansionPacks", "bmad-odoo-dev", &entry("1.3.0"))
        .unwrap();

    let stored = handler
        .get_entry(&second, "expansionPacks", "bmad-odoo-dev")
        .unwrap()
        .unwrap();
    assert_eq!(stored["version"], "1.3.0");
    assert_eq!(second.matches("bmad-odoo-dev:").count(), 1);
}

#[test]
fn test_missing_registry_is_appended() {
    let handler = YamlHandler::new();
    let source = "markdownExploder: true";
    let out = handler
        .upsert_entry(source, "expansionPacks", "p", &json!({"enabled": true}))
        .unwrap();

    assert!(out.starts_with("markdownExploder: true\nexpansionPacks:\n"));
    assert_eq!(
        handler.get_entry(&out, "expansionPacks", "p").unwrap(),
        Some(json!({"enabled": true}))
    );
}

#[test]
fn test_empty_document() {
    let handler = YamlHandler::new();
    let out = handler
        .upsert_entry("", "expansionPacks", "p", &json!({"enabled": true}))
        .unwrap();
    assert!(out.starts_with("expansionPacks:"));
}

#[test]
fn test_null_registry_is_filled() {
    let handler = YamlHandler::new();
    let source = "expansionPacks:\nother: 1\n";
    let out = handler
        .upsert_entry(source, "expansionPacks", "p", &json!({"enabled": true}))
        .unwrap();

    assert!(out.ends_with("other: 1\n"));
    let tree = handler.normalize(&out).unwrap();
    assert_eq!(tree["expansionPacks"]["p"]["enabled"], true);
    assert_eq!(tree["other"], 1);
}

#[test]
fn test_sequence_registry_upserts_by_name() {
    let handler = YamlHandler::new();
    let source = "expansionPacks:\n  - name: a\n    enabled: true\n  - name: p\n    version: 0.9.0\n";
    let out = handler
        .upsert_entry(source, "expansionPacks", "p", &json!({"version": "1.0.0"}))
        .unwrap();

    let tree = handler.normalize(&out).unwrap();
    let entries = tree["expansionPacks"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["name"], "a");
    assert_eq!(entries[1], json!({"name": "p", "version": "1.0.0"}));
}

#[test]
fn test_get_entry_absent() {
    let handler = YamlHandler::new();
    assert_eq!(
        handler.get_entry(HOST, "expansionPacks", "nope").unwrap(),
        None
    );
    assert_eq!(
        handler.get_entry("a: 1\n", "expansionPacks", "nope").unwrap(),
        None
    );
}

#[test]
fn test_scalar_root_rejected() {
    let handler = Format::Yaml.handler();
    assert!(
        handler
            .upsert_entry("just a string\n", "expansionPacks", "p", &json!({}))
            .is_err()
    );
}
