//! Tests for TOML registry editing

use pack_content::{RegistryHandler, TomlHandler};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_toml_update_keeps_surrounding_content() {
    let handler = TomlHandler::new();
    let source = r#"[core]
version = "4.1.0" # framework version

# Installed packs
[expansionPacks.p]
enabled = true
version = "1.0.0"

[tools]
editor = "vim"
"#;

    let out = handler
        .upsert_entry(
            source,
            "expansionPacks",
            "p",
            &json!({"enabled": true, "version": "1.1.0"}),
        )
        .unwrap();

    assert!(out.contains("version = \"4.1.0\" # framework version"));
    assert!(out.contains("# Installed packs\n[expansionPacks.p]"));
    assert!(out.contains("version = \"1.1.0\""));
    assert!(out.contains("[tools]\neditor = \"vim\""));
    assert_eq!(out.matches("[expansionPacks.p]").count(), 1);
}

#[test]
fn test_toml_upsert_is_idempotent() {
    let handler = TomlHandler::new();
    let entry = json!({"enabled": true, "agents": ["a"]});
    let once = handler
        .upsert_entry("", "expansionPacks", "p", &entry)
        .unwrap();
    let twice = handler
        .upsert_entry(&once, "expansionPacks", "p", &entry)
        .unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_toml_array_of_tables_registry() {
    let handler = TomlHandler::new();
    let source = "[[expansionPacks]]\nname = \"a\"\n\n[[expansionPacks]]\nname = \"p\"\nversion = \"0.1.0\"\n";

    let out = handler
        .upsert_entry(source, "expansionPacks", "p", &json!({"version": "0.2.0"}))
        .unwrap();

    let tree = handler.normalize(&out).unwrap();
    assert_eq!(
        tree["expansionPacks"],
        json!([{"name": "a"}, {"name": "p", "version": "0.2.0"}])
    );
}

#[test]
fn test_toml_get_entry() {
    let handler = TomlHandler::new();
    let source = "[expansionPacks.p]\nenabled = false\n";
    assert_eq!(
        handler.get_entry(source, "expansionPacks", "p").unwrap(),
        Some(json!({"enabled": false}))
    );
    assert_eq!(handler.get_entry(source, "expansionPacks", "q").unwrap(), None);
}

#[test]
fn test_toml_parse_error() {
    let handler = TomlHandler::new();
    assert!(handler.normalize("not = valid = toml").is_err());
}
