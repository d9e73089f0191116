//! Installation lifecycle scenarios
//!
//! Each test drives the public API of the workspace crates the way the CLI
//! does: validate, install, edit, check, reinstall.

use pack_core::{
    InstallOptions, InstallationContext, InstallationValidator, Installer, ManifestBuilder,
    MergeOutcome,
};
use pack_fs::{NormalizedPath, fingerprint_file};
use pack_meta::{CategorySpec, default_categories};
use pack_test_utils::TestPack;
use pretty_assertions::assert_eq;
use serde_json::Value;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn context(pack: &TestPack) -> InstallationContext {
    let target = NormalizedPath::new(pack.target_root());
    InstallationContext::new(NormalizedPath::new(pack.pack_root()), target.clone())
        .with_host_config(InstallationContext::discover_host_config(&target))
}

fn install(ctx: &InstallationContext) -> pack_core::InstallReport {
    Installer::new(ctx)
        .install(&InstallOptions::default())
        .unwrap()
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn drift_round_trip_and_repair() {
    let pack = TestPack::example();
    pack.with_host_framework();
    pack.with_target_file(".bmad-core/core-config.yaml", "markdownExploder: true\n");
    let ctx = context(&pack);
    let categories = default_categories();
    let validator = InstallationValidator::new(&ctx, &categories);

    assert!(validator.validate_pack().unwrap().valid);
    install(&ctx);
    let report = validator.validate_installation().unwrap();
    assert!(report.valid && report.modified.is_empty());

    pack.with_target_file(".bmad-example/agents/example-dev.md", "# my local notes\n");
    let report = validator.validate_installation().unwrap();
    assert!(report.valid);
    assert_eq!(report.modified, vec![".bmad-example/agents/example-dev.md"]);

    let reinstall = install(&ctx);
    assert!(reinstall.reinstalled);
    let report = validator.validate_installation().unwrap();
    assert!(report.modified.is_empty());
    pack.assert_target_contains(".bmad-example/agents/example-dev.md", "# Example developer");
}

#[test]
fn recorded_hashes_match_pack_sources() {
    let pack = TestPack::example();
    let ctx = context(&pack);
    let report = install(&ctx);

    for record in &report.manifest.files {
        let relative = record
            .path
            .strip_prefix(".bmad-example/")
            .unwrap();
        let source = pack.pack_root().join(relative);
        assert_eq!(fingerprint_file(&source).unwrap(), record.hash, "{}", record.path);
        assert!(!record.modified);
    }
}

#[test]
fn idempotent_reinstall_differs_only_in_timestamp() {
    let pack = TestPack::example();
    let ctx = context(&pack);

    let first = install(&ctx);
    let mut second = install(&ctx);

    assert!(second.manifest.installed_at >= first.manifest.installed_at);
    second.manifest.installed_at = first.manifest.installed_at;
    assert_eq!(first.manifest, second.manifest);
}

// =============================================================================
// Host configuration
// =============================================================================

#[test]
fn host_entry_is_never_duplicated() {
    let pack = TestPack::example();
    pack.with_host_framework();
    pack.with_target_file(
        "bmad-config.json",
        "{\n  \"theme\": \"dark\",\n  \"plugins\": [\"a\", \"b\"]\n}\n",
    );
    let ctx = context(&pack);

    for _ in 0..3 {
        install(&ctx);
    }

    let doc: Value = serde_json::from_str(&pack.read_target("bmad-config.json")).unwrap();
    let packs = doc["expansionPacks"].as_object().unwrap();
    assert_eq!(packs.len(), 1);
    assert_eq!(doc["theme"], "dark");
    assert_eq!(doc["plugins"], serde_json::json!(["a", "b"]));
}

#[test]
fn yaml_sequence_registry_is_upserted_by_name() {
    let pack = TestPack::example();
    pack.with_host_framework();
    pack.with_target_file(
        ".bmad-core/core-config.yaml",
        "# Core\nexpansionPacks:\n  - name: other\n    enabled: true\n  - name: bmad-example\n    version: 0.5.0\n",
    );
    let ctx = context(&pack);

    // First install of this directory: an existing entry is left alone
    assert_eq!(install(&ctx).merge, MergeOutcome::Unchanged);
    // Reinstall with a newer version replaces it in place
    assert_eq!(
        install(&ctx).merge,
        MergeOutcome::Updated {
            from: "0.5.0".into(),
            to: "1.0.0".into()
        }
    );

    let text = pack.read_target(".bmad-core/core-config.yaml");
    assert!(text.starts_with("# Core\n"));
    let doc: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
    let entries = doc["expansionPacks"].as_sequence().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1]["name"].as_str(), Some("bmad-example"));
    assert_eq!(entries[1]["version"].as_str(), Some("1.0.0"));
}

#[test]
fn sibling_pack_registration_survives_install_and_upgrade() {
    let pack = TestPack::example();
    pack.with_host_framework();
    let sibling = "  other-pack:\n    # pinned by ops\n    enabled: true\n    version: \"2.0\"\n";
    pack.with_target_file(
        ".bmad-core/core-config.yaml",
        &format!("# Core\nexpansionPacks:\n{sibling}  bmad-example:\n    version: 0.5.0\n"),
    );
    let ctx = context(&pack);

    install(&ctx);
    assert_eq!(
        install(&ctx).merge,
        MergeOutcome::Updated {
            from: "0.5.0".into(),
            to: "1.0.0".into()
        }
    );

    let text = pack.read_target(".bmad-core/core-config.yaml");
    assert!(
        text.starts_with(&format!("# Core\nexpansionPacks:\n{sibling}  bmad-example:\n")),
        "{text}"
    );
    assert!(!text.contains("0.5.0"), "{text}");
}

#[test]
fn installation_is_checked_without_pack_source() {
    let pack = TestPack::example();
    install(&context(&pack));
    pack.with_target_file(".bmad-example/tasks/create-module.md", "# edited\n");

    let target = NormalizedPath::new(pack.target_root());
    let detached = InstallationContext::new(NormalizedPath::new(pack.sandbox().join("moved")), target);
    let layout = detached.resolve_layout().unwrap();
    let manifest = ManifestBuilder::load(&layout).unwrap();
    let drift = ManifestBuilder::check_drift(&manifest, &layout).unwrap();
    let marked = manifest.with_drift(&drift);

    assert_eq!(layout.dir_name(), ".bmad-example");
    assert_eq!(drift.modified, vec![".bmad-example/tasks/create-module.md"]);
    let flagged: Vec<_> = marked
        .files
        .iter()
        .filter(|f| f.modified)
        .map(|f| f.path.as_str())
        .collect();
    assert_eq!(flagged, drift.modified);
}

// =============================================================================
// Category table
// =============================================================================

#[test]
fn optional_category_is_installed_when_present() {
    let pack = TestPack::example();
    pack.with_file("checklists/release.md", "- [ ] ship\n")
        .with_file("checklists/ignored.txt", "not markdown");
    let ctx = context(&pack);

    let report = install(&ctx);

    let checklists: Vec<_> = report
        .manifest
        .files
        .iter()
        .filter(|f| f.path.contains("/checklists/"))
        .map(|f| f.path.as_str())
        .collect();
    assert_eq!(checklists, vec![".bmad-example/checklists/release.md"]);
    assert!(!report.skipped_categories.contains(&"checklists".to_string()));
}

#[test]
fn custom_category_table_drives_planning() {
    let pack = TestPack::example();
    pack.with_file("workflows/greenfield.yaml", "steps: []\n");
    let ctx = context(&pack);

    let mut categories = default_categories();
    categories.push(CategorySpec::new("workflows", &["yaml"]).optional());
    let options = InstallOptions {
        categories,
        ..InstallOptions::default()
    };
    let report = Installer::new(&ctx).install(&options).unwrap();

    assert!(
        report
            .manifest
            .files
            .iter()
            .any(|f| f.path == ".bmad-example/workflows/greenfield.yaml")
    );
    let loaded = ManifestBuilder::load(&ctx.resolve_layout().unwrap()).unwrap();
    assert_eq!(loaded.files.len(), 4);
}
