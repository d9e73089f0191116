//! End-to-end tests that invoke the compiled `pack` binary.

use assert_cmd::Command;
use pack_test_utils::TestPack;
use predicates::prelude::*;

fn pack_cmd() -> Command {
    let mut cmd = Command::cargo_bin("pack").expect("Failed to find pack binary");
    cmd.env_remove("PACK_ROOT")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn install(pack: &TestPack) -> Command {
    let mut cmd = pack_cmd();
    cmd.arg("install")
        .arg("--pack")
        .arg(pack.pack_root())
        .arg("--target")
        .arg(pack.target_root());
    cmd
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_lists_commands() {
    pack_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("team-files"));
}

#[test]
fn test_version_flag() {
    pack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("pack"));
}

#[test]
fn test_no_command_shows_hint() {
    pack_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("pack --help"));
}

// ============================================================================
// Install
// ============================================================================

#[test]
fn test_install_reports_files_and_guide() {
    let pack = TestPack::example();
    pack.with_host_framework();
    pack.with_target_file(".bmad-core/core-config.yaml", "markdownExploder: true\n");

    install(&pack)
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed"))
        .stdout(predicate::str::contains("3 files"))
        .stdout(predicate::str::contains("registered"))
        .stdout(predicate::str::contains("*example-dev"))
        .stdout(predicate::str::contains("*Example build"));

    pack.assert_target_exists(".bmad-example/agents/example-qa.md");
    pack.assert_target_contains(".bmad-core/core-config.yaml", "expansionPacks:");
}

#[test]
fn test_install_json() {
    let pack = TestPack::example();

    let output = install(&pack).arg("--json").arg("--no-host").output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["manifest"]["expansion_pack_id"], "bmad-example");
    assert_eq!(report["manifest"]["files"].as_array().unwrap().len(), 3);
    assert_eq!(report["merge"]["status"], "skipped");
    assert_eq!(report["reinstalled"], false);
}

#[test]
fn test_install_dry_run_shows_plan_only() {
    let pack = TestPack::example();

    install(&pack)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains(".bmad-example/tasks/create-module.md"));

    pack.assert_target_not_exists(".bmad-example");
}

#[test]
fn test_install_invalid_pack_fails() {
    let pack = TestPack::example();
    pack.remove_pack_path("CLAUDE.md");

    install(&pack)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Missing required file: CLAUDE.md"));
}

// ============================================================================
// Validate and Status
// ============================================================================

#[test]
fn test_validate_pack_json() {
    let pack = TestPack::example();

    let output = pack_cmd()
        .args(["validate", "--json", "--pack"])
        .arg(pack.pack_root())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], true);
    assert_eq!(report["warnings"][0], "No templates defined in config.yaml");
}

#[test]
fn test_validate_exit_code_reflects_errors() {
    let pack = TestPack::example();
    pack.remove_pack_path("teams");

    pack_cmd()
        .args(["validate", "--pack"])
        .arg(pack.pack_root())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Missing required directory: teams"));
}

#[test]
fn test_status_flags_modified_file() {
    let pack = TestPack::example();
    install(&pack).arg("--no-host").assert().success();
    pack.with_target_file(".bmad-example/agents/example-dev.md", "# edited\n");

    let mut status = pack_cmd();
    status
        .arg("status")
        .arg("--pack")
        .arg(pack.pack_root())
        .arg("--target")
        .arg(pack.target_root())
        .assert()
        .success()
        .stdout(predicate::str::contains(".bmad-example/agents/example-dev.md"))
        .stdout(predicate::str::contains("1 modified, 0 missing, 2 unchanged"));
}

#[test]
fn test_status_json_marks_modified_records() {
    let pack = TestPack::example();
    install(&pack).arg("--no-host").assert().success();
    pack.with_target_file(".bmad-example/agents/example-dev.md", "# edited\n");

    let output = pack_cmd()
        .args(["status", "--json", "--target"])
        .arg(pack.target_root())
        .output()
        .unwrap();
    assert!(output.status.success());

    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["drift"]["modified"][0], ".bmad-example/agents/example-dev.md");
    let files = status["manifest"]["files"].as_array().unwrap();
    assert_eq!(files[0]["path"], ".bmad-example/agents/example-dev.md");
    assert_eq!(files[0]["modified"], true);
    assert_eq!(files[1]["modified"], false);
}

#[test]
fn test_install_dir_dot_is_rejected() {
    let pack = TestPack::example();
    let user_file = pack.with_target_file("src/main.rs", "fn main() {}\n");

    install(&pack)
        .args(["--install-dir", "."])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid installation directory '.'"));

    assert!(user_file.is_file());
}

#[test]
fn test_status_not_installed() {
    let pack = TestPack::example();

    pack_cmd()
        .arg("status")
        .arg("--pack")
        .arg(pack.pack_root())
        .arg("--target")
        .arg(pack.target_root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Not installed"));
}

// ============================================================================
// Team files, agents, completions
// ============================================================================

#[test]
fn test_team_files_list_and_copy() {
    let pack = TestPack::example();

    pack_cmd()
        .arg("team-files")
        .arg("--pack")
        .arg(pack.pack_root())
        .assert()
        .success()
        .stdout(predicate::str::contains("example-team.txt"));

    pack_cmd()
        .arg("team-files")
        .arg("--pack")
        .arg(pack.pack_root())
        .args(["--copy", "example-team.txt", "--to"])
        .arg(pack.target_root())
        .assert()
        .success();
    pack.assert_target_contains("example-team.txt", "bundle: example");
}

#[test]
fn test_agents_json() {
    let pack = TestPack::example();

    let output = pack_cmd()
        .args(["agents", "--json", "--pack"])
        .arg(pack.pack_root())
        .output()
        .unwrap();
    assert!(output.status.success());

    let agents: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(agents["agents"][1]["invocation"], "*example-qa");
    assert_eq!(agents["commands"][0], "*Example build");
}

#[test]
fn test_completions_bash() {
    pack_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pack"));
}
