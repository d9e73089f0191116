//! [`TestPack`] builder for installer test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Descriptor of the reference pack built by [`TestPack::example`].
pub const EXAMPLE_DESCRIPTOR: &str = "\
name: bmad-example
version: 1.0.0
short-title: Example Pack
description: Pack used by installer tests
author: Test Author
slashPrefix: Example
agents:
  - example-dev
  - example-qa
tasks:
  - create-module
commands:
  - build
";

/// A temporary sandbox with a pack source tree (`pack/`) and a target
/// project (`target/`) side by side.
///
/// # Example
///
/// ```rust,no_run
/// use pack_test_utils::TestPack;
///
/// let pack = TestPack::example();
/// pack.with_host_framework();
/// pack.assert_pack_file_exists("config.yaml");
/// ```
pub struct TestPack {
    temp_dir: TempDir,
}

impl Default for TestPack {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPack {
    /// Create an empty pack directory and an empty target directory.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("pack")).unwrap();
        fs::create_dir_all(temp_dir.path().join("target")).unwrap();
        Self { temp_dir }
    }

    /// A complete pack: descriptor, docs, two agents, one task, one team and
    /// no templates or checklists.
    pub fn example() -> Self {
        let pack = Self::new();
        pack.with_descriptor(EXAMPLE_DESCRIPTOR)
            .with_docs()
            .with_file("agents/example-dev.md", "# Example developer\n")
            .with_file("agents/example-qa.md", "# Example QA\n")
            .with_file("tasks/create-module.md", "# Create module\n")
            .with_team("example-team.txt", "bundle: example\n");
        pack
    }

    pub fn sandbox(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn pack_root(&self) -> PathBuf {
        self.sandbox().join("pack")
    }

    pub fn target_root(&self) -> PathBuf {
        self.sandbox().join("target")
    }

    /// Write `config.yaml` in the pack root.
    pub fn with_descriptor(&self, yaml: &str) -> &Self {
        self.with_file("config.yaml", yaml)
    }

    /// Write `README.md` and `CLAUDE.md`.
    pub fn with_docs(&self) -> &Self {
        self.with_file("README.md", "# Pack\n")
            .with_file("CLAUDE.md", "# Agent guide\n")
    }

    /// Write a file relative to the pack root, creating parent directories.
    pub fn with_file(&self, path: &str, content: &str) -> &Self {
        write(&self.pack_root().join(path), content);
        self
    }

    pub fn with_team(&self, name: &str, content: &str) -> &Self {
        self.with_file(&format!("teams/{name}"), content)
    }

    /// Create `.bmad-core/` in the target.
    pub fn with_host_framework(&self) -> &Self {
        fs::create_dir_all(self.target_root().join(".bmad-core")).unwrap();
        self
    }

    /// Write a file relative to the target root and return its path.
    pub fn with_target_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.target_root().join(path);
        write(&full_path, content);
        full_path
    }

    /// Remove a file or directory relative to the pack root.
    pub fn remove_pack_path(&self, path: &str) {
        let full_path = self.pack_root().join(path);
        if full_path.is_dir() {
            fs::remove_dir_all(&full_path).unwrap();
        } else {
            fs::remove_file(&full_path).unwrap();
        }
    }

    /// Read a file relative to the target root.
    pub fn read_target(&self, path: &str) -> String {
        let full_path = self.target_root().join(path);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Assert that `path` (relative to the pack root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_pack_file_exists(&self, path: &str) {
        let full_path = self.pack_root().join(path);
        assert!(
            full_path.exists(),
            "Expected pack file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the target root) exists.
    pub fn assert_target_exists(&self, path: &str) {
        let full_path = self.target_root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the target root) does **not** exist.
    pub fn assert_target_not_exists(&self, path: &str) {
        let full_path = self.target_root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the target file at `path` contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_target_contains(&self, path: &str, content: &str) {
        let file_content = self.read_target(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
