//! FileSyncPlanner: decides and performs the copy set of an installation
//!
//! Planning walks the category table and lists the matching files of each
//! category's source directory. Executing the plan replaces the installation
//! root wholesale and copies the files one by one, aborting on the first
//! failure.

use pack_fs::{InstallLayout, NormalizedPath, io};
use pack_meta::CategorySpec;
use serde::Serialize;

use crate::context::InstallationContext;
use crate::error::{Error, Result};

/// One file to copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCopy {
    pub category: String,
    pub source: NormalizedPath,
    pub destination: NormalizedPath,
}

/// Everything an installation will write
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub layout: InstallLayout,
    /// The pack descriptor, copied into the installation root
    pub descriptor: NormalizedPath,
    /// Category directories created in the installation root
    pub category_dirs: Vec<NormalizedPath>,
    /// File copies in execution order
    pub copies: Vec<PlannedCopy>,
    /// Installed categories whose source directory is absent
    pub skipped_categories: Vec<String>,
}

impl SyncPlan {
    /// Number of planned copies for a category
    pub fn count_for(&self, category: &str) -> usize {
        self.copies.iter().filter(|c| c.category == category).count()
    }
}

/// A file written by [`FileSyncPlanner::execute`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledFile {
    pub category: String,
    /// Path relative to the target root, forward slashes
    pub relative_path: String,
    #[serde(skip)]
    pub absolute: NormalizedPath,
}

/// Result of executing a plan
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub files: Vec<InstalledFile>,
    /// A previous installation directory was removed first
    pub replaced_existing: bool,
}

/// Plans and performs the file copies of an installation
#[derive(Debug, Clone)]
pub struct FileSyncPlanner {
    categories: Vec<CategorySpec>,
}

impl FileSyncPlanner {
    pub fn new(categories: Vec<CategorySpec>) -> Self {
        Self { categories }
    }

    /// Build the copy plan for `layout`.
    ///
    /// Only categories marked `installed` take part. Source files are listed
    /// non-recursively in file name order; a missing source directory skips
    /// its category.
    pub fn plan(&self, ctx: &InstallationContext, layout: &InstallLayout) -> Result<SyncPlan> {
        let mut plan = SyncPlan {
            layout: layout.clone(),
            descriptor: ctx.descriptor_path(),
            category_dirs: Vec::new(),
            copies: Vec::new(),
            skipped_categories: Vec::new(),
        };

        for category in self.categories.iter().filter(|c| c.installed) {
            let dest_dir = layout.category_dir(&category.dest_dir);
            plan.category_dirs.push(dest_dir.clone());

            let source_dir = ctx.pack_root.join(&category.source_dir);
            let Some(files) = io::list_files(&source_dir)? else {
                tracing::debug!(category = %category.name, dir = %source_dir, "source directory missing, skipping");
                plan.skipped_categories.push(category.name.clone());
                continue;
            };

            for source in files {
                let Some(file_name) = source.file_name() else {
                    continue;
                };
                if !category.matches(file_name) {
                    continue;
                }
                let destination = dest_dir.join(file_name);
                tracing::debug!(category = %category.name, from = %source, to = %destination, "planned copy");
                plan.copies.push(PlannedCopy {
                    category: category.name.clone(),
                    source,
                    destination,
                });
            }
        }

        Ok(plan)
    }

    /// Carry out a plan.
    ///
    /// The installation root is removed and recreated, every category
    /// directory is created, then files are copied in plan order. The first
    /// failing copy aborts with [`Error::CopyFailed`].
    pub fn execute(&self, plan: &SyncPlan) -> Result<SyncOutcome> {
        let root = plan.layout.root();
        if !plan.layout.is_contained() {
            return Err(Error::UnsafeInstallRoot {
                path: root.to_native(),
                target: plan.layout.target_root().to_native(),
            });
        }
        let replaced_existing = io::remove_dir_if_exists(&root)?;
        if replaced_existing {
            tracing::info!(root = %root, "removed previous installation");
        }
        io::ensure_dir(&root)?;
        for dir in &plan.category_dirs {
            io::ensure_dir(dir)?;
        }

        let mut files = Vec::with_capacity(plan.copies.len());
        for copy in &plan.copies {
            copy_one(&copy.source, &copy.destination)?;
            let relative_path = plan
                .layout
                .record_path(&copy.destination)
                .unwrap_or_else(|| copy.destination.as_str().to_string());
            files.push(InstalledFile {
                category: copy.category.clone(),
                relative_path,
                absolute: copy.destination.clone(),
            });
        }

        copy_one(&plan.descriptor, &plan.layout.descriptor_path())?;

        tracing::info!(root = %root, files = files.len(), "copied pack content");
        Ok(SyncOutcome {
            files,
            replaced_existing,
        })
    }
}

fn copy_one(from: &NormalizedPath, to: &NormalizedPath) -> Result<()> {
    io::copy_file(from, to).map_err(|cause| Error::CopyFailed {
        from: from.to_native(),
        to: to.to_native(),
        cause,
    })?;
    tracing::debug!(from = %from, to = %to, "copied");
    Ok(())
}
