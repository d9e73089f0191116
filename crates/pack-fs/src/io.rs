//! File operations used by the installer
//!
//! Writes go through a temp-file-then-rename so a reader never observes a
//! half-written manifest or host document. Directory creation either builds
//! the whole chain or reports the first failing component.

use std::fs::{self, OpenOptions};
use std::io::Write;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file.
///
/// Uses write-to-temp-then-rename strategy to prevent partial writes. The
/// parent directory is created if needed.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    // Same directory keeps the rename on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    let written = temp_file
        .write_all(content)
        .and_then(|()| temp_file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&temp_path, e));
    }
    drop(temp_file);

    if let Err(e) = fs::rename(&temp_path, &native_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(Error::io(&native_path, e));
    }

    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write text content to a file atomically.
pub fn write_text(path: &NormalizedPath, content: &str) -> Result<()> {
    write_atomic(path, content.as_bytes())
}

/// Create a directory and all missing parents.
///
/// On failure, directories created by this call are removed again so no
/// partial chain is left behind.
pub fn ensure_dir(path: &NormalizedPath) -> Result<()> {
    let native = path.to_native();
    if native.is_dir() {
        return Ok(());
    }

    // Find the deepest existing ancestor so a failure can be rolled back
    let mut missing = Vec::new();
    let mut cursor = Some(native.as_path());
    while let Some(dir) = cursor {
        if dir.as_os_str().is_empty() || dir.exists() {
            break;
        }
        missing.push(dir.to_path_buf());
        cursor = dir.parent();
    }

    for dir in missing.iter().rev() {
        if let Err(e) = fs::create_dir(dir) {
            if e.kind() == std::io::ErrorKind::AlreadyExists && dir.is_dir() {
                continue;
            }
            for created in missing.iter() {
                let _ = fs::remove_dir(created);
            }
            return Err(Error::io(dir, e));
        }
    }

    tracing::trace!(path = %path, "created directory chain");
    Ok(())
}

/// Remove a directory tree if it exists.
///
/// Returns `true` when something was removed. Refuses to remove filesystem
/// roots or an empty path.
pub fn remove_dir_if_exists(path: &NormalizedPath) -> Result<bool> {
    let native = path.to_native();
    if native.as_os_str().is_empty() || native.parent().is_none() {
        return Err(Error::UnsafeRemoval {
            path: native,
            reason: "path has no parent directory".to_string(),
        });
    }
    if !native.exists() {
        return Ok(false);
    }
    if !native.is_dir() {
        return Err(Error::UnsafeRemoval {
            path: native,
            reason: "not a directory".to_string(),
        });
    }
    fs::remove_dir_all(&native).map_err(|e| Error::io(&native, e))?;
    Ok(true)
}

/// Copy a single file, returning the number of bytes written.
pub fn copy_file(source: &NormalizedPath, destination: &NormalizedPath) -> Result<u64> {
    let src = source.to_native();
    let dest = destination.to_native();
    fs::copy(&src, &dest).map_err(|e| {
        // Report whichever side is actually at fault
        if src.is_file() {
            Error::io(&dest, e)
        } else {
            Error::io(&src, e)
        }
    })
}

/// List the regular files directly inside `dir`, sorted by file name.
///
/// Returns `Ok(None)` if `dir` does not exist or is not a directory.
pub fn list_files(dir: &NormalizedPath) -> Result<Option<Vec<NormalizedPath>>> {
    let native = dir.to_native();
    if !native.is_dir() {
        return Ok(None);
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(&native).map_err(|e| Error::io(&native, e))? {
        let entry = entry.map_err(|e| Error::io(&native, e))?;
        let path = entry.path();
        // Follows symlinks, matching what a copy would read
        if path.is_file() {
            files.push(NormalizedPath::new(path));
        }
    }
    files.sort();
    Ok(Some(files))
}

/// List the directories directly inside `dir`, sorted by name.
///
/// Returns an empty list if `dir` does not exist.
pub fn list_dirs(dir: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let native = dir.to_native();
    if !native.is_dir() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(&native).map_err(|e| Error::io(&native, e))? {
        let entry = entry.map_err(|e| Error::io(&native, e))?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(NormalizedPath::new(path));
        }
    }
    dirs.sort();
    Ok(dirs)
}
