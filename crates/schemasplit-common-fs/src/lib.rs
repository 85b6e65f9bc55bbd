//! File system utilities for schemasplit.
//!
//! The engine never touches `std::fs` directly; it goes through the
//! [`TreeSource`] and [`TreeSink`] traits in [`tree`], which have a disk
//! implementation rooted at a directory and an in-memory one for tests.

pub mod path;
pub mod tree;

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use schemasplit_common_core::{Error, Result, ResultExt};

pub use tree::{DiskTree, MemoryTree, TreeSink, TreeSource};

/// Largest file the tree layer will read.
pub const MAX_FILE_SIZE: usize = 64 * 1024 * 1024;

/// Read a file to string with size limit.
pub fn read_to_string(path: impl AsRef<Path>, max_size: usize) -> Result<String> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::FileSystem {
            message: format!("file not found: {display}"),
            path: Some(display.clone()),
            source: Some(Box::new(e)),
        },
        io::ErrorKind::PermissionDenied => Error::FileSystem {
            message: format!("permission denied: {display}"),
            path: Some(display.clone()),
            source: Some(Box::new(e)),
        },
        _ => Error::FileSystem {
            message: format!("failed to read metadata: {display}"),
            path: Some(display.clone()),
            source: Some(Box::new(e)),
        },
    })?;

    if metadata.len() as usize > max_size {
        return Err(Error::file_system(
            format!("file too large: {} bytes (max: {max_size})", metadata.len()),
            display,
        ));
    }

    fs::read_to_string(path).fs_context(format!("failed to read file: {display}"), display.clone())
}

/// Write to a file atomically (write to temp, then rename).
pub fn write_atomic(path: impl AsRef<Path>, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or(Path::new("."));

    ensure_dir(parent)?;

    let mut temp_path = path.to_path_buf();
    match path.file_name() {
        Some(name) => temp_path.set_file_name(format!(".{}.tmp", name.to_string_lossy())),
        None => temp_path.push(".tmp"),
    }
    let temp_display = temp_path.display().to_string();

    {
        let mut file = File::create(&temp_path).with_fs_context(|| {
            (format!("failed to create temporary file: {temp_display}"), temp_display.clone())
        })?;
        file.write_all(contents).with_fs_context(|| {
            (format!("failed to write to temporary file: {temp_display}"), temp_display.clone())
        })?;
        file.sync_all().with_fs_context(|| {
            (format!("failed to sync temporary file: {temp_display}"), temp_display.clone())
        })?;
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        Error::FileSystem {
            message: format!("failed to rename temporary file to target: {}", path.display()),
            path: Some(path.display().to_string()),
            source: Some(Box::new(e)),
        }
    })
}

/// Write string to file atomically.
pub fn write_string_atomic(path: impl AsRef<Path>, contents: &str) -> Result<()> {
    write_atomic(path, contents.as_bytes())
}

/// Ensure a directory exists.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path).with_fs_context(|| {
            (
                format!("failed to create directory: {}", path.display()),
                path.display().to_string(),
            )
        })?;
    }
    Ok(())
}

/// Remove a file if it exists. Returns whether a file was removed.
pub fn remove_file_if_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if path.exists() {
        fs::remove_file(path).with_fs_context(|| {
            (
                format!("failed to remove file: {}", path.display()),
                path.display().to_string(),
            )
        })?;
        Ok(true)
    } else {
        Ok(false)
    }
}
