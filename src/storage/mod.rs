//! Artifact persistence.
//!
//! Writes go to a sibling `<name>.tmp` file that is fsynced and renamed over the target, so a
//! reader never observes a partially written `tokenizer.json`.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::{StorageError, StorageResult};

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

const TEMP_SUFFIX: &str = "tmp";

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}

/// Atomically replaces `path` with `bytes`.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| StorageError::NoParent {
            path: path.to_path_buf(),
        })?;
    if !parent.is_dir() {
        return Err(StorageError::NoParent {
            path: path.to_path_buf(),
        });
    }

    let temp = temp_path(path);
    let result = write_and_rename(&temp, path, bytes);
    if result.is_err()
        && let Err(e) = fs::remove_file(&temp)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!(path = %temp.display(), error = %e, "Failed to remove temporary artifact");
    }
    result?;

    debug!(path = %path.display(), bytes = bytes.len(), "Artifact written");
    Ok(())
}

fn write_and_rename(temp: &Path, path: &Path, bytes: &[u8]) -> StorageResult<()> {
    let io_err = |source| StorageError::Io {
        path: temp.to_path_buf(),
        source,
    };

    {
        let mut file = File::create(temp).map_err(io_err)?;
        file.write_all(bytes).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
    }

    fs::rename(temp, path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}
