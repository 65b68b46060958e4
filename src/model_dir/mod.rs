//! Model directory inspection.
//!
//! [`ModelDir`] is the only place that touches the directory layout; strategies ask it for
//! file paths and parsed JSON rather than joining paths themselves.

pub mod error;


pub use error::{ModelDirError, ModelDirResult};

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::constants::{KNOWN_TOKENIZER_FILES, TOKENIZER_JSON};

/// A validated model directory and the name of the artifact to produce in it.
#[derive(Debug, Clone)]
pub struct ModelDir {
    root: PathBuf,
    output_name: String,
}

impl ModelDir {
    /// Opens `path` as a model directory that will receive `tokenizer.json`.
    pub fn open(path: impl AsRef<Path>) -> ModelDirResult<Self> {
        Self::open_with_output(path, TOKENIZER_JSON)
    }

    /// Opens `path`, producing `output_name` instead of the default artifact.
    pub fn open_with_output(path: impl AsRef<Path>, output_name: &str) -> ModelDirResult<Self> {
        let path = path.as_ref();
        let root = std::path::absolute(path).map_err(|source| ModelDirError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if !root.is_dir() {
            return Err(ModelDirError::NotADirectory { path: root });
        }

        debug!(root = %root.display(), output = output_name, "Opened model directory");

        Ok(Self {
            root,
            output_name: output_name.to_string(),
        })
    }

    /// Returns the absolute directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path of the artifact to produce.
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output_name)
    }

    /// Returns `true` if the artifact already exists.
    pub fn output_exists(&self) -> bool {
        self.output_path().exists()
    }

    /// Returns the path of `name` inside the directory (whether or not it exists).
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Returns `true` if `name` exists as a regular file.
    pub fn has(&self, name: &str) -> bool {
        self.file(name).is_file()
    }

    /// Returns `true` if any regular file in the directory has extension `ext`.
    pub fn has_any_with_extension(&self, ext: &str) -> bool {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return false;
        };

        entries.filter_map(Result::ok).any(|entry| {
            let path = entry.path();
            path.is_file() && path.extension().is_some_and(|e| e == ext)
        })
    }

    /// Reads and parses `name` as JSON.
    ///
    /// Returns `Ok(None)` when the file does not exist, and an error when it exists but is
    /// unreadable or does not match `T`.
    pub fn read_json<T: DeserializeOwned>(&self, name: &str) -> ModelDirResult<Option<T>> {
        let path = self.file(name);
        if !path.is_file() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(|source| ModelDirError::Io {
            path: path.clone(),
            source,
        })?;

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| ModelDirError::InvalidJson { path, source })
    }

    /// Lists the well-known tokenizer files present in the directory.
    pub fn inventory(&self) -> Vec<&'static str> {
        KNOWN_TOKENIZER_FILES
            .iter()
            .copied()
            .filter(|name| self.has(name))
            .collect()
    }
}
