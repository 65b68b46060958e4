use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelDirError {
    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type ModelDirResult<T> = Result<T, ModelDirError>;
