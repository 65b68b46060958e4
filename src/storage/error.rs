use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parent directory of {path} does not exist")]
    NoParent { path: PathBuf },
}

pub type StorageResult<T> = Result<T, StorageError>;
