use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VocabError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a token -> id JSON object: {source}")]
    InvalidVocabJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("vocabulary at {path} is empty")]
    EmptyVocab { path: PathBuf },

    #[error("malformed merge rule on line {line}: '{content}' (expected two symbols)")]
    MalformedMerge { line: usize, content: String },
}

pub type VocabResult<T> = Result<T, VocabError>;
