use std::path::PathBuf;

use crate::source::SourceError;

/// A source that ran and failed.
#[derive(Debug)]
pub struct Attempt {
    pub source: &'static str,
    pub error: SourceError,
}

impl std::fmt::Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source, self.error)
    }
}

/// Details of a freshly written artifact.
#[derive(Debug)]
pub struct GeneratedArtifact {
    /// Name of the source that produced the tokenizer.
    pub source: &'static str,
    pub path: PathBuf,
    /// Vocabulary size including added tokens.
    pub vocab_size: usize,
    pub added_tokens: usize,
    /// Hex BLAKE3 digest of the written bytes.
    pub digest: String,
    pub bytes: usize,
    pub verified: bool,
    /// Sources that failed before this one succeeded.
    pub attempts: Vec<Attempt>,
}

#[derive(Debug)]
pub enum Outcome {
    /// The artifact existed and `force` was off.
    AlreadyPresent { path: PathBuf },
    Generated(GeneratedArtifact),
}

impl Outcome {
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::AlreadyPresent { path } => path,
            Self::Generated(artifact) => &artifact.path,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}
