use std::path::PathBuf;
use thiserror::Error;

use crate::hf_config::ResolveError;
use crate::model_dir::ModelDirError;
use crate::vocab::VocabError;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no tokenizer_config.json or config.json in {path}; cannot identify the model")]
    UnrecognizedModel { path: PathBuf },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("{family} tokenizers need {requirement} support, which fast conversion does not provide")]
    Unsupported {
        family: String,
        requirement: &'static str,
    },

    #[error("{family} tokenizer requires missing file(s): {}", files.join(", "))]
    MissingFiles {
        family: String,
        files: Vec<&'static str>,
    },

    #[error("special token '{token}' is not in the vocabulary")]
    MissingSpecialToken { token: String },

    #[error(transparent)]
    ModelDir(#[from] ModelDirError),

    #[error(transparent)]
    Vocab(#[from] VocabError),

    #[error("failed to assemble tokenizer: {reason}")]
    Build { reason: String },
}

pub type SourceResult<T> = Result<T, SourceError>;
