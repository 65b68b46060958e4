//! Strategies that produce a fast [`Tokenizer`] from a model directory.
//!
//! - [`PretrainedSource`] identifies the tokenizer from `tokenizer_config.json` / `config.json`
//!   and assembles the matching fast tokenizer.
//! - [`BpeFallbackSource`] builds a simplified byte-level BPE from `vocab.json` + `merges.txt`.

pub mod error;
mod fallback;
mod pretrained;

#[cfg(test)]
mod tests;

pub use error::{SourceError, SourceResult};
pub use fallback::BpeFallbackSource;
pub use pretrained::PretrainedSource;

use tokenizers::{AddedToken, Tokenizer};
use tracing::{debug, warn};

use crate::config::Config;
use crate::constants::{SENTENCEPIECE_MODEL, TIKTOKEN_EXTENSION};
use crate::model_dir::ModelDir;

/// A way of obtaining a tokenizer for a model directory.
pub trait TokenizerSource: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Returns `false` when the directory lacks what this source needs; it is then skipped
    /// without being reported as a failure.
    fn applicable(&self, _model_dir: &ModelDir) -> bool {
        true
    }

    fn build(&self, model_dir: &ModelDir) -> SourceResult<Tokenizer>;
}

/// Sources in the order they are attempted for `config`.
pub fn sources_for(config: &Config) -> Vec<Box<dyn TokenizerSource>> {
    let mut sources: Vec<Box<dyn TokenizerSource>> =
        vec![Box::new(PretrainedSource::new(config.trust_remote_code))];

    if config.fallback {
        sources.push(Box::new(BpeFallbackSource::new(
            config.add_prefix_space,
            config.pre_tokenizer,
        )));
    }

    sources
}

pub(crate) fn build_failed(err: impl std::fmt::Display) -> SourceError {
    SourceError::Build {
        reason: err.to_string(),
    }
}

/// Error for a family whose input files are absent.
///
/// When the directory only ships a SentencePiece model or tiktoken ranks, the error names that
/// format so the user is pointed at the right converter.
pub(crate) fn missing_inputs(
    model_dir: &ModelDir,
    family: &str,
    missing: Vec<&'static str>,
) -> SourceError {
    if model_dir.has(SENTENCEPIECE_MODEL) {
        return SourceError::Unsupported {
            family: family.to_string(),
            requirement: "SentencePiece",
        };
    }
    if model_dir.has_any_with_extension(TIKTOKEN_EXTENSION) {
        return SourceError::Unsupported {
            family: family.to_string(),
            requirement: "tiktoken",
        };
    }
    SourceError::MissingFiles {
        family: family.to_string(),
        files: missing,
    }
}

/// Registers `tokens` as special added tokens, returning how many were new.
pub(crate) fn add_special(tokenizer: &mut Tokenizer, tokens: &[AddedToken]) -> usize {
    if tokens.is_empty() {
        return 0;
    }
    let added = tokenizer.add_special_tokens(tokens);
    debug!(requested = tokens.len(), added, "Registered special tokens");
    added
}

/// Registers an added token that is expected to land on `expected_id`.
pub(crate) fn add_with_expected_id(tokenizer: &mut Tokenizer, token: AddedToken, expected_id: u32) {
    let content = token.content.clone();
    if token.special {
        tokenizer.add_special_tokens(&[token]);
    } else {
        tokenizer.add_tokens(&[token]);
    }

    let actual = tokenizer.token_to_id(&content);
    if actual != Some(expected_id) {
        warn!(
            token = %content,
            expected_id,
            actual_id = ?actual,
            "Added token id differs from tokenizer_config.json"
        );
    }
}
