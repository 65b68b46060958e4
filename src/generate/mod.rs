//! Orchestration: skip when present, try sources in order, persist the first success.

pub mod error;
mod types;


pub use error::{GenerateError, GenerateResult};
pub use types::{Attempt, GeneratedArtifact, Outcome};

use std::fs;
use std::path::Path;
use std::str::FromStr;

use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::hashing::{digest_hex, short_digest};
use crate::model_dir::ModelDir;
use crate::source::{TokenizerSource, sources_for};
use crate::storage::write_atomic;

/// Produces the tokenizer artifact for a model directory.
pub struct Generator {
    config: Config,
    sources: Vec<Box<dyn TokenizerSource>>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Generator {
    /// Creates a generator with the sources implied by `config`.
    pub fn new(config: Config) -> Self {
        let sources = sources_for(&config);
        Self::with_sources(config, sources)
    }

    /// Creates a generator with an explicit source list (tried in order).
    pub fn with_sources(config: Config, sources: Vec<Box<dyn TokenizerSource>>) -> Self {
        Self { config, sources }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn run(&self, model_dir: &ModelDir) -> GenerateResult<Outcome> {
        let output = model_dir.output_path();

        if model_dir.output_exists() && !self.config.force {
            info!(path = %output.display(), "Tokenizer artifact already present, nothing to do");
            return Ok(Outcome::AlreadyPresent { path: output });
        }

        debug!(
            root = %model_dir.root().display(),
            files = ?model_dir.inventory(),
            force = self.config.force,
            "Inspecting model directory"
        );

        let mut attempts = Vec::new();

        for source in &self.sources {
            if !source.applicable(model_dir) {
                debug!(source = source.name(), "Source not applicable, skipping");
                continue;
            }

            info!(source = source.name(), "Attempting tokenizer source");

            match source.build(model_dir) {
                Ok(tokenizer) => {
                    let artifact = self.persist(source.name(), &tokenizer, &output, attempts)?;
                    return Ok(Outcome::Generated(artifact));
                }
                Err(error) => {
                    warn!(source = source.name(), error = %error, "Tokenizer source failed");
                    attempts.push(Attempt {
                        source: source.name(),
                        error,
                    });
                }
            }
        }

        Err(GenerateError::Exhausted { attempts })
    }

    fn persist(
        &self,
        source: &'static str,
        tokenizer: &Tokenizer,
        output: &Path,
        attempts: Vec<Attempt>,
    ) -> GenerateResult<GeneratedArtifact> {
        let json = tokenizer
            .to_string(self.config.pretty)
            .map_err(|e| GenerateError::Serialize {
                reason: e.to_string(),
            })?;

        let vocab_size = tokenizer.get_vocab_size(true);
        if self.config.verify {
            verify_serialized(&json, output, vocab_size)?;
        }

        write_atomic(output, json.as_bytes())?;

        let digest = digest_hex(json.as_bytes());

        info!(
            source,
            path = %output.display(),
            vocab_size,
            digest = short_digest(&digest, 12),
            "Tokenizer artifact written"
        );

        Ok(GeneratedArtifact {
            source,
            path: output.to_path_buf(),
            vocab_size,
            added_tokens: tokenizer.get_added_tokens_decoder().len(),
            digest,
            bytes: json.len(),
            verified: self.config.verify,
            attempts,
        })
    }
}

/// Reloads the artifact at `path` and checks its vocabulary size.
pub fn verify(path: &Path, expected_vocab_size: usize) -> GenerateResult<()> {
    let json = fs::read_to_string(path).map_err(|e| GenerateError::Verify {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    verify_serialized(&json, path, expected_vocab_size)
}

/// Parses serialized tokenizer JSON destined for `path` and checks its vocabulary size.
///
/// Runs before the artifact is written, so a rejected tokenizer never replaces an existing file.
pub fn verify_serialized(json: &str, path: &Path, expected_vocab_size: usize) -> GenerateResult<()> {
    let reloaded = Tokenizer::from_str(json).map_err(|e| GenerateError::Verify {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let actual = reloaded.get_vocab_size(true);
    if actual != expected_vocab_size {
        return Err(GenerateError::VerifyMismatch {
            expected: expected_vocab_size,
            actual,
        });
    }

    debug!(path = %path.display(), vocab_size = actual, "Serialized tokenizer reloads cleanly");
    Ok(())
}
