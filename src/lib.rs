//! Tokforge library crate (used by the `tokforge` binary and integration tests).
//!
//! Locates or synthesizes a `tokenizer.json` inside a model directory.
//!
//! # Public API Surface
//!
//! ## Core Types
//! - [`Config`], [`ConfigError`] - Generation settings (`TOKFORGE_*` environment overrides)
//! - [`ModelDir`] - Validated model directory and artifact path
//! - [`Generator`], [`Outcome`], [`GeneratedArtifact`] - Source orchestration and results
//!
//! ## Sources
//! - [`TokenizerSource`] - Strategy trait
//! - [`PretrainedSource`] - Assembles the tokenizer the model's configuration declares
//! - [`BpeFallbackSource`] - Simplified byte-level BPE from `vocab.json` + `merges.txt`
//!
//! ## Utilities
//! - [`hints`], [`RemediationContext`] - Guidance when every source fails
//! - [`write_atomic`] - Temp-file-then-rename persistence
//! - Hashing functions for artifact digests

pub mod config;
pub mod constants;
pub mod generate;
pub mod hashing;
pub mod hf_config;
pub mod model_dir;
pub mod remediation;
pub mod source;
pub mod special_tokens;
pub mod storage;
pub mod vocab;

pub use config::{Config, ConfigError, PreTokenizerKind};
pub use generate::{Attempt, GenerateError, GenerateResult, GeneratedArtifact, Generator, Outcome};
pub use hashing::{digest_hex, hash_artifact, short_digest};
pub use hf_config::{
    BpeFlavor, ModelConfig, ResolveError, TokenizerConfig, TokenizerFamily, resolve_family,
};
pub use model_dir::{ModelDir, ModelDirError, ModelDirResult};
pub use remediation::{RemediationContext, hints, install_help, targeted_hints};
pub use source::{
    BpeFallbackSource, PretrainedSource, SourceError, SourceResult, TokenizerSource, sources_for,
};
pub use special_tokens::SpecialTokens;
pub use storage::{StorageError, StorageResult, write_atomic};
pub use vocab::{MergePair, VocabError, VocabResult};
