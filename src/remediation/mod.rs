//! User-facing guidance printed after failed tokenizer sources.


use std::path::{Path, PathBuf};

use crate::constants::{MERGES_TXT, VOCAB_JSON};
use crate::generate::Attempt;
use crate::hf_config::ResolveError;
use crate::source::SourceError;

const PYTHON_INSTALL: &str = "python -m pip install transformers tokenizers sentencepiece tiktoken";

/// What the hints need to know beyond the failed attempts.
#[derive(Debug, Clone)]
pub struct RemediationContext {
    pub model_dir: PathBuf,
    pub fallback_enabled: bool,
    pub has_bpe_inputs: bool,
}

impl RemediationContext {
    pub fn new(model_dir: impl Into<PathBuf>, fallback_enabled: bool, has_bpe_inputs: bool) -> Self {
        Self {
            model_dir: model_dir.into(),
            fallback_enabled,
            has_bpe_inputs,
        }
    }
}

/// Builds the remediation text for a run where every source failed.
///
/// Targeted hints come first, followed by the generic steps.
pub fn hints(attempts: &[Attempt], context: &RemediationContext) -> Vec<String> {
    let mut hints = targeted_hints(attempts, context);
    hints.extend(generic_steps(&context.model_dir));
    hints
}

/// Hints derived from specific failures, without the generic steps.
///
/// The binary prints these even when a later source succeeded.
pub fn targeted_hints(attempts: &[Attempt], context: &RemediationContext) -> Vec<String> {
    let messages: Vec<String> = attempts.iter().map(|a| a.error.to_string()).collect();
    let mut hints = Vec::new();

    if messages.iter().any(|m| m.contains("tiktoken")) {
        hints.push(
            "The model uses tiktoken ranks. Install tiktoken and export from Python:\n  \
             python -m pip install tiktoken\n\
             If tiktoken fails to install on Python 3.13, create a Python 3.11 virtualenv and retry."
                .to_string(),
        );
    }

    if messages
        .iter()
        .any(|m| m.to_lowercase().contains("sentencepiece"))
    {
        hints.push(
            "The model needs SentencePiece support. Install it and export from Python:\n  \
             python -m pip install sentencepiece"
                .to_string(),
        );
    }

    if let Some(class) = attempts.iter().find_map(untrusted_class) {
        hints.push(format!(
            "Tokenizer class '{class}' comes from the model's custom code. \
             Re-run without --no-trust-remote-code (or set TOKFORGE_TRUST_REMOTE_CODE=true)."
        ));
    }

    if !context.fallback_enabled && context.has_bpe_inputs {
        hints.push(format!(
            "{VOCAB_JSON} and {MERGES_TXT} are present but the BPE fallback is disabled. \
             Re-run without --no-fallback to build a simplified tokenizer from them."
        ));
    }

    hints
}

fn untrusted_class(attempt: &Attempt) -> Option<&str> {
    match &attempt.error {
        SourceError::Resolve(ResolveError::RemoteCodeNotTrusted { class }) => Some(class),
        _ => None,
    }
}

fn generic_steps(model_dir: &Path) -> Vec<String> {
    let path = model_dir.display();
    vec![
        format!(
            "1) Install the Python tooling in a virtualenv and retry:\n  \
             python -m pip install --upgrade pip\n  {PYTHON_INSTALL}"
        ),
        format!(
            "2) Or export manually from Python:\n  \
             from transformers import AutoTokenizer\n  \
             tok = AutoTokenizer.from_pretrained('{path}', trust_remote_code=True, use_fast=True)\n  \
             tok.save_pretrained('{path}', legacy_format=False)"
        ),
        format!(
            "3) Provide {VOCAB_JSON} + {MERGES_TXT} in the model directory to use the built-in BPE fallback."
        ),
        "4) If the model ships a private tokenizer, check the model author's instructions \
         or run the export under a supported Python version such as 3.11."
            .to_string(),
    ]
}

/// Recommended installs appended to usage errors.
pub fn install_help() -> String {
    format!(
        "Recommended installs for exporting tokenizers from Python (run in a virtualenv):\n  \
         python -m pip install --upgrade pip\n  {PYTHON_INSTALL}\n\n\
         If tiktoken fails to install on Python 3.13, try a Python 3.11 virtualenv:\n  \
         pyenv install 3.11.6\n  \
         pyenv virtualenv 3.11.6 tokforge-env\n  \
         pyenv activate tokforge-env\n  {PYTHON_INSTALL}"
    )
}
