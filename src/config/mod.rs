//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `TOKFORGE_*` environment variables; the binary
//! applies command-line flags on top of the result.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::path::{Component, Path};

use clap::ValueEnum;

use crate::constants::TOKENIZER_JSON;

/// Pre-tokenizer installed by the BPE fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PreTokenizerKind {
    /// GPT-2 style byte-level splitting (paired with a byte-level decoder).
    #[default]
    ByteLevel,
    /// Plain whitespace/punctuation splitting, no decoder.
    Whitespace,
}

impl std::fmt::Display for PreTokenizerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ByteLevel => write!(f, "byte-level"),
            Self::Whitespace => write!(f, "whitespace"),
        }
    }
}

/// Generation settings.
///
/// Use [`Config::from_env`] to read `TOKFORGE_*` overrides on top of defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File name written inside the model directory. Default: `tokenizer.json`.
    pub output_name: String,

    /// Honor `auto_map` custom tokenizer classes. Default: `true`.
    pub trust_remote_code: bool,

    /// Build a byte-level BPE from `vocab.json` + `merges.txt` when loading fails. Default: `true`.
    pub fallback: bool,

    /// `add_prefix_space` for the fallback's byte-level pre-tokenizer. Default: `true`.
    pub add_prefix_space: bool,

    /// Pre-tokenizer for the fallback. Default: byte-level.
    pub pre_tokenizer: PreTokenizerKind,

    /// Pretty-print the JSON artifact. Default: `true`.
    pub pretty: bool,

    /// Regenerate even when the artifact already exists. Default: `false`.
    pub force: bool,

    /// Reload the written artifact and check it. Default: `true`.
    pub verify: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_name: TOKENIZER_JSON.to_string(),
            trust_remote_code: true,
            fallback: true,
            add_prefix_space: true,
            pre_tokenizer: PreTokenizerKind::ByteLevel,
            pretty: true,
            force: false,
            verify: true,
        }
    }
}

impl Config {
    pub const ENV_OUTPUT_NAME: &'static str = "TOKFORGE_OUTPUT_NAME";
    pub const ENV_TRUST_REMOTE_CODE: &'static str = "TOKFORGE_TRUST_REMOTE_CODE";
    pub const ENV_FALLBACK: &'static str = "TOKFORGE_FALLBACK";
    pub const ENV_ADD_PREFIX_SPACE: &'static str = "TOKFORGE_ADD_PREFIX_SPACE";
    pub const ENV_PRE_TOKENIZER: &'static str = "TOKFORGE_PRE_TOKENIZER";
    pub const ENV_PRETTY: &'static str = "TOKFORGE_PRETTY";
    pub const ENV_FORCE: &'static str = "TOKFORGE_FORCE";
    pub const ENV_VERIFY: &'static str = "TOKFORGE_VERIFY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let output_name = Self::parse_string_from_env(Self::ENV_OUTPUT_NAME, defaults.output_name);
        let trust_remote_code =
            Self::parse_bool_from_env(Self::ENV_TRUST_REMOTE_CODE, defaults.trust_remote_code)?;
        let fallback = Self::parse_bool_from_env(Self::ENV_FALLBACK, defaults.fallback)?;
        let add_prefix_space =
            Self::parse_bool_from_env(Self::ENV_ADD_PREFIX_SPACE, defaults.add_prefix_space)?;
        let pre_tokenizer = Self::parse_pre_tokenizer_from_env(defaults.pre_tokenizer)?;
        let pretty = Self::parse_bool_from_env(Self::ENV_PRETTY, defaults.pretty)?;
        let force = Self::parse_bool_from_env(Self::ENV_FORCE, defaults.force)?;
        let verify = Self::parse_bool_from_env(Self::ENV_VERIFY, defaults.verify)?;

        Ok(Self {
            output_name,
            trust_remote_code,
            fallback,
            add_prefix_space,
            pre_tokenizer,
            pretty,
            force,
            verify,
        })
    }

    /// Validates invariants that do not depend on the model directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = self.output_name.as_str();
        let invalid = |reason: &str| ConfigError::InvalidOutputName {
            value: name.to_string(),
            reason: reason.to_string(),
        };

        if name.trim().is_empty() {
            return Err(invalid("must not be empty"));
        }

        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(invalid("must be a bare file name")),
        }
        if name.contains(['/', '\\']) {
            return Err(invalid("must be a bare file name"));
        }

        if !name.ends_with(".json") {
            return Err(invalid("must end with .json"));
        }

        Ok(())
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_bool_from_env(var_name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match env::var(var_name) {
            Ok(value) => parse_bool(&value).ok_or(ConfigError::InvalidBool {
                name: var_name,
                value,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_pre_tokenizer_from_env(
        default: PreTokenizerKind,
    ) -> Result<PreTokenizerKind, ConfigError> {
        match env::var(Self::ENV_PRE_TOKENIZER) {
            Ok(value) => <PreTokenizerKind as ValueEnum>::from_str(value.trim(), true)
                .map_err(|_| ConfigError::InvalidPreTokenizer { value }),
            Err(_) => Ok(default),
        }
    }
}

/// Parses the boolean spellings accepted in `TOKFORGE_*` variables.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
