//! Configuration error types.

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A boolean variable held something other than `1/0/true/false/yes/no/on/off`.
    #[error("invalid boolean '{value}' for {name}: expected true/false, 1/0, yes/no or on/off")]
    InvalidBool { name: &'static str, value: String },

    /// Unknown pre-tokenizer name.
    #[error("invalid pre-tokenizer '{value}': expected 'byte-level' or 'whitespace'")]
    InvalidPreTokenizer { value: String },

    /// Output name is not a usable file name inside the model directory.
    #[error("invalid output name '{value}': {reason}")]
    InvalidOutputName { value: String, reason: String },
}
