use std::path::PathBuf;
use thiserror::Error;

use super::types::Attempt;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum GenerateError {
    /// Every applicable source failed (or none applied).
    #[error("could not generate tokenizer: {} source attempt(s) failed", attempts.len())]
    Exhausted { attempts: Vec<Attempt> },

    #[error("failed to serialize tokenizer: {reason}")]
    Serialize { reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("written tokenizer at {path} failed to reload: {reason}")]
    Verify { path: PathBuf, reason: String },

    #[error("written tokenizer vocabulary size {actual} differs from built size {expected}")]
    VerifyMismatch { expected: usize, actual: usize },
}

impl GenerateError {
    /// Failed attempts carried by [`GenerateError::Exhausted`]; empty otherwise.
    pub fn attempts(&self) -> &[Attempt] {
        match self {
            Self::Exhausted { attempts } => attempts,
            _ => &[],
        }
    }
}

pub type GenerateResult<T> = Result<T, GenerateError>;
