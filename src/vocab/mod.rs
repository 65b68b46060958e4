//! Readers for the plain vocabulary files shipped next to model weights.
//!
//! - `vocab.json`: JSON object, token -> id.
//! - `merges.txt`: ordered merge rules; line order is merge priority.
//! - `vocab.txt`: WordPiece vocabulary, one token per line.

pub mod error;


pub use error::{VocabError, VocabResult};

use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A single merge rule `(left, right)`.
pub type MergePair = (String, String);

fn read_to_string(path: &Path) -> VocabResult<String> {
    fs::read_to_string(path).map_err(|source| VocabError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads a `vocab.json` token -> id map.
pub fn load_vocab_json(path: &Path) -> VocabResult<HashMap<String, u32>> {
    let text = read_to_string(path)?;
    let vocab: HashMap<String, u32> =
        serde_json::from_str(&text).map_err(|source| VocabError::InvalidVocabJson {
            path: path.to_path_buf(),
            source,
        })?;

    if vocab.is_empty() {
        return Err(VocabError::EmptyVocab {
            path: path.to_path_buf(),
        });
    }

    Ok(vocab)
}

/// Parses merge rules from `merges.txt` contents.
///
/// Blank lines and `#` lines (e.g. `#version: 0.2`) are skipped. Every other line must hold
/// exactly two whitespace-separated symbols.
pub fn parse_merges(text: &str) -> VocabResult<Vec<MergePair>> {
    let mut merges = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(left), Some(right), None) => {
                merges.push((left.to_string(), right.to_string()));
            }
            _ => {
                return Err(VocabError::MalformedMerge {
                    line: idx + 1,
                    content: line.to_string(),
                });
            }
        }
    }

    Ok(merges)
}

/// Loads and parses a `merges.txt` file.
pub fn load_merges(path: &Path) -> VocabResult<Vec<MergePair>> {
    parse_merges(&read_to_string(path)?)
}

/// Counts the entries of a WordPiece `vocab.txt`.
pub fn count_wordpiece_vocab(path: &Path) -> VocabResult<usize> {
    let text = read_to_string(path)?;
    let count = text.lines().filter(|l| !l.trim().is_empty()).count();

    if count == 0 {
        return Err(VocabError::EmptyVocab {
            path: path.to_path_buf(),
        });
    }

    Ok(count)
}
