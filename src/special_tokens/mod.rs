//! Special tokens harvested from auxiliary metadata files.
//!
//! Harvesting never fails: a missing file is skipped, a malformed one is skipped with a warning.


use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::{ADDED_TOKENS_JSON, SPECIAL_TOKENS_MAP_JSON};
use crate::model_dir::ModelDir;

/// Ordered, de-duplicated token list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialTokens {
    tokens: Vec<String>,
}

impl SpecialTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `token` unless it is empty or already present.
    pub fn push(&mut self, token: impl Into<String>) {
        let token = token.into();
        if token.is_empty() || self.contains(&token) {
            return;
        }
        self.tokens.push(token);
    }

    pub fn extend<I, S>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for token in tokens {
            self.push(token);
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }
}

impl IntoIterator for SpecialTokens {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

/// Collects tokens from `special_tokens_map.json` then `added_tokens.json`.
pub fn harvest(model_dir: &ModelDir) -> SpecialTokens {
    let mut tokens = SpecialTokens::new();

    if let Some(value) = read_optional(model_dir, SPECIAL_TOKENS_MAP_JSON) {
        tokens.extend(from_special_tokens_map(&value));
    }
    if let Some(value) = read_optional(model_dir, ADDED_TOKENS_JSON) {
        tokens.extend(from_added_tokens(&value));
    }

    debug!(count = tokens.len(), tokens = ?tokens.as_slice(), "Harvested special tokens");
    tokens
}

fn read_optional(model_dir: &ModelDir, name: &str) -> Option<Value> {
    match model_dir.read_json::<Value>(name) {
        Ok(value) => value,
        Err(e) => {
            warn!(file = name, error = %e, "Ignoring unreadable token metadata");
            None
        }
    }
}

/// Tokens from a `special_tokens_map.json` document.
///
/// Top-level string values are tokens. Serialized `AddedToken` objects contribute their
/// `content`, and arrays (`additional_special_tokens`) contribute each element.
pub fn from_special_tokens_map(value: &Value) -> Vec<String> {
    let Value::Object(map) = value else {
        warn!("special_tokens_map.json is not an object, ignoring");
        return Vec::new();
    };

    let mut out = Vec::new();
    for entry in map.values() {
        match entry {
            Value::Array(items) => out.extend(items.iter().filter_map(token_content)),
            other => out.extend(token_content(other)),
        }
    }
    out
}

/// Tokens from an `added_tokens.json` document: a list of tokens, or an object keyed by token.
pub fn from_added_tokens(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(token_content).collect(),
        Value::Object(map) => map.keys().cloned().collect(),
        _ => {
            warn!("added_tokens.json is neither a list nor an object, ignoring");
            Vec::new()
        }
    }
}

fn token_content(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("content")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
