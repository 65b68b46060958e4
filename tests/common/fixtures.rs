//! Model directory fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// GPT-2 style byte-level vocabulary.
pub const GPT2_VOCAB: &str = r#"{"<|endoftext|>": 0, "Ġ": 1, "a": 2, "b": 3, "ab": 4, "Ġab": 5}"#;

pub const GPT2_MERGES: &str = "#version: 0.2\na b\nĠ ab\n";

/// RoBERTa style vocabulary with its special tokens inline.
pub const ROBERTA_VOCAB: &str = r#"{"<s>": 0, "<pad>": 1, "</s>": 2, "<unk>": 3, "Ġ": 4, "a": 5, "b": 6, "ab": 7, "Ġab": 8, "<mask>": 9}"#;

pub const ROBERTA_MERGES: &str = "a b\nĠ ab\n";

/// Builds a model directory in a temp dir, one file at a time.
pub struct ModelDirBuilder {
    dir: TempDir,
}

impl ModelDirBuilder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn file(self, name: &str, contents: &str) -> Self {
        fs::write(self.dir.path().join(name), contents).expect("Failed to write fixture");
        self
    }

    pub fn gpt2_bpe(self) -> Self {
        self.file("vocab.json", GPT2_VOCAB)
            .file("merges.txt", GPT2_MERGES)
    }

    pub fn roberta_bpe(self) -> Self {
        self.file("vocab.json", ROBERTA_VOCAB)
            .file("merges.txt", ROBERTA_MERGES)
    }

    pub fn tokenizer_config(self, json: &str) -> Self {
        self.file("tokenizer_config.json", json)
    }

    pub fn build(self) -> TempDir {
        self.dir
    }
}

pub fn artifact(dir: &Path) -> std::path::PathBuf {
    dir.join("tokenizer.json")
}
