//! Cross-cutting, shared constants.
//!
//! File names follow the HuggingFace model directory layout. Exit codes are part of the
//! command-line contract and must stay stable for scripts that call `tokforge`.

/// Default artifact produced in the model directory.
pub const TOKENIZER_JSON: &str = "tokenizer.json";

/// Byte-level BPE vocabulary (token -> id).
pub const VOCAB_JSON: &str = "vocab.json";

/// Ordered BPE merge rules, one `left right` pair per line.
pub const MERGES_TXT: &str = "merges.txt";

/// WordPiece vocabulary, one token per line (line index is the id).
pub const VOCAB_TXT: &str = "vocab.txt";

/// SentencePiece model protobuf.
pub const SENTENCEPIECE_MODEL: &str = "tokenizer.model";

pub const TOKENIZER_CONFIG_JSON: &str = "tokenizer_config.json";

pub const MODEL_CONFIG_JSON: &str = "config.json";

pub const SPECIAL_TOKENS_MAP_JSON: &str = "special_tokens_map.json";

pub const ADDED_TOKENS_JSON: &str = "added_tokens.json";

/// Extension of tiktoken BPE rank files.
pub const TIKTOKEN_EXTENSION: &str = "tiktoken";

/// Files reported by [`ModelDir::inventory`](crate::model_dir::ModelDir::inventory).
pub const KNOWN_TOKENIZER_FILES: &[&str] = &[
    TOKENIZER_JSON,
    VOCAB_JSON,
    MERGES_TXT,
    VOCAB_TXT,
    SENTENCEPIECE_MODEL,
    TOKENIZER_CONFIG_JSON,
    MODEL_CONFIG_JSON,
    SPECIAL_TOKENS_MAP_JSON,
    ADDED_TOKENS_JSON,
];

/// Generated, or already present.
pub const EXIT_SUCCESS: u8 = 0;

/// Bad command-line usage.
pub const EXIT_USAGE: u8 = 1;

/// The model path is not a directory or cannot be resolved.
pub const EXIT_NOT_A_DIRECTORY: u8 = 2;

/// Every strategy failed to produce a tokenizer.
pub const EXIT_GENERATION_FAILED: u8 = 3;

/// Environment or flag configuration was invalid.
pub const EXIT_CONFIG: u8 = 4;
