//! `tokenizer_config.json` / `config.json` models and tokenizer family resolution.
//!
//! Only the fields that influence how a fast tokenizer is assembled are modelled; everything
//! else in those files is ignored.

pub mod error;


pub use error::ResolveError;

use std::collections::BTreeMap;

use serde::Deserialize;
use tokenizers::AddedToken;

/// A token field that may be a bare string or a serialized `AddedToken`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TokenSpec {
    Plain(String),
    Added(AddedTokenEntry),
}

impl TokenSpec {
    pub fn content(&self) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::Added(entry) => &entry.content,
        }
    }

    /// Converts to a special [`AddedToken`], keeping any strip flags.
    pub fn to_special_token(&self) -> AddedToken {
        match self {
            Self::Plain(s) => AddedToken::from(s.clone(), true),
            Self::Added(entry) => AddedToken {
                special: true,
                ..entry.to_added_token()
            },
        }
    }
}

/// An `added_tokens_decoder` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AddedTokenEntry {
    pub content: String,
    #[serde(default)]
    pub special: bool,
    #[serde(default)]
    pub lstrip: bool,
    #[serde(default)]
    pub rstrip: bool,
    #[serde(default)]
    pub single_word: bool,
    /// Defaults to `!special` when absent.
    #[serde(default)]
    pub normalized: Option<bool>,
}

impl AddedTokenEntry {
    pub fn to_added_token(&self) -> AddedToken {
        AddedToken::from(self.content.clone(), self.special)
            .lstrip(self.lstrip)
            .rstrip(self.rstrip)
            .single_word(self.single_word)
            .normalized(self.normalized.unwrap_or(!self.special))
    }
}

/// `auto_map.AutoTokenizer`: `"module.Class"` or `["module.Slow", "module.Fast" | null]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AutoTokenizerRef {
    One(String),
    Pair(Vec<Option<String>>),
}

impl AutoTokenizerRef {
    /// Class name of the preferred (fast first) implementation, module prefix stripped.
    pub fn class_name(&self) -> Option<&str> {
        let reference = match self {
            Self::One(s) => Some(s.as_str()),
            Self::Pair(items) => items
                .iter()
                .rev()
                .flatten()
                .map(String::as_str)
                .find(|s| !s.is_empty()),
        }?;

        reference.rsplit('.').next().filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AutoMap {
    #[serde(rename = "AutoTokenizer", default)]
    pub auto_tokenizer: Option<AutoTokenizerRef>,
}

/// The subset of `tokenizer_config.json` used to assemble a fast tokenizer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenizerConfig {
    pub tokenizer_class: Option<String>,
    pub auto_map: Option<AutoMap>,
    pub add_prefix_space: Option<bool>,
    pub do_lower_case: Option<bool>,
    pub tokenize_chinese_chars: Option<bool>,
    pub strip_accents: Option<bool>,
    pub unk_token: Option<TokenSpec>,
    pub bos_token: Option<TokenSpec>,
    pub eos_token: Option<TokenSpec>,
    pub pad_token: Option<TokenSpec>,
    pub sep_token: Option<TokenSpec>,
    pub cls_token: Option<TokenSpec>,
    pub mask_token: Option<TokenSpec>,
    pub additional_special_tokens: Option<Vec<TokenSpec>>,
    pub added_tokens_decoder: BTreeMap<String, AddedTokenEntry>,
}

impl TokenizerConfig {
    /// Named special tokens in a stable order: unk, bos, eos, pad, sep, cls, mask, additional.
    pub fn named_special_tokens(&self) -> Vec<&TokenSpec> {
        [
            &self.unk_token,
            &self.bos_token,
            &self.eos_token,
            &self.pad_token,
            &self.sep_token,
            &self.cls_token,
            &self.mask_token,
        ]
        .into_iter()
        .flatten()
        .chain(self.additional_special_tokens.iter().flatten())
        .collect()
    }

    /// `added_tokens_decoder` entries sorted by numeric id. Non-numeric keys are dropped.
    pub fn added_tokens_by_id(&self) -> Vec<(u32, &AddedTokenEntry)> {
        let mut entries: Vec<_> = self
            .added_tokens_decoder
            .iter()
            .filter_map(|(id, entry)| id.parse::<u32>().ok().map(|id| (id, entry)))
            .collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }
}

/// The subset of `config.json` used to identify the tokenizer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub model_type: Option<String>,
    pub tokenizer_class: Option<String>,
    pub auto_map: Option<AutoMap>,
}

/// Byte-level BPE variants that differ in normalization and post-processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BpeFlavor {
    Gpt2,
    Roberta,
    Qwen2,
}

/// How a fast tokenizer for the model is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerFamily {
    ByteLevelBpe(BpeFlavor),
    WordPiece,
    SentencePiece,
    Tiktoken,
}

impl TokenizerFamily {
    /// Maps a HuggingFace tokenizer class name (`GPT2TokenizerFast`, `BertTokenizer`, ...).
    pub fn from_class_name(class: &str) -> Option<Self> {
        let class = class.trim();
        let stem = class.strip_suffix("Fast").unwrap_or(class);
        let stem = stem.strip_suffix("Tokenizer").unwrap_or(stem);
        let stem = stem.to_ascii_lowercase();

        if stem.contains("tiktoken") {
            return Some(Self::Tiktoken);
        }

        let family = match stem.as_str() {
            "gpt2" | "gptj" | "gptneox" | "codegen" | "bloom" => {
                Self::ByteLevelBpe(BpeFlavor::Gpt2)
            }
            "qwen2" => Self::ByteLevelBpe(BpeFlavor::Qwen2),
            "roberta" | "bart" | "longformer" | "led" | "blenderbot" => {
                Self::ByteLevelBpe(BpeFlavor::Roberta)
            }
            "bert" | "distilbert" | "electra" | "mobilebert" | "squeezebert" | "layoutlm"
            | "retribert" => Self::WordPiece,
            "llama" | "codellama" | "t5" | "albert" | "xlnet" | "camembert" | "xlmroberta"
            | "gemma" | "mistral" | "mbart" | "marian" | "pegasus" => Self::SentencePiece,
            "qwen" => Self::Tiktoken,
            _ => return None,
        };
        Some(family)
    }

    /// Maps a `config.json` `model_type`.
    pub fn from_model_type(model_type: &str) -> Option<Self> {
        let family = match model_type.trim().to_ascii_lowercase().as_str() {
            "gpt2" | "gptj" | "gpt_neox" | "codegen" | "bloom" => {
                Self::ByteLevelBpe(BpeFlavor::Gpt2)
            }
            "qwen2" | "qwen2_moe" | "qwen3" | "qwen3_moe" => Self::ByteLevelBpe(BpeFlavor::Qwen2),
            "roberta" | "bart" | "longformer" | "led" | "blenderbot" => {
                Self::ByteLevelBpe(BpeFlavor::Roberta)
            }
            "bert" | "distilbert" | "electra" | "mobilebert" | "squeezebert" | "layoutlm" => {
                Self::WordPiece
            }
            "llama" | "t5" | "albert" | "xlnet" | "camembert" | "xlm-roberta" | "gemma"
            | "mistral" | "mbart" | "marian" | "pegasus" => Self::SentencePiece,
            "qwen" => Self::Tiktoken,
            _ => return None,
        };
        Some(family)
    }
}

impl std::fmt::Display for TokenizerFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ByteLevelBpe(BpeFlavor::Gpt2) => write!(f, "byte-level BPE (GPT-2)"),
            Self::ByteLevelBpe(BpeFlavor::Roberta) => write!(f, "byte-level BPE (RoBERTa)"),
            Self::ByteLevelBpe(BpeFlavor::Qwen2) => write!(f, "byte-level BPE (Qwen2)"),
            Self::WordPiece => write!(f, "WordPiece"),
            Self::SentencePiece => write!(f, "SentencePiece"),
            Self::Tiktoken => write!(f, "tiktoken"),
        }
    }
}

/// Where the tokenizer family was determined from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedVia {
    AutoMap,
    TokenizerClass,
    ModelType,
}

/// Outcome of [`resolve_family`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub family: TokenizerFamily,
    pub class_name: Option<String>,
    pub via: ResolvedVia,
}

/// Determines the tokenizer family from the model's configuration files.
///
/// A custom class referenced through `auto_map` is only honored with `trust_remote_code`.
/// Without trust, a known `tokenizer_class` is still accepted; otherwise resolution fails.
pub fn resolve_family(
    tokenizer_config: Option<&TokenizerConfig>,
    model_config: Option<&ModelConfig>,
    trust_remote_code: bool,
) -> Result<Resolution, ResolveError> {
    let remote_class = tokenizer_config
        .and_then(|c| c.auto_map.as_ref())
        .or_else(|| model_config.and_then(|c| c.auto_map.as_ref()))
        .and_then(|m| m.auto_tokenizer.as_ref())
        .and_then(AutoTokenizerRef::class_name);

    let declared_class = tokenizer_config
        .and_then(|c| c.tokenizer_class.as_deref())
        .or_else(|| model_config.and_then(|c| c.tokenizer_class.as_deref()));

    if let Some(remote) = remote_class {
        if trust_remote_code {
            if let Some(family) = TokenizerFamily::from_class_name(remote) {
                return Ok(Resolution {
                    family,
                    class_name: Some(remote.to_string()),
                    via: ResolvedVia::AutoMap,
                });
            }
        } else if declared_class
            .and_then(TokenizerFamily::from_class_name)
            .is_none()
        {
            return Err(ResolveError::RemoteCodeNotTrusted {
                class: remote.to_string(),
            });
        }
    }

    if let Some(class) = declared_class {
        return TokenizerFamily::from_class_name(class)
            .map(|family| Resolution {
                family,
                class_name: Some(class.to_string()),
                via: ResolvedVia::TokenizerClass,
            })
            .ok_or_else(|| ResolveError::UnknownClass {
                class: class.to_string(),
            });
    }

    if let Some(model_type) = model_config.and_then(|c| c.model_type.as_deref()) {
        return TokenizerFamily::from_model_type(model_type)
            .map(|family| Resolution {
                family,
                class_name: None,
                via: ResolvedVia::ModelType,
            })
            .ok_or_else(|| ResolveError::UnknownModelType {
                model_type: model_type.to_string(),
            });
    }

    Err(ResolveError::Unidentified)
}
