use tokenizers::decoders::byte_level::ByteLevel as ByteLevelDecoder;
use tokenizers::decoders::wordpiece::WordPiece as WordPieceDecoder;
use tokenizers::models::bpe::{BPE, Vocab};
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::{BertNormalizer, NFC};
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::pre_tokenizers::byte_level::ByteLevel;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::processors::roberta::RobertaProcessing;
use tokenizers::{AddedToken, Tokenizer};
use tracing::{debug, info};

use super::{
    SourceError, SourceResult, TokenizerSource, add_special, add_with_expected_id, build_failed,
    missing_inputs,
};
use crate::constants::{MERGES_TXT, MODEL_CONFIG_JSON, TOKENIZER_CONFIG_JSON, VOCAB_JSON, VOCAB_TXT};
use crate::hf_config::{
    BpeFlavor, ModelConfig, TokenSpec, TokenizerConfig, TokenizerFamily, resolve_family,
};
use crate::model_dir::ModelDir;
use crate::special_tokens;
use crate::vocab::{count_wordpiece_vocab, load_merges, load_vocab_json};

const WORDPIECE_PREFIX: &str = "##";

/// Loads the tokenizer the way the model's own configuration describes it.
///
/// This is the preferred path: it honors `tokenizer_class` / `auto_map`, per-model options
/// such as `add_prefix_space` and `do_lower_case`, and the declared added tokens.
#[derive(Debug, Clone)]
pub struct PretrainedSource {
    trust_remote_code: bool,
}

impl PretrainedSource {
    pub fn new(trust_remote_code: bool) -> Self {
        Self { trust_remote_code }
    }
}

impl TokenizerSource for PretrainedSource {
    fn name(&self) -> &'static str {
        "pretrained"
    }

    fn build(&self, model_dir: &ModelDir) -> SourceResult<Tokenizer> {
        let tokenizer_config: Option<TokenizerConfig> = model_dir.read_json(TOKENIZER_CONFIG_JSON)?;
        let model_config: Option<ModelConfig> = model_dir.read_json(MODEL_CONFIG_JSON)?;

        if tokenizer_config.is_none() && model_config.is_none() {
            return Err(SourceError::UnrecognizedModel {
                path: model_dir.root().to_path_buf(),
            });
        }

        let resolution = resolve_family(
            tokenizer_config.as_ref(),
            model_config.as_ref(),
            self.trust_remote_code,
        )?;

        info!(
            family = %resolution.family,
            class = ?resolution.class_name,
            via = ?resolution.via,
            trust_remote_code = self.trust_remote_code,
            "Resolved tokenizer family"
        );

        let config = tokenizer_config.unwrap_or_default();
        let family = resolution.family;

        let mut tokenizer = match family {
            TokenizerFamily::ByteLevelBpe(flavor) => byte_level_bpe(model_dir, flavor, &config)?,
            TokenizerFamily::WordPiece => wordpiece(model_dir, &config)?,
            TokenizerFamily::SentencePiece => {
                return Err(SourceError::Unsupported {
                    family: family.to_string(),
                    requirement: "SentencePiece",
                });
            }
            TokenizerFamily::Tiktoken => {
                return Err(SourceError::Unsupported {
                    family: family.to_string(),
                    requirement: "tiktoken",
                });
            }
        };

        let defaults: Vec<AddedToken> = default_special_tokens(family)
            .iter()
            .filter(|token| tokenizer.token_to_id(token).is_some())
            .map(|token| AddedToken::from(*token, true))
            .collect();
        add_special(&mut tokenizer, &defaults);

        register_tokens(&mut tokenizer, model_dir, &config);

        match family {
            TokenizerFamily::ByteLevelBpe(BpeFlavor::Roberta) => {
                let sep = special_pair(&tokenizer, config.eos_token.as_ref(), "</s>")?;
                let cls = special_pair(&tokenizer, config.bos_token.as_ref(), "<s>")?;
                tokenizer.with_post_processor(Some(
                    RobertaProcessing::new(sep, cls)
                        .trim_offsets(true)
                        .add_prefix_space(config.add_prefix_space.unwrap_or(false)),
                ));
            }
            TokenizerFamily::ByteLevelBpe(_) => {
                tokenizer.with_post_processor(Some(ByteLevel::default().trim_offsets(false)));
            }
            TokenizerFamily::WordPiece => {
                let sep = special_pair(&tokenizer, config.sep_token.as_ref(), "[SEP]")?;
                let cls = special_pair(&tokenizer, config.cls_token.as_ref(), "[CLS]")?;
                tokenizer.with_post_processor(Some(BertProcessing::new(sep, cls)));
            }
            TokenizerFamily::SentencePiece | TokenizerFamily::Tiktoken => {}
        }

        Ok(tokenizer)
    }
}

/// Special tokens the family's tokenizer class declares by default; registered when present
/// in the vocabulary.
fn default_special_tokens(family: TokenizerFamily) -> &'static [&'static str] {
    match family {
        TokenizerFamily::ByteLevelBpe(BpeFlavor::Gpt2 | BpeFlavor::Qwen2) => &["<|endoftext|>"],
        TokenizerFamily::ByteLevelBpe(BpeFlavor::Roberta) => {
            &["<s>", "<pad>", "</s>", "<unk>", "<mask>"]
        }
        TokenizerFamily::WordPiece => &["[UNK]", "[SEP]", "[PAD]", "[CLS]", "[MASK]"],
        TokenizerFamily::SentencePiece | TokenizerFamily::Tiktoken => &[],
    }
}

fn byte_level_bpe(
    model_dir: &ModelDir,
    flavor: BpeFlavor,
    config: &TokenizerConfig,
) -> SourceResult<Tokenizer> {
    let family = TokenizerFamily::ByteLevelBpe(flavor).to_string();
    let missing: Vec<&'static str> = [VOCAB_JSON, MERGES_TXT]
        .into_iter()
        .filter(|name| !model_dir.has(name))
        .collect();
    if !missing.is_empty() {
        return Err(missing_inputs(model_dir, &family, missing));
    }

    let vocab = load_vocab_json(&model_dir.file(VOCAB_JSON))?;
    let merges = load_merges(&model_dir.file(MERGES_TXT))?;
    let add_prefix_space = config.add_prefix_space.unwrap_or(false);

    debug!(
        vocab_size = vocab.len(),
        merges = merges.len(),
        add_prefix_space,
        "Assembling byte-level BPE"
    );

    let vocab: Vocab = vocab.into_iter().collect();
    let bpe = BPE::builder()
        .vocab_and_merges(vocab, merges)
        .build()
        .map_err(build_failed)?;

    let mut tokenizer = Tokenizer::new(bpe);
    if flavor == BpeFlavor::Qwen2 {
        tokenizer.with_normalizer(Some(NFC));
    }
    tokenizer.with_pre_tokenizer(Some(ByteLevel::default().add_prefix_space(add_prefix_space)));
    tokenizer.with_decoder(Some(ByteLevelDecoder::default()));

    Ok(tokenizer)
}

fn wordpiece(model_dir: &ModelDir, config: &TokenizerConfig) -> SourceResult<Tokenizer> {
    let family = TokenizerFamily::WordPiece.to_string();
    if !model_dir.has(VOCAB_TXT) {
        return Err(missing_inputs(model_dir, &family, vec![VOCAB_TXT]));
    }

    let vocab_path = model_dir.file(VOCAB_TXT);
    let vocab_size = count_wordpiece_vocab(&vocab_path)?;
    let unk_token = config
        .unk_token
        .as_ref()
        .map(|t| t.content().to_string())
        .unwrap_or_else(|| "[UNK]".to_string());
    let lowercase = config.do_lower_case.unwrap_or(true);

    debug!(vocab_size, unk = %unk_token, lowercase, "Assembling WordPiece");

    let model = WordPiece::from_file(&vocab_path.to_string_lossy())
        .unk_token(unk_token)
        .continuing_subword_prefix(WORDPIECE_PREFIX.to_string())
        .build()
        .map_err(build_failed)?;

    let mut tokenizer = Tokenizer::new(model);
    tokenizer.with_normalizer(Some(BertNormalizer::new(
        true,
        config.tokenize_chinese_chars.unwrap_or(true),
        config.strip_accents,
        lowercase,
    )));
    tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));
    tokenizer.with_decoder(Some(WordPieceDecoder::new(
        WORDPIECE_PREFIX.to_string(),
        true,
    )));

    Ok(tokenizer)
}

/// Registers declared added tokens, named special tokens, then harvested metadata tokens.
fn register_tokens(tokenizer: &mut Tokenizer, model_dir: &ModelDir, config: &TokenizerConfig) {
    for (id, entry) in config.added_tokens_by_id() {
        add_with_expected_id(tokenizer, entry.to_added_token(), id);
    }

    let named: Vec<AddedToken> = config
        .named_special_tokens()
        .into_iter()
        .map(TokenSpec::to_special_token)
        .collect();
    add_special(tokenizer, &named);

    let harvested: Vec<AddedToken> = special_tokens::harvest(model_dir)
        .into_iter()
        .map(|token| AddedToken::from(token, true))
        .collect();
    add_special(tokenizer, &harvested);
}

fn special_pair(
    tokenizer: &Tokenizer,
    configured: Option<&TokenSpec>,
    default: &str,
) -> SourceResult<(String, u32)> {
    let token = configured.map(TokenSpec::content).unwrap_or(default);
    tokenizer
        .token_to_id(token)
        .map(|id| (token.to_string(), id))
        .ok_or_else(|| SourceError::MissingSpecialToken {
            token: token.to_string(),
        })
}
