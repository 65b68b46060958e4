use tokenizers::decoders::byte_level::ByteLevel as ByteLevelDecoder;
use tokenizers::models::bpe::{BPE, Merges, Vocab};
use tokenizers::normalizers::{NFC, Sequence};
use tokenizers::pre_tokenizers::byte_level::ByteLevel;
use tokenizers::pre_tokenizers::whitespace::Whitespace;
use tokenizers::{AddedToken, Tokenizer};
use tracing::{info, warn};

use super::{SourceResult, TokenizerSource, add_special, build_failed};
use crate::config::PreTokenizerKind;
use crate::constants::{MERGES_TXT, VOCAB_JSON};
use crate::model_dir::ModelDir;
use crate::special_tokens;
use crate::vocab::{load_merges, load_vocab_json};

/// Simplified GPT-2 style tokenizer assembled from `vocab.json` + `merges.txt`.
#[derive(Debug, Clone)]
pub struct BpeFallbackSource {
    add_prefix_space: bool,
    pre_tokenizer: PreTokenizerKind,
}

impl Default for BpeFallbackSource {
    fn default() -> Self {
        Self::new(true, PreTokenizerKind::ByteLevel)
    }
}

impl BpeFallbackSource {
    pub fn new(add_prefix_space: bool, pre_tokenizer: PreTokenizerKind) -> Self {
        Self {
            add_prefix_space,
            pre_tokenizer,
        }
    }
}

impl TokenizerSource for BpeFallbackSource {
    fn name(&self) -> &'static str {
        "bpe-fallback"
    }

    fn applicable(&self, model_dir: &ModelDir) -> bool {
        model_dir.has(VOCAB_JSON) && model_dir.has(MERGES_TXT)
    }

    fn build(&self, model_dir: &ModelDir) -> SourceResult<Tokenizer> {
        let vocab = load_vocab_json(&model_dir.file(VOCAB_JSON))?;
        let merges: Merges = load_merges(&model_dir.file(MERGES_TXT))?;

        info!(
            vocab_size = vocab.len(),
            merges = merges.len(),
            pre_tokenizer = %self.pre_tokenizer,
            add_prefix_space = self.add_prefix_space,
            "Constructing BPE tokenizer from vocab.json + merges.txt"
        );

        let vocab: Vocab = vocab.into_iter().collect();
        let bpe = BPE::builder()
            .vocab_and_merges(vocab, merges)
            .build()
            .map_err(build_failed)?;

        let mut tokenizer = Tokenizer::new(bpe);
        tokenizer.with_normalizer(Some(Sequence::new(vec![NFC.into()])));

        match self.pre_tokenizer {
            PreTokenizerKind::ByteLevel => {
                tokenizer.with_pre_tokenizer(Some(
                    ByteLevel::default().add_prefix_space(self.add_prefix_space),
                ));
                tokenizer.with_decoder(Some(ByteLevelDecoder::default()));
            }
            PreTokenizerKind::Whitespace => {
                warn!("Using whitespace pre-tokenizer; byte-level merges may not apply cleanly");
                tokenizer.with_pre_tokenizer(Some(Whitespace::default()));
            }
        }

        let special: Vec<AddedToken> = special_tokens::harvest(model_dir)
            .into_iter()
            .map(|token| AddedToken::from(token, true))
            .collect();
        add_special(&mut tokenizer, &special);

        Ok(tokenizer)
    }
}
