use super::*;
use crate::config::PreTokenizerKind;
use crate::hf_config::ResolveError;
use std::fs;
use tempfile::TempDir;

const VOCAB: &str = r#"{"Ġ": 0, "a": 1, "b": 2, "c": 3, "ab": 4, "Ġab": 5, "Ġc": 6, "<|endoftext|>": 7}"#;
const MERGES: &str = "#version: 0.2\na b\nĠ ab\nĠ c\n";
const WORDPIECE_VOCAB: &str = "[PAD]\n[UNK]\n[CLS]\n[SEP]\nhello\nworld\n##s\n";

fn model_dir_with(files: &[(&str, &str)]) -> (ModelDir, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (name, contents) in files {
        fs::write(dir.path().join(name), contents).unwrap();
    }
    let model_dir = ModelDir::open(dir.path()).unwrap();
    (model_dir, dir)
}

fn bpe_files() -> Vec<(&'static str, &'static str)> {
    vec![("vocab.json", VOCAB), ("merges.txt", MERGES)]
}

fn ids(tokenizer: &Tokenizer, text: &str, add_special_tokens: bool) -> Vec<u32> {
    tokenizer
        .encode(text, add_special_tokens)
        .expect("encode should succeed")
        .get_ids()
        .to_vec()
}

#[test]
fn test_sources_for_config() {
    let config = Config::default();
    let names: Vec<_> = sources_for(&config).iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["pretrained", "bpe-fallback"]);

    let config = Config {
        fallback: false,
        ..Default::default()
    };
    let names: Vec<_> = sources_for(&config).iter().map(|s| s.name()).collect();
    assert_eq!(names, vec!["pretrained"]);
}

#[test]
fn test_fallback_applicable_requires_both_files() {
    let source = BpeFallbackSource::default();

    let (model_dir, _dir) = model_dir_with(&[("vocab.json", VOCAB)]);
    assert!(!source.applicable(&model_dir));

    let (model_dir, _dir) = model_dir_with(&bpe_files());
    assert!(source.applicable(&model_dir));
}

#[test]
fn test_fallback_builds_byte_level_bpe() {
    let (model_dir, _dir) = model_dir_with(&bpe_files());

    let tokenizer = BpeFallbackSource::default()
        .build(&model_dir)
        .expect("fallback should build");

    let encoded = ids(&tokenizer, "ab c", false);
    assert_eq!(encoded, vec![5, 6]);

    let decoded = tokenizer.decode(&encoded, true).unwrap();
    assert_eq!(decoded.trim(), "ab c");
}

#[test]
fn test_fallback_without_prefix_space() {
    let (model_dir, _dir) = model_dir_with(&bpe_files());

    let tokenizer = BpeFallbackSource::new(false, PreTokenizerKind::ByteLevel)
        .build(&model_dir)
        .unwrap();

    assert_eq!(ids(&tokenizer, "ab c", false), vec![4, 6]);

    let with_prefix = BpeFallbackSource::default().build(&model_dir).unwrap();
    assert_eq!(ids(&with_prefix, "ab", false), vec![5]);
}

#[test]
fn test_fallback_registers_harvested_special_tokens() {
    let mut files = bpe_files();
    files.push((
        "special_tokens_map.json",
        r#"{"bos_token": "<|endoftext|>", "eos_token": "<|endoftext|>"}"#,
    ));
    files.push(("added_tokens.json", r#"["<|fim|>"]"#));
    let (model_dir, _dir) = model_dir_with(&files);

    let tokenizer = BpeFallbackSource::default().build(&model_dir).unwrap();

    assert_eq!(tokenizer.token_to_id("<|endoftext|>"), Some(7));
    assert_eq!(tokenizer.token_to_id("<|fim|>"), Some(8));
    assert_eq!(ids(&tokenizer, "<|fim|>", false), vec![8]);
}

#[test]
fn test_fallback_whitespace_pre_tokenizer() {
    let (model_dir, _dir) = model_dir_with(&bpe_files());

    let tokenizer = BpeFallbackSource::new(true, PreTokenizerKind::Whitespace)
        .build(&model_dir)
        .unwrap();

    assert_eq!(ids(&tokenizer, "ab", false), vec![4]);
    assert!(tokenizer.get_decoder().is_none());
}

#[test]
fn test_fallback_merge_out_of_vocab() {
    let (model_dir, _dir) = model_dir_with(&[("vocab.json", VOCAB), ("merges.txt", "a z\n")]);

    let err = BpeFallbackSource::default().build(&model_dir).unwrap_err();
    assert!(matches!(err, SourceError::Build { .. }));
}

#[test]
fn test_fallback_malformed_merges() {
    let (model_dir, _dir) = model_dir_with(&[("vocab.json", VOCAB), ("merges.txt", "a b c\n")]);

    let err = BpeFallbackSource::default().build(&model_dir).unwrap_err();
    assert!(matches!(err, SourceError::Vocab(_)));
    assert!(err.to_string().contains("line 1"));
}

#[test]
fn test_pretrained_requires_config_files() {
    let (model_dir, _dir) = model_dir_with(&bpe_files());

    let err = PretrainedSource::new(true).build(&model_dir).unwrap_err();
    assert!(matches!(err, SourceError::UnrecognizedModel { .. }));
}

#[test]
fn test_pretrained_gpt2() {
    let mut files = bpe_files();
    files.push((
        "tokenizer_config.json",
        r#"{"tokenizer_class": "GPT2Tokenizer", "add_prefix_space": false, "eos_token": "<|endoftext|>"}"#,
    ));
    let (model_dir, _dir) = model_dir_with(&files);

    let tokenizer = PretrainedSource::new(true).build(&model_dir).unwrap();

    assert_eq!(ids(&tokenizer, "ab c", false), vec![4, 6]);
    assert!(tokenizer.get_post_processor().is_some());
    assert_eq!(tokenizer.token_to_id("<|endoftext|>"), Some(7));
}

#[test]
fn test_pretrained_from_model_type_only() {
    let mut files = bpe_files();
    files.push(("config.json", r#"{"model_type": "gpt2", "n_layer": 2}"#));
    let (model_dir, _dir) = model_dir_with(&files);

    let tokenizer = PretrainedSource::new(true).build(&model_dir).unwrap();
    assert_eq!(tokenizer.get_vocab_size(false), 8);
}

#[test]
fn test_pretrained_qwen2_has_normalizer() {
    let mut files = bpe_files();
    files.push(("tokenizer_config.json", r#"{"tokenizer_class": "Qwen2Tokenizer"}"#));
    let (model_dir, _dir) = model_dir_with(&files);

    let tokenizer = PretrainedSource::new(true).build(&model_dir).unwrap();
    assert!(tokenizer.get_normalizer().is_some());
}

#[test]
fn test_pretrained_roberta_wraps_with_special_tokens() {
    let mut files = bpe_files();
    files.push((
        "tokenizer_config.json",
        r#"{"tokenizer_class": "RobertaTokenizer", "bos_token": "<s>", "eos_token": "</s>"}"#,
    ));
    let (model_dir, _dir) = model_dir_with(&files);

    let tokenizer = PretrainedSource::new(true).build(&model_dir).unwrap();

    assert_eq!(tokenizer.token_to_id("<s>"), Some(8));
    assert_eq!(tokenizer.token_to_id("</s>"), Some(9));
    assert_eq!(ids(&tokenizer, "ab", true), vec![8, 4, 9]);
}

#[test]
fn test_pretrained_honors_added_tokens_decoder() {
    let mut files = bpe_files();
    files.push((
        "tokenizer_config.json",
        r#"{
            "tokenizer_class": "GPT2Tokenizer",
            "added_tokens_decoder": {
                "9": {"content": "<|im_end|>", "special": true},
                "8": {"content": "<|im_start|>", "special": true}
            }
        }"#,
    ));
    let (model_dir, _dir) = model_dir_with(&files);

    let tokenizer = PretrainedSource::new(true).build(&model_dir).unwrap();

    assert_eq!(tokenizer.token_to_id("<|im_start|>"), Some(8));
    assert_eq!(tokenizer.token_to_id("<|im_end|>"), Some(9));
}

#[test]
fn test_pretrained_wordpiece() {
    let (model_dir, _dir) = model_dir_with(&[
        ("vocab.txt", WORDPIECE_VOCAB),
        (
            "tokenizer_config.json",
            r#"{"tokenizer_class": "BertTokenizer", "do_lower_case": true}"#,
        ),
    ]);

    let tokenizer = PretrainedSource::new(true).build(&model_dir).unwrap();

    let encoded = ids(&tokenizer, "Hello worlds", true);
    assert_eq!(encoded, vec![2, 4, 5, 6, 3]);
    assert_eq!(tokenizer.decode(&encoded, true).unwrap(), "hello worlds");
}

#[test]
fn test_pretrained_wordpiece_missing_vocab() {
    let (model_dir, _dir) = model_dir_with(&[(
        "tokenizer_config.json",
        r#"{"tokenizer_class": "BertTokenizerFast"}"#,
    )]);

    let err = PretrainedSource::new(true).build(&model_dir).unwrap_err();
    match err {
        SourceError::MissingFiles { files, .. } => assert_eq!(files, vec!["vocab.txt"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_pretrained_sentencepiece_unsupported() {
    let (model_dir, _dir) = model_dir_with(&[
        ("tokenizer.model", "binary"),
        ("tokenizer_config.json", r#"{"tokenizer_class": "LlamaTokenizer"}"#),
    ]);

    let err = PretrainedSource::new(true).build(&model_dir).unwrap_err();
    assert!(matches!(
        err,
        SourceError::Unsupported {
            requirement: "SentencePiece",
            ..
        }
    ));
    assert!(err.to_string().contains("SentencePiece"));
}

#[test]
fn test_pretrained_bpe_class_with_only_sentencepiece_model() {
    let (model_dir, _dir) = model_dir_with(&[
        ("tokenizer.model", "binary"),
        ("config.json", r#"{"model_type": "gpt2"}"#),
    ]);

    let err = PretrainedSource::new(true).build(&model_dir).unwrap_err();
    assert!(err.to_string().contains("SentencePiece"));
}

#[test]
fn test_pretrained_remote_tiktoken() {
    let (model_dir, _dir) = model_dir_with(&[
        ("qwen.tiktoken", "IQ== 0\n"),
        (
            "tokenizer_config.json",
            r#"{"auto_map": {"AutoTokenizer": ["tokenization_qwen.QWenTokenizer", null]}}"#,
        ),
    ]);

    let err = PretrainedSource::new(true).build(&model_dir).unwrap_err();
    assert!(err.to_string().contains("tiktoken"));

    let err = PretrainedSource::new(false).build(&model_dir).unwrap_err();
    assert!(matches!(
        err,
        SourceError::Resolve(ResolveError::RemoteCodeNotTrusted { .. })
    ));
}

#[test]
fn test_pretrained_missing_merges() {
    let (model_dir, _dir) = model_dir_with(&[
        ("vocab.json", VOCAB),
        ("tokenizer_config.json", r#"{"tokenizer_class": "GPT2Tokenizer"}"#),
    ]);

    let err = PretrainedSource::new(true).build(&model_dir).unwrap_err();
    assert!(matches!(err, SourceError::MissingFiles { .. }));
    assert!(err.to_string().contains("merges.txt"));
}

#[test]
fn test_pretrained_roberta_missing_special_tokens() {
    let mut files = bpe_files();
    files.push(("tokenizer_config.json", r#"{"tokenizer_class": "RobertaTokenizer"}"#));
    let (model_dir, _dir) = model_dir_with(&files);

    let err = PretrainedSource::new(true).build(&model_dir).unwrap_err();
    assert!(matches!(err, SourceError::MissingSpecialToken { .. }));
}

#[test]
fn test_pretrained_invalid_config_json() {
    let mut files = bpe_files();
    files.push(("tokenizer_config.json", "{oops"));
    let (model_dir, _dir) = model_dir_with(&files);

    let err = PretrainedSource::new(true).build(&model_dir).unwrap_err();
    assert!(matches!(err, SourceError::ModelDir(_)));
}
