use super::*;
use serial_test::serial;
use std::env;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_tokforge_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var(Config::ENV_OUTPUT_NAME);
        env::remove_var(Config::ENV_TRUST_REMOTE_CODE);
        env::remove_var(Config::ENV_FALLBACK);
        env::remove_var(Config::ENV_ADD_PREFIX_SPACE);
        env::remove_var(Config::ENV_PRE_TOKENIZER);
        env::remove_var(Config::ENV_PRETTY);
        env::remove_var(Config::ENV_FORCE);
        env::remove_var(Config::ENV_VERIFY);
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.output_name, "tokenizer.json");
    assert!(config.trust_remote_code);
    assert!(config.fallback);
    assert!(config.add_prefix_space);
    assert_eq!(config.pre_tokenizer, PreTokenizerKind::ByteLevel);
    assert!(config.pretty);
    assert!(!config.force);
    assert!(config.verify);
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_tokforge_env();

    let config = Config::from_env().expect("should parse with defaults");
    assert_eq!(config, Config::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_tokforge_env();

    with_env_vars(
        &[
            ("TOKFORGE_OUTPUT_NAME", "tok.json"),
            ("TOKFORGE_TRUST_REMOTE_CODE", "no"),
            ("TOKFORGE_FALLBACK", "0"),
            ("TOKFORGE_ADD_PREFIX_SPACE", "OFF"),
            ("TOKFORGE_PRE_TOKENIZER", "whitespace"),
            ("TOKFORGE_PRETTY", "false"),
            ("TOKFORGE_FORCE", "yes"),
            ("TOKFORGE_VERIFY", "False"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(config.output_name, "tok.json");
            assert!(!config.trust_remote_code);
            assert!(!config.fallback);
            assert!(!config.add_prefix_space);
            assert_eq!(config.pre_tokenizer, PreTokenizerKind::Whitespace);
            assert!(!config.pretty);
            assert!(config.force);
            assert!(!config.verify);
        },
    );
}

#[test]
#[serial]
fn test_from_env_blank_output_name_uses_default() {
    clear_tokforge_env();

    with_env_vars(&[("TOKFORGE_OUTPUT_NAME", "   ")], || {
        let config = Config::from_env().expect("should parse");
        assert_eq!(config.output_name, "tokenizer.json");
    });
}

#[test]
#[serial]
fn test_invalid_bool() {
    clear_tokforge_env();

    with_env_vars(&[("TOKFORGE_FORCE", "maybe")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidBool {
                name: "TOKFORGE_FORCE",
                ..
            }
        ));
        assert!(err.to_string().contains("maybe"));
    });
}

#[test]
#[serial]
fn test_invalid_pre_tokenizer() {
    clear_tokforge_env();

    with_env_vars(&[("TOKFORGE_PRE_TOKENIZER", "metaspace")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPreTokenizer { .. }));
        assert!(err.to_string().contains("metaspace"));
    });
}

#[test]
fn test_validate_defaults() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_rejects_bad_output_names() {
    for name in ["", "  ", "../tokenizer.json", "sub/tokenizer.json", "..", "tokenizer.txt"] {
        let config = Config {
            output_name: name.to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidOutputName { .. }),
            "expected rejection for {name:?}"
        );
    }
}

#[test]
fn test_parse_bool_spellings() {
    assert_eq!(parse_bool("TRUE"), Some(true));
    assert_eq!(parse_bool(" on "), Some(true));
    assert_eq!(parse_bool("0"), Some(false));
    assert_eq!(parse_bool("No"), Some(false));
    assert_eq!(parse_bool(""), None);
}

#[test]
fn test_pre_tokenizer_display() {
    assert_eq!(PreTokenizerKind::ByteLevel.to_string(), "byte-level");
    assert_eq!(PreTokenizerKind::Whitespace.to_string(), "whitespace");
}
