//! Tokforge command-line entrypoint.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap::builder::BoolishValueParser;
use clap::error::ErrorKind;
use mimalloc::MiMalloc;
use tracing_subscriber::EnvFilter;

use tokforge::constants::{
    EXIT_CONFIG, EXIT_GENERATION_FAILED, EXIT_NOT_A_DIRECTORY, EXIT_SUCCESS, EXIT_USAGE,
    MERGES_TXT, VOCAB_JSON,
};
use tokforge::hashing::short_digest;
use tokforge::{
    Config, GenerateError, Generator, ModelDir, ModelDirError, Outcome, PreTokenizerKind,
    RemediationContext, hints, install_help, targeted_hints,
};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Generate a fast-tokenizer `tokenizer.json` for a model directory.
#[derive(Parser, Debug)]
#[command(name = "tokforge", version, about)]
struct Cli {
    /// Model directory to inspect and write into.
    model_dir: PathBuf,

    /// Artifact file name inside the model directory.
    #[arg(long, value_name = "NAME")]
    output: Option<String>,

    /// Regenerate even when the artifact already exists.
    #[arg(long)]
    force: bool,

    /// Do not build a BPE tokenizer from vocab.json + merges.txt when loading fails.
    #[arg(long)]
    no_fallback: bool,

    /// Refuse tokenizer classes declared through auto_map.
    #[arg(long)]
    no_trust_remote_code: bool,

    /// add_prefix_space for the fallback's byte-level pre-tokenizer.
    #[arg(long, value_name = "BOOL", value_parser = BoolishValueParser::new())]
    prefix_space: Option<bool>,

    /// Pre-tokenizer installed by the fallback.
    #[arg(long, value_enum, value_name = "KIND")]
    pre_tokenizer: Option<PreTokenizerKind>,

    /// Write compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,

    /// Skip reloading the written artifact.
    #[arg(long)]
    no_verify: bool,
}

impl Cli {
    /// Applies flags on top of the environment-derived configuration.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(name) = &self.output {
            config.output_name = name.clone();
        }
        if let Some(prefix_space) = self.prefix_space {
            config.add_prefix_space = prefix_space;
        }
        if let Some(kind) = self.pre_tokenizer {
            config.pre_tokenizer = kind;
        }
        config.force |= self.force;
        config.fallback &= !self.no_fallback;
        config.trust_remote_code &= !self.no_trust_remote_code;
        config.pretty &= !self.compact;
        config.verify &= !self.no_verify;
        config
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::from(EXIT_SUCCESS);
        }
        Err(e) => {
            let _ = e.print();
            eprintln!("\n{}", install_help());
            return ExitCode::from(EXIT_USAGE);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(EXIT_GENERATION_FAILED)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    let config = match Config::from_env()
        .map(|c| cli.apply(c))
        .and_then(|c| c.validate().map(|()| c))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return Ok(EXIT_CONFIG);
        }
    };

    let model_dir = match ModelDir::open_with_output(&cli.model_dir, &config.output_name) {
        Ok(dir) => dir,
        Err(ModelDirError::NotADirectory { path }) => {
            println!("Given path is not a directory: {}", path.display());
            return Ok(EXIT_NOT_A_DIRECTORY);
        }
        Err(e) => {
            println!("Cannot open model directory {}: {e}", cli.model_dir.display());
            return Ok(EXIT_NOT_A_DIRECTORY);
        }
    };

    let generator = Generator::new(config);
    let config = generator.config();

    tracing::info!(
        model_dir = %model_dir.root().display(),
        output = %config.output_name,
        sources = ?generator.source_names(),
        trust_remote_code = config.trust_remote_code,
        "tokforge starting"
    );

    let context = RemediationContext::new(
        model_dir.root(),
        config.fallback,
        model_dir.has(VOCAB_JSON) && model_dir.has(MERGES_TXT),
    );

    let outcome = match generator.run(&model_dir) {
        Ok(outcome) => outcome,
        Err(GenerateError::Exhausted { attempts }) => {
            for attempt in &attempts {
                println!("Source failed: {attempt}");
            }
            println!(
                "\nCould not generate {}. Suggestions:",
                model_dir.output_path().display()
            );
            for hint in hints(&attempts, &context) {
                println!("{hint}");
            }
            return Ok(EXIT_GENERATION_FAILED);
        }
        Err(e) => return Err(e).context("failed to write tokenizer"),
    };

    match outcome {
        Outcome::AlreadyPresent { path } => {
            println!("{} already exists (nothing to generate)", path.display());
        }
        Outcome::Generated(artifact) => {
            for attempt in &artifact.attempts {
                println!("Source failed, continuing: {attempt}");
            }
            for hint in targeted_hints(&artifact.attempts, &context) {
                println!("{hint}");
            }
            println!(
                "Generated {} via {} (vocab size {}, {} added tokens, {} bytes, blake3 {}, {})",
                artifact.path.display(),
                artifact.source,
                artifact.vocab_size,
                artifact.added_tokens,
                artifact.bytes,
                short_digest(&artifact.digest, 12),
                if artifact.verified { "verified" } else { "not verified" },
            );
        }
    }

    Ok(EXIT_SUCCESS)
}
