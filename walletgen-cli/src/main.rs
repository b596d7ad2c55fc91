//! walletgen command-line generator
//!
//! Generates a batch of Bitcoin HD wallets and prints, for each, the mnemonic
//! and the first receiving address in all four supported formats.

mod batch;
mod config;
mod error;
mod output;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{ErrorPolicy, GeneratorConfig, OutputFormat};

#[derive(Parser)]
#[command(name = "walletgen")]
#[command(about = "Generate Bitcoin HD wallets with legacy, SegWit and Taproot addresses")]
#[command(version)]
struct Cli {
    /// Entropy size in bits: 128, 160, 192, 224 or 256 [env: WALLETGEN_BITS]
    #[arg(long)]
    bits: Option<usize>,

    /// Number of wallets to generate [env: WALLETGEN_COUNT]
    #[arg(long)]
    count: Option<usize>,

    /// Write the wallets to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,

    /// Output format (defaults to csv with --out, text otherwise)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// What to do when a wallet fails to generate
    #[arg(long, value_enum, default_value_t = ErrorPolicy::Halt)]
    on_error: ErrorPolicy,

    /// Maximum wallets generated concurrently [env: WALLETGEN_WORKERS]
    #[arg(long)]
    workers: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Layer the flags over the environment configuration
    fn into_config(self) -> Result<GeneratorConfig, error::CliError> {
        let mut config = GeneratorConfig::from_env()?;

        if let Some(bits) = self.bits {
            config.bits = bits;
        }
        if let Some(count) = self.count {
            config.count = count;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        config.out = self.out;
        config.format = self.format;
        config.on_error = self.on_error;

        config.validate()?;
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("walletgen=debug,walletgen_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // Logs go to stderr so stdout carries only wallet output
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.into_config().context("invalid configuration")?;
    info!(
        bits = config.bits,
        count = config.count,
        workers = config.workers,
        "walletgen v{}",
        walletgen::VERSION
    );

    let report = batch::run_batch(&config).await.context("wallet generation failed")?;
    output::report_skipped(&report.skipped);
    output::emit(&config, &report.wallets).context("failed to write wallets")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "walletgen",
            "--bits",
            "256",
            "--count",
            "3",
            "--format",
            "json",
            "--on-error",
            "skip",
        ])
        .unwrap();

        assert_eq!(cli.bits, Some(256));
        assert_eq!(cli.count, Some(3));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.on_error, ErrorPolicy::Skip);
        assert!(cli.out.is_none());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["walletgen"]).unwrap();

        assert_eq!(cli.bits, None);
        assert_eq!(cli.on_error, ErrorPolicy::Halt);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["walletgen", "--format", "xml"]).is_err());
    }
}
