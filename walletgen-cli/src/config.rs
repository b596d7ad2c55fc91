//! Generator configuration
//!
//! Values come from the environment first (`WALLETGEN_*`), then from
//! command-line flags, which win.

use std::path::PathBuf;

use clap::ValueEnum;
use walletgen::crypto::EntropySize;
use walletgen::NetworkParams;

use crate::error::{invalid_config, CliError};

pub const BITS_VAR: &str = "WALLETGEN_BITS";
pub const COUNT_VAR: &str = "WALLETGEN_COUNT";
pub const WORKERS_VAR: &str = "WALLETGEN_WORKERS";

const DEFAULT_BITS: usize = 128;
const DEFAULT_COUNT: usize = 1;

/// How generated wallets are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Labelled lines, one block per wallet
    Text,
    /// One row per wallet with a header
    Csv,
    /// A JSON array
    Json,
}

/// What to do when one wallet in a batch fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ErrorPolicy {
    /// Abort the whole batch
    #[default]
    Halt,
    /// Report the failure and keep going
    Skip,
}

/// Batch generation settings
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub bits: usize,
    pub count: usize,
    pub workers: usize,
    pub out: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub on_error: ErrorPolicy,
    pub network: NetworkParams,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            bits: DEFAULT_BITS,
            count: DEFAULT_COUNT,
            workers: default_workers(),
            out: None,
            format: None,
            on_error: ErrorPolicy::default(),
            network: NetworkParams::MAINNET,
        }
    }
}

impl GeneratorConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let defaults = Self::default();

        Ok(Self {
            bits: parse_var(&lookup, BITS_VAR, defaults.bits)?,
            count: parse_var(&lookup, COUNT_VAR, defaults.count)?,
            workers: parse_var(&lookup, WORKERS_VAR, defaults.workers)?,
            ..defaults
        })
    }

    /// The explicit format, else CSV when writing to a file and text otherwise
    pub fn output_format(&self) -> OutputFormat {
        match (self.format, &self.out) {
            (Some(format), _) => format,
            (None, Some(_)) => OutputFormat::Csv,
            (None, None) => OutputFormat::Text,
        }
    }

    /// Reject settings that would fail or do nothing, before any work starts
    pub fn validate(&self) -> Result<(), CliError> {
        EntropySize::from_bits(self.bits).map_err(|e| invalid_config(e.to_string()))?;

        if self.count == 0 {
            return Err(invalid_config("count must be at least 1"));
        }
        if self.workers == 0 {
            return Err(invalid_config("workers must be at least 1"));
        }
        Ok(())
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: usize) -> Result<usize, CliError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| invalid_config(format!("{} must be a non-negative integer, got {:?}", key, value))),
        None => Ok(default),
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4)
}
