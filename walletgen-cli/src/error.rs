//! Error handling for the command-line generator

use thiserror::Error;

/// Errors raised outside the wallet library itself
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Wallet #{index} failed: {source}")]
    Generation {
        index: usize,
        #[source]
        source: walletgen::Error,
    },

    #[error("Batch execution failed: {0}")]
    Batch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convert a configuration problem into a `CliError`
pub fn invalid_config(message: impl Into<String>) -> CliError {
    CliError::InvalidConfig(message.into())
}
