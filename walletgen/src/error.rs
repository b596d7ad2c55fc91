//! Error types for the walletgen library

use std::fmt;

use thiserror::Error;

use crate::account::AddressFormat;
use crate::crypto::keys::PathLevel;

/// Step of the wallet pipeline a failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Entropy,
    Mnemonic,
    Seed,
    MasterKey,
    /// One level of a derivation path
    PathLevel(PathLevel),
    Derivation(AddressFormat),
    Encoding(AddressFormat),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entropy => f.write_str("entropy generation"),
            Self::Mnemonic => f.write_str("mnemonic encoding"),
            Self::Seed => f.write_str("seed derivation"),
            Self::MasterKey => f.write_str("master key derivation"),
            Self::PathLevel(level) => write!(f, "{} derivation", level),
            Self::Derivation(format) => write!(f, "{} key derivation", format),
            Self::Encoding(format) => write!(f, "{} address encoding", format),
        }
    }
}

/// Custom error type for walletgen operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid entropy size: {0} bits (expected 128, 160, 192, 224 or 256)")]
    InvalidEntropySize(usize),

    #[error("Entropy generation failed: {0}")]
    EntropyGenerationFailed(String),

    #[error("Mnemonic checksum mismatch")]
    ChecksumMismatch,

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Invalid child key at index {0:#010x}")]
    InvalidChildKey(u32),

    #[error("Hardened child {0:#010x} cannot be derived from a public key")]
    HardenedDerivationFromPublic(u32),

    #[error("Unsupported purpose: {0}")]
    UnsupportedPurpose(u32),

    #[error("Unsupported network: {0}")]
    UnsupportedNetwork(String),

    #[error("Address encoding failed: {0}")]
    AddressEncodingFailed(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("{stage} failed: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with the stage it happened in
    pub fn at(self, stage: Stage) -> Self {
        Self::Stage {
            stage,
            source: Box::new(self),
        }
    }

    /// The innermost error, with all stage tags removed
    pub fn root(&self) -> &Error {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// The outermost stage tag, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result type for walletgen operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_unwraps_nested_stages() {
        let err = Error::ChecksumMismatch
            .at(Stage::Mnemonic)
            .at(Stage::Derivation(AddressFormat::Taproot));

        assert!(matches!(err.root(), Error::ChecksumMismatch));
        assert_eq!(err.stage(), Some(Stage::Derivation(AddressFormat::Taproot)));
    }

    #[test]
    fn test_stage_message() {
        let err = Error::InvalidSeed("zero key".to_string()).at(Stage::MasterKey);
        assert_eq!(err.to_string(), "master key derivation failed: Invalid seed: zero key");
    }
}
