//! Mnemonic phrase encoding and seed derivation (BIP-39)

use std::fmt;

use tracing::debug;
use zeroize::Zeroizing;

use crate::crypto::entropy::{Entropy, EntropySize};
use crate::error::{Error, Result};

/// Passphrase used for every generated wallet
pub const DEFAULT_PASSPHRASE: &str = "";

/// Length of a BIP-39 seed in bytes
pub const SEED_LEN: usize = 64;

/// A checksummed English mnemonic phrase
#[derive(Clone, PartialEq, Eq)]
pub struct Mnemonic {
    inner: bip39::Mnemonic,
}

impl Mnemonic {
    /// Parse and validate a phrase
    pub fn parse(phrase: &str) -> Result<Self> {
        let inner = bip39::Mnemonic::parse(phrase).map_err(map_bip39_error)?;
        Ok(Self { inner })
    }

    /// The words joined by single spaces
    pub fn phrase(&self) -> String {
        self.inner.to_string()
    }

    pub fn word_count(&self) -> usize {
        self.inner.word_count()
    }

    /// Recover the entropy this phrase encodes
    pub fn to_entropy(&self) -> Result<Entropy> {
        let bytes = Zeroizing::new(self.inner.to_entropy());
        Entropy::from_bytes(&bytes)
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mnemonic")
            .field("words", &self.word_count())
            .finish_non_exhaustive()
    }
}

/// 512-bit BIP-39 seed, wiped from memory on drop
#[derive(Clone, PartialEq, Eq)]
pub struct Seed {
    bytes: Zeroizing<[u8; SEED_LEN]>,
}

impl Seed {
    pub fn new(bytes: [u8; SEED_LEN]) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..]
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

/// Encode entropy as a mnemonic phrase
pub fn encode(entropy: &Entropy) -> Result<Mnemonic> {
    let inner = bip39::Mnemonic::from_entropy(entropy.as_bytes()).map_err(map_bip39_error)?;
    debug!(words = inner.word_count(), "encoded mnemonic");
    Ok(Mnemonic { inner })
}

/// Decode a mnemonic phrase back into its entropy
pub fn decode(phrase: &str) -> Result<Entropy> {
    Mnemonic::parse(phrase)?.to_entropy()
}

/// Stretch a mnemonic and passphrase into a seed (PBKDF2-HMAC-SHA512, 2048 rounds)
pub fn to_seed(mnemonic: &Mnemonic, passphrase: &str) -> Seed {
    Seed::new(mnemonic.inner.to_seed(passphrase))
}

/// Validate a mnemonic phrase
pub fn validate_mnemonic(phrase: &str) -> Result<EntropySize> {
    Ok(decode(phrase)?.size())
}

fn map_bip39_error(err: bip39::Error) -> Error {
    match err {
        bip39::Error::InvalidChecksum => Error::ChecksumMismatch,
        bip39::Error::BadEntropyBitCount(bits) => Error::InvalidEntropySize(bits),
        other => Error::InvalidMnemonic(other.to_string()),
    }
}
