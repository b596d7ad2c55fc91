//! Entropy generation

use std::fmt;

use rand::{rngs::OsRng, RngCore};
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Supported entropy strengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntropySize {
    /// 12 words
    Bits128,
    /// 15 words
    Bits160,
    /// 18 words
    Bits192,
    /// 21 words
    Bits224,
    /// 24 words
    Bits256,
}

impl EntropySize {
    pub const ALL: [EntropySize; 5] = [
        Self::Bits128,
        Self::Bits160,
        Self::Bits192,
        Self::Bits224,
        Self::Bits256,
    ];

    /// Parse a bit size, rejecting anything outside the five standard sizes
    pub fn from_bits(bits: usize) -> Result<Self> {
        match bits {
            128 => Ok(Self::Bits128),
            160 => Ok(Self::Bits160),
            192 => Ok(Self::Bits192),
            224 => Ok(Self::Bits224),
            256 => Ok(Self::Bits256),
            other => Err(Error::InvalidEntropySize(other)),
        }
    }

    pub fn bits(&self) -> usize {
        match self {
            Self::Bits128 => 128,
            Self::Bits160 => 160,
            Self::Bits192 => 192,
            Self::Bits224 => 224,
            Self::Bits256 => 256,
        }
    }

    /// Get entropy length in bytes
    pub fn bytes(&self) -> usize {
        self.bits() / 8
    }

    /// Number of mnemonic words this strength encodes to
    pub fn word_count(&self) -> usize {
        self.bits() / 32 * 3
    }
}

/// Raw wallet entropy, wiped from memory on drop
#[derive(Clone, PartialEq, Eq)]
pub struct Entropy {
    bytes: Zeroizing<Vec<u8>>,
    size: EntropySize,
}

impl Entropy {
    /// Wrap existing bytes; the length must be one of the standard sizes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let size = EntropySize::from_bits(bytes.len() * 8)?;
        Ok(Self {
            bytes: Zeroizing::new(bytes.to_vec()),
            size,
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn size(&self) -> EntropySize {
        self.size
    }
}

impl fmt::Debug for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entropy")
            .field("size", &self.size)
            .field("bytes", &"<redacted>")
            .finish()
    }
}

/// Draw fresh entropy of `bits` bits from the operating system RNG
pub fn generate(bits: usize) -> Result<Entropy> {
    let size = EntropySize::from_bits(bits)?;
    generate_with_size(size)
}

/// Draw fresh entropy of a known-valid size
pub fn generate_with_size(size: EntropySize) -> Result<Entropy> {
    let mut bytes = Zeroizing::new(vec![0u8; size.bytes()]);
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| Error::EntropyGenerationFailed(e.to_string()))?;

    debug!(bits = size.bits(), "generated entropy");
    Ok(Entropy { bytes, size })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_all_sizes() {
        for size in EntropySize::ALL {
            let entropy = generate(size.bits()).unwrap();
            assert_eq!(entropy.as_bytes().len(), size.bytes());
            assert_eq!(entropy.size(), size);
        }
    }

    #[test]
    fn test_invalid_size() {
        for bits in [0, 64, 127, 129, 512] {
            assert!(matches!(generate(bits), Err(Error::InvalidEntropySize(b)) if b == bits));
        }
        assert!(matches!(
            Entropy::from_bytes(&[0u8; 17]),
            Err(Error::InvalidEntropySize(136))
        ));
    }

    #[test]
    fn test_draws_are_independent() {
        let a = generate(256).unwrap();
        let b = generate(256).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_debug_is_redacted() {
        let entropy = Entropy::from_bytes(&[0xab; 16]).unwrap();
        let printed = format!("{:?}", entropy);
        assert!(!printed.contains("171"));
        assert!(!printed.contains("ab"));
        assert!(printed.contains("redacted"));
    }

    #[test]
    fn test_word_counts() {
        let counts: Vec<usize> = EntropySize::ALL.iter().map(|s| s.word_count()).collect();
        assert_eq!(counts, vec![12, 15, 18, 21, 24]);
    }
}
