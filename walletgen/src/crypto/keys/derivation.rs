//! Derivation paths for the four supported address standards
//!
//! Every wallet uses the same shape, `purpose' / 0' / 0' / 0 / 0`: coin type
//! 0 (bitcoin), the first account, the external chain, and the first address.
//! Only the purpose varies.

use std::fmt;
use std::str::FromStr;

use secp256k1::Secp256k1;
use tracing::trace;

use super::extended::{ExtendedKey, HARDENED_OFFSET};
use crate::error::{Error, Result, Stage};

/// Purpose level of a BIP-43 path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Purpose {
    /// Legacy P2PKH
    Bip44,
    /// P2WPKH nested in P2SH
    Bip49,
    /// Native P2WPKH
    Bip84,
    /// Key-path-only P2TR
    Bip86,
}

impl Purpose {
    pub const ALL: [Purpose; 4] = [Self::Bip44, Self::Bip49, Self::Bip84, Self::Bip86];

    pub fn number(&self) -> u32 {
        match self {
            Self::Bip44 => 44,
            Self::Bip49 => 49,
            Self::Bip84 => 84,
            Self::Bip86 => 86,
        }
    }

    pub fn from_number(number: u32) -> Result<Self> {
        match number {
            44 => Ok(Self::Bip44),
            49 => Ok(Self::Bip49),
            84 => Ok(Self::Bip84),
            86 => Ok(Self::Bip86),
            other => Err(Error::UnsupportedPurpose(other)),
        }
    }
}

/// One level of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathLevel {
    Purpose,
    CoinType,
    Account,
    Change,
    AddressIndex,
}

impl fmt::Display for PathLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Purpose => "purpose",
            Self::CoinType => "coin type",
            Self::Account => "account",
            Self::Change => "change",
            Self::AddressIndex => "address index",
        })
    }
}

/// A child number, hardened or not
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildIndex {
    Normal(u32),
    Hardened(u32),
}

impl ChildIndex {
    /// The raw BIP-32 index, with the hardened bit set where applicable
    pub fn to_u32(&self) -> u32 {
        match self {
            Self::Normal(index) => *index,
            Self::Hardened(index) => index | HARDENED_OFFSET,
        }
    }

    pub fn from_u32(raw: u32) -> Self {
        if raw >= HARDENED_OFFSET {
            Self::Hardened(raw - HARDENED_OFFSET)
        } else {
            Self::Normal(raw)
        }
    }

    pub fn is_hardened(&self) -> bool {
        matches!(self, Self::Hardened(_))
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(index) => write!(f, "{}", index),
            Self::Hardened(index) => write!(f, "{}'", index),
        }
    }
}

/// `purpose' / coin_type' / account' / change / address_index`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivationPath {
    purpose: Purpose,
}

impl DerivationPath {
    const COIN_TYPE: u32 = 0;
    const ACCOUNT: u32 = 0;
    const CHANGE: u32 = 0;
    const ADDRESS_INDEX: u32 = 0;

    /// The first receiving address path for `purpose`
    pub fn account(purpose: Purpose) -> Self {
        Self { purpose }
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    /// The five levels in derivation order
    pub fn levels(&self) -> [(PathLevel, ChildIndex); 5] {
        [
            (PathLevel::Purpose, ChildIndex::Hardened(self.purpose.number())),
            (PathLevel::CoinType, ChildIndex::Hardened(Self::COIN_TYPE)),
            (PathLevel::Account, ChildIndex::Hardened(Self::ACCOUNT)),
            (PathLevel::Change, ChildIndex::Normal(Self::CHANGE)),
            (PathLevel::AddressIndex, ChildIndex::Normal(Self::ADDRESS_INDEX)),
        ]
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for (_, index) in self.levels() {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    /// Accepts only `m/<purpose>'/0'/0'/0/0` with a supported purpose
    fn from_str(path: &str) -> Result<Self> {
        let invalid = || Error::InvalidPath(path.to_string());

        let components = path.strip_prefix("m/").ok_or_else(invalid)?;

        let mut indices = Vec::with_capacity(5);
        for component in components.split('/') {
            let index = match component.strip_suffix('\'').or_else(|| component.strip_suffix('h')) {
                Some(hardened) => ChildIndex::Hardened(hardened.parse::<u32>().map_err(|_| invalid())?),
                None => ChildIndex::Normal(component.parse::<u32>().map_err(|_| invalid())?),
            };
            indices.push(index);
        }

        let purpose = match indices.first() {
            Some(ChildIndex::Hardened(number)) => Purpose::from_number(*number)?,
            _ => return Err(invalid()),
        };

        let expected = Self::account(purpose);
        let matches = expected
            .levels()
            .iter()
            .map(|(_, index)| *index)
            .eq(indices.iter().copied());
        if !matches {
            return Err(invalid());
        }

        Ok(expected)
    }
}

/// Walk `path` from `root`, tagging any failure with the level it happened at
pub fn derive_path(root: &ExtendedKey, path: &DerivationPath) -> Result<ExtendedKey> {
    let secp = Secp256k1::new();
    let mut key = root.clone();

    for (level, index) in path.levels() {
        key = key
            .derive_child_in(&secp, index.to_u32())
            .map_err(|e| e.at(Stage::PathLevel(level)))?;
    }

    trace!(%path, "derived leaf key");
    Ok(key)
}

/// Derive the leaf key at `purpose'/0'/0'/0/0` from the master key
pub fn derive_account_path(master: &ExtendedKey, purpose: Purpose) -> Result<ExtendedKey> {
    derive_path(master, &DerivationPath::account(purpose))
}
