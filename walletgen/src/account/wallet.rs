//! Wallet generation and address derivation

use tracing::{debug, instrument};

use super::address::{self, Address, AddressFormat, AddressSet};
use crate::crypto::entropy::{self, Entropy};
use crate::crypto::keys::{derive_account_path, ExtendedKey};
use crate::crypto::mnemonic::{self, Mnemonic, Seed, DEFAULT_PASSPHRASE};
use crate::error::{Result, Stage};
use crate::network::NetworkParams;

/// An in-memory HD wallet: entropy, its mnemonic, the seed and master key
///
/// Nothing here is ever written to disk by this crate.
#[derive(Debug, Clone)]
pub struct Wallet {
    entropy: Entropy,
    mnemonic: Mnemonic,
    seed: Seed,
    master: ExtendedKey,
}

impl Wallet {
    /// Generate a wallet from fresh entropy of `bits` bits
    #[instrument(level = "debug")]
    pub fn generate(bits: usize) -> Result<Self> {
        let entropy = entropy::generate(bits).map_err(|e| e.at(Stage::Entropy))?;
        Self::from_entropy(entropy)
    }

    /// Build a wallet from known entropy
    ///
    /// The passphrase is always empty.
    pub fn from_entropy(entropy: Entropy) -> Result<Self> {
        let mnemonic = mnemonic::encode(&entropy).map_err(|e| e.at(Stage::Mnemonic))?;
        let seed = mnemonic::to_seed(&mnemonic, DEFAULT_PASSPHRASE);
        let master = ExtendedKey::master(&seed).map_err(|e| e.at(Stage::MasterKey))?;

        debug!(words = mnemonic.word_count(), "wallet created");
        Ok(Self {
            entropy,
            mnemonic,
            seed,
            master,
        })
    }

    /// The mnemonic words joined by spaces
    pub fn mnemonic(&self) -> String {
        self.mnemonic.phrase()
    }

    pub fn mnemonic_ref(&self) -> &Mnemonic {
        &self.mnemonic
    }

    pub fn entropy(&self) -> &Entropy {
        &self.entropy
    }

    pub fn seed(&self) -> &Seed {
        &self.seed
    }

    pub fn master_key(&self) -> &ExtendedKey {
        &self.master
    }

    /// Derive the leaf key for `format` and encode its address
    pub fn derive_address(&self, format: AddressFormat, network: &NetworkParams) -> Result<Address> {
        let leaf = derive_account_path(&self.master, format.purpose())
            .map_err(|e| e.at(Stage::Derivation(format)))?;

        address::encode(format, &leaf.public_key(), network).map_err(|e| e.at(Stage::Encoding(format)))
    }

    /// Derive one address in each of the four formats
    ///
    /// The four derivations are independent; an `InvalidChildKey` on one of
    /// the fixed paths is reported, not retried with the next index.
    #[instrument(level = "debug", skip(self))]
    pub fn derive_all_addresses(&self, network: &NetworkParams) -> Result<AddressSet> {
        Ok(AddressSet {
            legacy: self.derive_address(AddressFormat::Legacy, network)?,
            nested_segwit: self.derive_address(AddressFormat::NestedSegwit, network)?,
            native_segwit: self.derive_address(AddressFormat::NativeSegwit, network)?,
            taproot: self.derive_address(AddressFormat::Taproot, network)?,
        })
    }
}

/// Generate a wallet from fresh entropy of `bits` bits
pub fn generate_wallet(bits: usize) -> Result<Wallet> {
    Wallet::generate(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_generate_wallet() {
        let wallet = generate_wallet(128).unwrap();

        assert_eq!(wallet.mnemonic().split_whitespace().count(), 12);
        assert_eq!(wallet.seed().as_bytes().len(), 64);
        assert_eq!(wallet.master_key().depth(), 0);
    }

    #[test]
    fn test_generate_wallet_bad_size() {
        let err = generate_wallet(100).unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Entropy));
        assert!(matches!(err.root(), Error::InvalidEntropySize(100)));
    }

    #[test]
    fn test_mnemonic_matches_entropy() {
        let wallet = generate_wallet(256).unwrap();
        let decoded = mnemonic::decode(&wallet.mnemonic()).unwrap();

        assert_eq!(decoded.as_bytes(), wallet.entropy().as_bytes());
    }

    #[test]
    fn test_addresses_have_their_format() {
        let wallet = generate_wallet(160).unwrap();
        let addresses = wallet.derive_all_addresses(&NetworkParams::MAINNET).unwrap();

        for format in AddressFormat::ALL {
            assert_eq!(addresses.get(format).format(), format);
        }
    }
}
