//! BIP-32 extended keys

use std::fmt;

use secp256k1::{All, PublicKey, Scalar, Secp256k1, SecretKey};
use tracing::trace;
use zeroize::Zeroizing;

use crate::crypto::hash::{hash160, hmac_sha512};
use crate::crypto::mnemonic::Seed;
use crate::error::{Error, Result};

/// Index offset for hardened children (2^31)
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

// Mainnet serialization versions
const XPRV_VERSION: [u8; 4] = [0x04, 0x88, 0xAD, 0xE4];
const XPUB_VERSION: [u8; 4] = [0x04, 0x88, 0xB2, 0x1E];
const SERIALIZED_LEN: usize = 78;

/// The key half of an extended key
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum KeyMaterial {
    /// Can derive hardened and normal children
    Private(SecretKey),
    /// Can derive normal children only
    Public(PublicKey),
}

/// A node in the HD tree
#[derive(Clone, PartialEq, Eq)]
pub struct ExtendedKey {
    key: KeyMaterial,
    chain_code: [u8; 32],
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_index: u32,
}

impl ExtendedKey {
    /// Derive the master key from a BIP-39 seed
    pub fn master(seed: &Seed) -> Result<Self> {
        Self::master_from_bytes(seed.as_bytes())
    }

    /// Derive the master key from raw seed bytes (16 to 64 bytes)
    pub fn master_from_bytes(seed: &[u8]) -> Result<Self> {
        if !(16..=64).contains(&seed.len()) {
            return Err(Error::InvalidSeed(format!(
                "seed must be 16 to 64 bytes, got {}",
                seed.len()
            )));
        }

        let i = Zeroizing::new(hmac_sha512(MASTER_HMAC_KEY, seed)?);
        let secret_key = SecretKey::from_slice(&i[..32]).map_err(|_| {
            Error::InvalidSeed("master key is zero or not below the curve order".to_string())
        })?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);

        Ok(Self {
            key: KeyMaterial::Private(secret_key),
            chain_code,
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_index: 0,
        })
    }

    /// Derive the child at `index`; indices from 2^31 up are hardened
    pub fn derive_child(&self, index: u32) -> Result<Self> {
        self.derive_child_in(&Secp256k1::new(), index)
    }

    pub(crate) fn derive_child_in(&self, secp: &Secp256k1<All>, index: u32) -> Result<Self> {
        let mut data = Zeroizing::new(Vec::with_capacity(37));

        if index >= HARDENED_OFFSET {
            match &self.key {
                KeyMaterial::Private(secret_key) => {
                    data.push(0);
                    data.extend_from_slice(&secret_key.secret_bytes());
                }
                KeyMaterial::Public(_) => return Err(Error::HardenedDerivationFromPublic(index)),
            }
        } else {
            data.extend_from_slice(&self.public_key_in(secp).serialize());
        }
        data.extend_from_slice(&index.to_be_bytes());

        let i = Zeroizing::new(hmac_sha512(&self.chain_code, &data)?);

        let mut il = Zeroizing::new([0u8; 32]);
        il.copy_from_slice(&i[..32]);
        // IL >= n
        let tweak = Scalar::from_be_bytes(*il).map_err(|_| Error::InvalidChildKey(index))?;

        // child = parent + IL (mod n); a zero result is rejected by the tweak
        let key = match self.key {
            KeyMaterial::Private(secret_key) => KeyMaterial::Private(
                secret_key
                    .add_tweak(&tweak)
                    .map_err(|_| Error::InvalidChildKey(index))?,
            ),
            KeyMaterial::Public(public_key) => KeyMaterial::Public(
                public_key
                    .add_exp_tweak(secp, &tweak)
                    .map_err(|_| Error::InvalidChildKey(index))?,
            ),
        };

        let depth = self
            .depth
            .checked_add(1)
            .ok_or(Error::InvalidChildKey(index))?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&i[32..]);

        trace!(depth, index, "derived child key");

        Ok(Self {
            key,
            chain_code,
            depth,
            parent_fingerprint: fingerprint_of(&self.public_key_in(secp)),
            child_index: index,
        })
    }

    /// Drop the private half, keeping only what is needed for normal derivation
    pub fn neuter(&self) -> Self {
        Self {
            key: KeyMaterial::Public(self.public_key()),
            ..self.clone()
        }
    }

    /// Compressed public key of this node
    pub fn public_key(&self) -> PublicKey {
        self.public_key_in(&Secp256k1::new())
    }

    pub(crate) fn public_key_in(&self, secp: &Secp256k1<All>) -> PublicKey {
        match &self.key {
            KeyMaterial::Private(secret_key) => PublicKey::from_secret_key(secp, secret_key),
            KeyMaterial::Public(public_key) => *public_key,
        }
    }

    pub fn private_key(&self) -> Option<&SecretKey> {
        match &self.key {
            KeyMaterial::Private(secret_key) => Some(secret_key),
            KeyMaterial::Public(_) => None,
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self.key, KeyMaterial::Private(_))
    }

    pub fn key_material(&self) -> &KeyMaterial {
        &self.key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    pub fn child_index(&self) -> u32 {
        self.child_index
    }

    /// First four bytes of HASH160 of this node's public key
    pub fn fingerprint(&self) -> [u8; 4] {
        fingerprint_of(&self.public_key())
    }

    /// Base58Check `xprv` serialization; fails for public-only keys
    pub fn to_xprv(&self) -> Result<String> {
        let secret_key = self
            .private_key()
            .ok_or_else(|| Error::InvalidKey("public-only key has no xprv".to_string()))?;

        let mut key_data = Zeroizing::new([0u8; 33]);
        key_data[1..].copy_from_slice(&secret_key.secret_bytes());
        Ok(self.serialize(XPRV_VERSION, &key_data))
    }

    /// Base58Check `xpub` serialization
    pub fn to_xpub(&self) -> String {
        self.serialize(XPUB_VERSION, &self.public_key().serialize())
    }

    /// Parse an `xprv` or `xpub` string
    pub fn from_base58(encoded: &str) -> Result<Self> {
        let data = Zeroizing::new(
            bs58::decode(encoded)
                .with_check(None)
                .into_vec()
                .map_err(|e| Error::InvalidKey(format!("invalid base58check: {}", e)))?,
        );

        if data.len() != SERIALIZED_LEN {
            return Err(Error::InvalidKey(format!(
                "extended key must be {} bytes, got {}",
                SERIALIZED_LEN,
                data.len()
            )));
        }

        let key = match &data[0..4] {
            v if v == XPRV_VERSION => {
                if data[45] != 0 {
                    return Err(Error::InvalidKey("private key must be prefixed with 0x00".to_string()));
                }
                let secret_key = SecretKey::from_slice(&data[46..78])
                    .map_err(|e| Error::InvalidKey(format!("invalid private key: {}", e)))?;
                KeyMaterial::Private(secret_key)
            }
            v if v == XPUB_VERSION => {
                let public_key = PublicKey::from_slice(&data[45..78])
                    .map_err(|e| Error::InvalidKey(format!("invalid public key: {}", e)))?;
                KeyMaterial::Public(public_key)
            }
            v => return Err(Error::InvalidKey(format!("unknown version {}", hex::encode(v)))),
        };

        let depth = data[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&data[5..9]);
        let mut index_bytes = [0u8; 4];
        index_bytes.copy_from_slice(&data[9..13]);
        let child_index = u32::from_be_bytes(index_bytes);

        // A master key has no parent
        if depth == 0 && parent_fingerprint != [0u8; 4] {
            return Err(Error::InvalidKey("zero depth with non-zero parent fingerprint".to_string()));
        }
        if depth == 0 && child_index != 0 {
            return Err(Error::InvalidKey("zero depth with non-zero child index".to_string()));
        }

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);

        Ok(Self {
            key,
            chain_code,
            depth,
            parent_fingerprint,
            child_index,
        })
    }

    fn serialize(&self, version: [u8; 4], key_data: &[u8; 33]) -> String {
        let mut data = Zeroizing::new(Vec::with_capacity(SERIALIZED_LEN));
        data.extend_from_slice(&version);
        data.push(self.depth);
        data.extend_from_slice(&self.parent_fingerprint);
        data.extend_from_slice(&self.child_index.to_be_bytes());
        data.extend_from_slice(&self.chain_code);
        data.extend_from_slice(key_data);

        bs58::encode(&data[..]).with_check().into_string()
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("private", &self.is_private())
            .field("depth", &self.depth)
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint))
            .field("child_index", &self.child_index)
            .finish_non_exhaustive()
    }
}

fn fingerprint_of(public_key: &PublicKey) -> [u8; 4] {
    let hash = hash160(&public_key.serialize());
    let mut fingerprint = [0u8; 4];
    fingerprint.copy_from_slice(&hash[..4]);
    fingerprint
}
