//! Hash helpers shared by key derivation and address encoding

use bitcoin::hashes::{hash160, Hash};
use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::error::{Error, Result};

/// RIPEMD160(SHA256(data))
pub fn hash160(data: &[u8]) -> [u8; 20] {
    hash160::Hash::hash(data).to_byte_array()
}

/// HMAC-SHA512 of `data` under `key`
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<[u8; 64]> {
    let mut hmac = Hmac::<Sha512>::new_from_slice(key)
        .map_err(|_| Error::InvalidKey("HMAC error".to_string()))?;
    hmac.update(data);

    let mut out = [0u8; 64];
    out.copy_from_slice(&hmac.finalize().into_bytes());
    Ok(out)
}
