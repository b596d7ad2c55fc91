//! Address encoding
//!
//! One encoder per output type. Each takes the leaf public key and the
//! network parameters explicitly and returns the canonical text form.

use std::fmt;

use bech32::{segwit, Hrp};
use bitcoin::key::TapTweak;
use secp256k1::{PublicKey, Secp256k1, XOnlyPublicKey};
use serde::{Serialize, Serializer};

use crate::crypto::hash::hash160;
use crate::crypto::keys::Purpose;
use crate::error::{Error, Result};
use crate::network::NetworkParams;

/// Witness v0 program prefix: OP_0 PUSH20
const P2WPKH_SCRIPT_PREFIX: [u8; 2] = [0x00, 0x14];

/// Supported address types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressFormat {
    /// P2PKH, BIP-44
    Legacy,
    /// P2WPKH-in-P2SH, BIP-49
    NestedSegwit,
    /// P2WPKH, BIP-84
    NativeSegwit,
    /// P2TR key path, BIP-86
    Taproot,
}

impl AddressFormat {
    /// Column order used by the output layer
    pub const ALL: [AddressFormat; 4] = [
        Self::Legacy,
        Self::NestedSegwit,
        Self::NativeSegwit,
        Self::Taproot,
    ];

    pub fn purpose(&self) -> Purpose {
        match self {
            Self::Legacy => Purpose::Bip44,
            Self::NestedSegwit => Purpose::Bip49,
            Self::NativeSegwit => Purpose::Bip84,
            Self::Taproot => Purpose::Bip86,
        }
    }

    pub fn from_purpose(purpose: Purpose) -> Self {
        match purpose {
            Purpose::Bip44 => Self::Legacy,
            Purpose::Bip49 => Self::NestedSegwit,
            Purpose::Bip84 => Self::NativeSegwit,
            Purpose::Bip86 => Self::Taproot,
        }
    }

    /// Standard and script type, e.g. `BIP-84 P2WPKH`
    pub fn label(&self) -> &'static str {
        match self {
            Self::Legacy => "BIP-44 P2PKH",
            Self::NestedSegwit => "BIP-49 P2WPKH-in-P2SH",
            Self::NativeSegwit => "BIP-84 P2WPKH",
            Self::Taproot => "BIP-86 P2TR",
        }
    }
}

impl fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Legacy => "legacy",
            Self::NestedSegwit => "nested segwit",
            Self::NativeSegwit => "native segwit",
            Self::Taproot => "taproot",
        })
    }
}

/// An encoded address tagged with its format and network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    format: AddressFormat,
    network: NetworkParams,
    encoded: String,
}

impl Address {
    pub fn format(&self) -> AddressFormat {
        self.format
    }

    pub fn network(&self) -> &NetworkParams {
        &self.network
    }

    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// Recognise the format of an encoded address on `network`
    ///
    /// Base58Check addresses are told apart by version byte; Bech32 and
    /// Bech32m addresses by witness version, where the checksum variant
    /// must match the version.
    pub fn parse(encoded: &str, network: &NetworkParams) -> Result<Self> {
        let format = if has_hrp(encoded, network.bech32_hrp) {
            parse_segwit(encoded, network)?
        } else {
            parse_base58(encoded, network)?
        };

        Ok(Self {
            format,
            network: *network,
            encoded: encoded.to_string(),
        })
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

/// One address per format, all from the same wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressSet {
    pub legacy: Address,
    pub nested_segwit: Address,
    pub native_segwit: Address,
    pub taproot: Address,
}

impl AddressSet {
    pub fn get(&self, format: AddressFormat) -> &Address {
        match format {
            AddressFormat::Legacy => &self.legacy,
            AddressFormat::NestedSegwit => &self.nested_segwit,
            AddressFormat::NativeSegwit => &self.native_segwit,
            AddressFormat::Taproot => &self.taproot,
        }
    }

    /// Addresses in column order
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        AddressFormat::ALL.into_iter().map(move |format| self.get(format))
    }
}

/// Encode `public_key` in the given format
pub fn encode(format: AddressFormat, public_key: &PublicKey, network: &NetworkParams) -> Result<Address> {
    match format {
        AddressFormat::Legacy => p2pkh(public_key, network),
        AddressFormat::NestedSegwit => p2sh_p2wpkh(public_key, network),
        AddressFormat::NativeSegwit => p2wpkh(public_key, network),
        AddressFormat::Taproot => p2tr(public_key, network),
    }
}

/// Base58Check(p2pkh_prefix || HASH160(pubkey))
pub fn p2pkh(public_key: &PublicKey, network: &NetworkParams) -> Result<Address> {
    let pubkey_hash = hash160(&public_key.serialize());
    let encoded = base58check(network.p2pkh_prefix, &pubkey_hash);
    Ok(address(AddressFormat::Legacy, network, encoded))
}

/// Base58Check(p2sh_prefix || HASH160(0x00 0x14 || HASH160(pubkey)))
pub fn p2sh_p2wpkh(public_key: &PublicKey, network: &NetworkParams) -> Result<Address> {
    let redeem_script = p2wpkh_script(public_key);
    let script_hash = hash160(&redeem_script);
    let encoded = base58check(network.p2sh_prefix, &script_hash);
    Ok(address(AddressFormat::NestedSegwit, network, encoded))
}

/// Bech32(hrp, 0, HASH160(pubkey))
pub fn p2wpkh(public_key: &PublicKey, network: &NetworkParams) -> Result<Address> {
    let pubkey_hash = hash160(&public_key.serialize());
    let encoded = segwit::encode(parse_hrp(network)?, segwit::VERSION_0, &pubkey_hash)
        .map_err(|e| Error::AddressEncodingFailed(e.to_string()))?;
    Ok(address(AddressFormat::NativeSegwit, network, encoded))
}

/// Bech32m(hrp, 1, TapTweak output key)
pub fn p2tr(public_key: &PublicKey, network: &NetworkParams) -> Result<Address> {
    let output_key = taproot_output_key(public_key);
    let encoded = segwit::encode(parse_hrp(network)?, segwit::VERSION_1, &output_key.serialize())
        .map_err(|e| Error::AddressEncodingFailed(e.to_string()))?;
    Ok(address(AddressFormat::Taproot, network, encoded))
}

/// BIP-341 output key for a key-path-only spend (no script tree)
pub fn taproot_output_key(public_key: &PublicKey) -> XOnlyPublicKey {
    let secp = Secp256k1::verification_only();
    let (internal_key, _) = public_key.x_only_public_key();

    let (output_key, _parity) = internal_key.tap_tweak(&secp, None);
    output_key.to_inner()
}

/// The P2WPKH witness program script, also the BIP-49 redeem script
pub fn p2wpkh_script(public_key: &PublicKey) -> [u8; 22] {
    let mut script = [0u8; 22];
    script[..2].copy_from_slice(&P2WPKH_SCRIPT_PREFIX);
    script[2..].copy_from_slice(&hash160(&public_key.serialize()));
    script
}

fn address(format: AddressFormat, network: &NetworkParams, encoded: String) -> Address {
    Address {
        format,
        network: *network,
        encoded,
    }
}

fn base58check(version: u8, payload: &[u8; 20]) -> String {
    let mut data = Vec::with_capacity(21);
    data.push(version);
    data.extend_from_slice(payload);
    bs58::encode(data).with_check().into_string()
}

fn parse_hrp(network: &NetworkParams) -> Result<Hrp> {
    Hrp::parse(network.bech32_hrp).map_err(|e| Error::AddressEncodingFailed(e.to_string()))
}

fn has_hrp(encoded: &str, hrp: &str) -> bool {
    encoded.len() > hrp.len()
        && encoded.is_char_boundary(hrp.len() + 1)
        && encoded[..hrp.len() + 1].eq_ignore_ascii_case(&format!("{}1", hrp))
}

fn parse_segwit(encoded: &str, network: &NetworkParams) -> Result<AddressFormat> {
    let (hrp, version, program) =
        segwit::decode(encoded).map_err(|e| Error::InvalidAddress(e.to_string()))?;

    if hrp != parse_hrp(network)? {
        return Err(Error::InvalidAddress(format!("wrong network prefix {}", hrp)));
    }

    match (version, program.len()) {
        (v, 20) if v == segwit::VERSION_0 => Ok(AddressFormat::NativeSegwit),
        (v, 32) if v == segwit::VERSION_1 => Ok(AddressFormat::Taproot),
        (v, len) => Err(Error::InvalidAddress(format!(
            "unsupported witness version {} with {}-byte program",
            v.to_u8(),
            len
        ))),
    }
}

fn parse_base58(encoded: &str, network: &NetworkParams) -> Result<AddressFormat> {
    let data = bs58::decode(encoded)
        .with_check(None)
        .into_vec()
        .map_err(|e| Error::InvalidAddress(e.to_string()))?;

    if data.len() != 21 {
        return Err(Error::InvalidAddress(format!("payload must be 21 bytes, got {}", data.len())));
    }

    match data[0] {
        v if v == network.p2pkh_prefix => Ok(AddressFormat::Legacy),
        v if v == network.p2sh_prefix => Ok(AddressFormat::NestedSegwit),
        v => Err(Error::InvalidAddress(format!("unknown version byte {:#04x}", v))),
    }
}
