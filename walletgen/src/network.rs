//! Network parameters
//!
//! Every encoder takes its network explicitly. Only Bitcoin mainnet is
//! defined; `for_network` is where other networks would be added.

use serde::Serialize;

pub use bitcoin::Network;

use crate::error::{Error, Result};

/// Version bytes and human-readable part for one Bitcoin network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NetworkParams {
    /// Display name
    pub name: &'static str,
    /// Base58Check version byte for pay-to-pubkey-hash
    pub p2pkh_prefix: u8,
    /// Base58Check version byte for pay-to-script-hash
    pub p2sh_prefix: u8,
    /// Bech32/Bech32m human-readable part
    pub bech32_hrp: &'static str,
}

impl NetworkParams {
    pub const MAINNET: NetworkParams = NetworkParams {
        name: "mainnet",
        p2pkh_prefix: 0x00,
        p2sh_prefix: 0x05,
        bech32_hrp: "bc",
    };

    /// Look up the parameters for a `bitcoin::Network`
    pub fn for_network(network: Network) -> Result<Self> {
        match network {
            Network::Bitcoin => Ok(Self::MAINNET),
            other => Err(Error::UnsupportedNetwork(other.to_string())),
        }
    }
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self::MAINNET
    }
}
