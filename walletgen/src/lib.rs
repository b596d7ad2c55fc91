//! walletgen - Bitcoin HD wallet generation
//!
//! This library generates BIP-39 wallets from fresh randomness and derives,
//! for each wallet, the first receiving address in four formats: legacy
//! P2PKH (BIP-44), nested SegWit (BIP-49), native SegWit (BIP-84) and
//! Taproot (BIP-86).
//!
//! ```no_run
//! use walletgen::{NetworkParams, Wallet};
//!
//! let wallet = Wallet::generate(128)?;
//! let addresses = wallet.derive_all_addresses(&NetworkParams::MAINNET)?;
//! println!("{} {}", wallet.mnemonic(), addresses.taproot);
//! # Ok::<(), walletgen::Error>(())
//! ```

pub mod error;
pub mod network;
pub mod crypto;
pub mod account;

// Re-export commonly used types for convenience
pub use account::{generate_wallet, Address, AddressFormat, AddressSet, Wallet};
pub use error::{Error, Result, Stage};
pub use network::NetworkParams;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
