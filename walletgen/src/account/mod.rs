//! Wallet and address functionality
//!
//! This module ties entropy, mnemonic and key derivation together into a
//! wallet, and encodes its leaf keys as addresses.

pub mod address;
mod wallet;

pub use address::{Address, AddressFormat, AddressSet};
pub use wallet::*;
