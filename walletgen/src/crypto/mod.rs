//! Cryptographic primitives and operations
//!
//! This module provides entropy generation, mnemonic encoding, seed
//! derivation and hierarchical key derivation.

pub mod entropy;
pub mod hash;
pub mod mnemonic;
pub mod keys;

pub use entropy::{Entropy, EntropySize};
pub use mnemonic::{Mnemonic, Seed};
pub use keys::*;
