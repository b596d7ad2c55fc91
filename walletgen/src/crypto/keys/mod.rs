//! Key derivation and management
//!
//! BIP-32 extended keys and the fixed BIP-44/49/84/86 derivation paths.

pub mod extended;
pub mod derivation;

pub use extended::*;
pub use derivation::*;
