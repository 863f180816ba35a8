//! Wallet management and cryptographic operations
//!
//! This module handles keypair creation, address derivation and validation,
//! and the construction of signed transfers.

#[allow(clippy::module_inception)]
pub mod wallet;

pub use wallet::{derive_address, hash_pub_key, validate_address, Wallet, ADDRESS_CHECK_SUM_LEN};
