//! Utility functions and helpers
//!
//! This module contains cryptographic utilities, encoding functions,
//! and the canonical serialization used throughout the ledger.

pub mod crypto;
pub mod serialization;

pub use crypto::{
    base58_decode, base58_encode, current_timestamp, ecdsa_p256_sha256_sign,
    ecdsa_p256_sha256_verify, new_key_pair, ripemd160_digest, sha256_digest, sha256_hex,
};

pub use serialization::{canonical_json, canonical_json_bytes};
