// This is the transfer model - a transaction moves a floating point value
// between two addresses and is authorized by an ECDSA signature over its
// canonical serialization. The struct declares its fields in lexicographic
// order on purpose: the derived serde output in declaration order IS the
// canonical signing and hashing format, so the order must never change.

use crate::error::Result;
use crate::utils::{canonical_json_bytes, ecdsa_p256_sha256_sign, ecdsa_p256_sha256_verify};
use serde::{Deserialize, Serialize};

/// Reserved sender identity for mining rewards. Transactions from this
/// sender carry no signature and are appended without verification.
pub const MINING_SENDER: &str = "THE BLOCKCHAIN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    recipient_address: String,
    sender_address: String,
    value: f64,
}

impl Transaction {
    pub fn new(sender_address: &str, recipient_address: &str, value: f64) -> Transaction {
        Transaction {
            recipient_address: recipient_address.to_string(),
            sender_address: sender_address.to_string(),
            value,
        }
    }

    pub fn get_sender_address(&self) -> &str {
        self.sender_address.as_str()
    }

    pub fn get_recipient_address(&self) -> &str {
        self.recipient_address.as_str()
    }

    pub fn get_value(&self) -> f64 {
        self.value
    }

    /// Whether this is a mining reward credit from the reserved identity.
    pub fn is_reward(&self) -> bool {
        self.sender_address == MINING_SENDER
    }

    /// The canonical byte serialization that gets signed and verified.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>> {
        canonical_json_bytes(self)
    }

    /// Sign this transaction with a PKCS#8-encoded P-256 private key.
    pub fn sign(&self, pkcs8: &[u8]) -> Result<Vec<u8>> {
        let message = self.canonical_bytes()?;
        ecdsa_p256_sha256_sign(pkcs8, message.as_slice())
    }

    /// Check a signature over this transaction against a SEC1-encoded public
    /// key. Total: malformed keys, malformed signatures, and mismatches all
    /// come back false.
    pub fn verify(&self, public_key: &[u8], signature: &[u8]) -> bool {
        let message = match self.canonical_bytes() {
            Ok(message) => message,
            Err(_) => return false,
        };
        ecdsa_p256_sha256_verify(public_key, signature, message.as_slice())
    }
}

/// A fully signed transfer ready for submission to a node: the transaction
/// fields plus the hex-encoded sender public key and signature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub sender_address: String,
    pub recipient_address: String,
    pub value: f64,
    pub sender_public_key: String,
    pub signature: String,
}
