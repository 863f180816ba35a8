use crate::core::{Transaction, TransferRequest};
use crate::error::{LedgerError, Result};
use data_encoding::HEXLOWER;
use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, KeyPair, ECDSA_P256_SHA256_FIXED_SIGNING};
use zeroize::Zeroizing;

const VERSION: u8 = 0x00;
pub const ADDRESS_CHECK_SUM_LEN: usize = 4;

// SEC1 uncompressed point: 0x04 tag followed by the 32-byte X and Y
// coordinates.
const SEC1_UNCOMPRESSED_LEN: usize = 65;
const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;

/// A P-256 keypair with its derived address. The private half stays in
/// PKCS#8 form and is wiped from memory on drop.
pub struct Wallet {
    pkcs8: Zeroizing<Vec<u8>>,
    public_key: Vec<u8>,
    address: String,
}

impl Wallet {
    pub fn new() -> Result<Wallet> {
        let pkcs8 = Zeroizing::new(crate::utils::new_key_pair()?);
        let rng = SystemRandom::new();
        let key_pair =
            EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, pkcs8.as_ref(), &rng)
                .map_err(|e| {
                    LedgerError::Crypto(format!("Failed to create key pair from PKCS8: {e}"))
                })?;
        let public_key = key_pair.public_key().as_ref().to_vec();
        let address = derive_address(public_key.as_slice())?;
        Ok(Wallet {
            pkcs8,
            public_key,
            address,
        })
    }

    pub fn get_address(&self) -> &str {
        self.address.as_str()
    }

    pub fn get_public_key(&self) -> &[u8] {
        self.public_key.as_slice()
    }

    pub fn get_pkcs8(&self) -> &[u8] {
        self.pkcs8.as_slice()
    }

    /// Build a fully signed transfer from this wallet to a recipient, ready
    /// for submission to a node.
    pub fn signed_transfer(&self, recipient_address: &str, value: f64) -> Result<TransferRequest> {
        let transaction = Transaction::new(self.address.as_str(), recipient_address, value);
        let signature = transaction.sign(self.pkcs8.as_slice())?;
        Ok(TransferRequest {
            sender_address: self.address.clone(),
            recipient_address: recipient_address.to_string(),
            value,
            sender_public_key: HEXLOWER.encode(self.public_key.as_slice()),
            signature: HEXLOWER.encode(signature.as_slice()),
        })
    }
}

/// Derive the Base58 address for a SEC1 uncompressed public key:
/// version byte + RIPEMD160(SHA256(key)) + 4-byte double-SHA256 checksum.
pub fn derive_address(public_key: &[u8]) -> Result<String> {
    if public_key.len() != SEC1_UNCOMPRESSED_LEN || public_key[0] != SEC1_UNCOMPRESSED_TAG {
        return Err(LedgerError::InvalidKeyEncoding(format!(
            "Expected a {SEC1_UNCOMPRESSED_LEN}-byte uncompressed P-256 point, got {} bytes",
            public_key.len()
        )));
    }

    let pub_key_hash = hash_pub_key(public_key);
    let mut payload: Vec<u8> = vec![];
    payload.push(VERSION);
    payload.extend(pub_key_hash.as_slice());
    let checksum = checksum(payload.as_slice());
    payload.extend(checksum.as_slice());
    // version + pub_key_hash + checksum
    Ok(crate::utils::base58_encode(payload.as_slice()))
}

pub fn hash_pub_key(pub_key: &[u8]) -> Vec<u8> {
    let pub_key_sha256 = crate::utils::sha256_digest(pub_key);
    crate::utils::ripemd160_digest(pub_key_sha256.as_slice())
}

fn checksum(payload: &[u8]) -> Vec<u8> {
    let first_sha = crate::utils::sha256_digest(payload);
    let second_sha = crate::utils::sha256_digest(first_sha.as_slice());
    second_sha[0..ADDRESS_CHECK_SUM_LEN].to_vec()
}

pub fn validate_address(address: &str) -> bool {
    let payload = match crate::utils::base58_decode(address) {
        Ok(payload) => payload,
        Err(_) => return false, // Invalid base58 encoding
    };

    // Check if payload is long enough
    if payload.len() < ADDRESS_CHECK_SUM_LEN + 1 {
        return false;
    }

    let actual_checksum = payload[payload.len() - ADDRESS_CHECK_SUM_LEN..].to_vec();
    let version = payload[0];
    let pub_key_hash = payload[1..payload.len() - ADDRESS_CHECK_SUM_LEN].to_vec();

    let mut target_vec = vec![];
    target_vec.push(version);
    target_vec.extend(pub_key_hash);
    let target_checksum = checksum(target_vec.as_slice());
    actual_checksum.eq(target_checksum.as_slice())
}
