use crate::core::Transaction;
use crate::error::Result;
use crate::utils::{canonical_json_bytes, current_timestamp, sha256_hex};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Digest of the canonical empty map. The genesis block anchors its
/// previous_hash here so the chain has a fixed, content-derived root.
static EMPTY_MAP_HASH: Lazy<String> = Lazy::new(|| sha256_hex(b"{}"));

// Field declaration order is the canonical hash order and must stay
// lexicographic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    nonce: u64,
    previous_hash: String,
    timestamp: i64,
    transactions: Vec<Transaction>,
}

impl Block {
    pub fn new(
        index: u64,
        nonce: u64,
        previous_hash: String,
        transactions: Vec<Transaction>,
    ) -> Result<Block> {
        Ok(Block {
            index,
            nonce,
            previous_hash,
            timestamp: current_timestamp()?,
            transactions,
        })
    }

    /// The previous-hash anchor used by genesis blocks.
    pub fn genesis_base_hash() -> &'static str {
        EMPTY_MAP_HASH.as_str()
    }

    /// Hex digest of the canonical block serialization. There is no stored
    /// hash field; every consumer recomputes through this one routine.
    pub fn hash(&self) -> Result<String> {
        let bytes = canonical_json_bytes(self)?;
        Ok(sha256_hex(bytes.as_slice()))
    }

    pub fn get_index(&self) -> u64 {
        self.index
    }

    pub fn get_nonce(&self) -> u64 {
        self.nonce
    }

    pub fn get_previous_hash(&self) -> &str {
        self.previous_hash.as_str()
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    /// Create a block with a fixed timestamp (for testing only)
    #[cfg(test)]
    pub fn new_test_block(
        index: u64,
        nonce: u64,
        previous_hash: String,
        timestamp: i64,
        transactions: Vec<Transaction>,
    ) -> Block {
        Block {
            index,
            nonce,
            previous_hash,
            timestamp,
            transactions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::canonical_json;

    #[test]
    fn test_genesis_base_hash_constant() {
        // sha256 of the two bytes "{}"
        assert_eq!(
            Block::genesis_base_hash(),
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }

    #[test]
    fn test_canonical_json_field_order() {
        let block = Block::new_test_block(
            1,
            0,
            "abc".to_string(),
            1000,
            vec![Transaction::new("alice", "bob", 1.5)],
        );

        let json = canonical_json(&block).unwrap();
        assert_eq!(
            json,
            r#"{"index":1,"nonce":0,"previous_hash":"abc","timestamp":1000,"transactions":[{"recipient_address":"bob","sender_address":"alice","value":1.5}]}"#
        );
    }

    #[test]
    fn test_hash_deterministic() {
        let block = Block::new_test_block(1, 0, "abc".to_string(), 1000, vec![]);
        assert_eq!(block.hash().unwrap(), block.hash().unwrap());
    }

    #[test]
    fn test_hash_changes_with_nonce() {
        let base = Block::new_test_block(1, 0, "abc".to_string(), 1000, vec![]);
        let bumped = Block::new_test_block(1, 1, "abc".to_string(), 1000, vec![]);
        assert_ne!(base.hash().unwrap(), bumped.hash().unwrap());
    }

    #[test]
    fn test_hash_changes_with_transactions() {
        let empty = Block::new_test_block(1, 0, "abc".to_string(), 1000, vec![]);
        let filled = Block::new_test_block(
            1,
            0,
            "abc".to_string(),
            1000,
            vec![Transaction::new("alice", "bob", 1.0)],
        );
        assert_ne!(empty.hash().unwrap(), filled.hash().unwrap());
    }
}
