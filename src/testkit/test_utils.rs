//! Test utilities for ledger testing

use crate::config::Settings;
use crate::core::{Block, LedgerCore, ProofOfWork, Transaction};
use crate::error::Result;
use crate::wallet::Wallet;
use data_encoding::HEXLOWER;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Settings tuned for fast tests: the given difficulty and 10ms worker
/// intervals.
pub fn test_settings(difficulty: usize) -> Settings {
    Settings {
        mining_difficulty: difficulty,
        mining_interval: Duration::from_millis(10),
        sync_interval: Duration::from_millis(10),
        ..Settings::default()
    }
}

/// A lock-wrapped ledger ready to hand to workers and gateways.
pub fn shared_ledger(miner_address: &str, difficulty: usize) -> Arc<RwLock<LedgerCore>> {
    Arc::new(RwLock::new(
        LedgerCore::with_settings(miner_address, test_settings(difficulty))
            .expect("test ledger construction failed"),
    ))
}

/// Create test wallets with fresh keypairs.
pub fn create_test_wallets(count: usize) -> Result<Vec<Wallet>> {
    let mut wallets = Vec::new();
    for _ in 0..count {
        wallets.push(Wallet::new()?);
    }
    Ok(wallets)
}

/// The five arguments a signed submission hands to
/// [`LedgerCore::add_transaction`]: sender, recipient, value, and the
/// hex-encoded key and signature.
pub fn signed_submission(
    wallet: &Wallet,
    recipient: &str,
    value: f64,
) -> (String, String, f64, String, String) {
    let transaction = Transaction::new(wallet.get_address(), recipient, value);
    let signature = transaction
        .sign(wallet.get_pkcs8())
        .expect("test transaction signing failed");
    (
        wallet.get_address().to_string(),
        recipient.to_string(),
        value,
        HEXLOWER.encode(wallet.get_public_key()),
        HEXLOWER.encode(signature.as_slice()),
    )
}

/// A chain whose every non-genesis block carries a real proof at the given
/// difficulty.
pub fn mined_chain(length: usize, difficulty: usize) -> Vec<Block> {
    mined_chain_paying(length, difficulty, "bob")
}

/// Like [`mined_chain`], but the payments go to the given recipient, so two
/// chains of the same length can differ.
pub fn mined_chain_paying(length: usize, difficulty: usize, recipient: &str) -> Vec<Block> {
    let genesis = Block::new_test_block(1, 0, Block::genesis_base_hash().to_string(), 0, vec![]);
    let mut chain = vec![genesis];

    for index in 2..=length {
        let previous_hash = chain
            .last()
            .expect("chain starts with genesis")
            .hash()
            .expect("test block hashing failed");
        let transactions = vec![Transaction::new("alice", recipient, index as f64)];
        let pow = ProofOfWork::new(difficulty);
        let nonce = pow
            .find_proof(&transactions, &previous_hash)
            .expect("proof search failed at test difficulty");
        chain.push(Block::new_test_block(
            index as u64,
            nonce,
            previous_hash,
            index as i64,
            transactions,
        ));
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::is_valid_chain;

    #[test]
    fn test_create_test_wallets_are_unique() {
        let wallets = create_test_wallets(5).unwrap();
        assert_eq!(wallets.len(), 5);

        for i in 0..wallets.len() {
            for j in i + 1..wallets.len() {
                assert_ne!(wallets[i].get_address(), wallets[j].get_address());
            }
        }
    }

    #[test]
    fn test_shared_ledger_starts_at_genesis() {
        let ledger = shared_ledger("miner", 0);
        assert_eq!(ledger.read().unwrap().get_chain().len(), 1);
    }

    #[test]
    fn test_mined_chain_validates() {
        let chain = mined_chain(4, 1);
        assert!(is_valid_chain(&chain, 1));
    }

    #[test]
    fn test_signed_submission_is_accepted() {
        let ledger = shared_ledger("miner", 0);
        let wallet = Wallet::new().unwrap();
        let (sender, recipient, value, public_key, signature) =
            signed_submission(&wallet, "bob", 2.5);

        assert!(ledger.write().unwrap().add_transaction(
            &sender,
            &recipient,
            value,
            Some(public_key.as_str()),
            Some(signature.as_str()),
        ));
    }
}
