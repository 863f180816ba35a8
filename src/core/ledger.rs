// This is the core ledger implementation - the heart of the node
// I keep everything in memory: the chain itself, the pool of transactions
// waiting for the next block, and the list of neighbor nodes this one syncs
// against. Callers wrap the whole struct in a lock; nothing in here spawns
// threads or performs I/O.

use crate::config::Settings;
use crate::core::consensus::select_longest_valid;
use crate::core::{Block, Transaction, MINING_SENDER};
use crate::error::{LedgerError, Result};
use data_encoding::HEXLOWER_PERMISSIVE;
use log::{info, warn};

pub struct LedgerCore {
    chain: Vec<Block>,
    transaction_pool: Vec<Transaction>,
    neighbors: Vec<String>,
    // Rewards for blocks this node mines are credited here
    miner_address: String,
    settings: Settings,
}

impl LedgerCore {
    pub fn new(miner_address: &str) -> Result<LedgerCore> {
        Self::with_settings(miner_address, Settings::default())
    }

    pub fn with_settings(miner_address: &str, settings: Settings) -> Result<LedgerCore> {
        let mut ledger = LedgerCore {
            chain: vec![],
            transaction_pool: vec![],
            neighbors: vec![],
            miner_address: miner_address.to_string(),
            settings,
        };

        // The genesis block goes through the same path as every later block,
        // anchored to the digest of the canonical empty map.
        info!("Creating genesis block for miner address: {miner_address}");
        ledger.create_block(0, Some(Block::genesis_base_hash().to_string()))?;
        Ok(ledger)
    }

    /// Submit a transfer to the pending pool. The reserved reward sender is
    /// appended unconditionally; everyone else must present a hex-encoded
    /// public key and signature that verify against the canonical
    /// transaction. Every rejection returns false and leaves the pool
    /// untouched.
    pub fn add_transaction(
        &mut self,
        sender_address: &str,
        recipient_address: &str,
        value: f64,
        sender_public_key: Option<&str>,
        signature: Option<&str>,
    ) -> bool {
        if !value.is_finite() || value < 0.0 {
            warn!("Rejected transaction from {sender_address}: invalid value {value}");
            return false;
        }

        let transaction = Transaction::new(sender_address, recipient_address, value);

        if sender_address == MINING_SENDER {
            self.transaction_pool.push(transaction);
            return true;
        }

        let (public_key, signature) = match (sender_public_key, signature) {
            (Some(public_key), Some(signature)) => (public_key, signature),
            _ => {
                warn!("Rejected transaction from {sender_address}: missing signature material");
                return false;
            }
        };
        let public_key = match HEXLOWER_PERMISSIVE.decode(public_key.as_bytes()) {
            Ok(bytes) => bytes,
            Err(_) => {
                warn!("Rejected transaction from {sender_address}: malformed public key hex");
                return false;
            }
        };
        let signature = match HEXLOWER_PERMISSIVE.decode(signature.as_bytes()) {
            Ok(bytes) => bytes,
            Err(_) => {
                warn!("Rejected transaction from {sender_address}: malformed signature hex");
                return false;
            }
        };

        if !transaction.verify(public_key.as_slice(), signature.as_slice()) {
            warn!("Rejected transaction from {sender_address}: signature verification failed");
            return false;
        }

        // Off by default; overdrafts are allowed and balances go negative
        if self.settings.enforce_balance && self.total_balance(sender_address) < value {
            info!("Rejected transaction from {sender_address}: insufficient balance");
            return false;
        }

        self.transaction_pool.push(transaction);
        true
    }

    /// Seal the pending pool into a new block and append it. The pool is
    /// drained in order; when no previous hash is supplied the block links
    /// to the digest of the current last block.
    pub fn create_block(&mut self, nonce: u64, previous_hash: Option<String>) -> Result<Block> {
        let previous_hash = match previous_hash {
            Some(digest) => digest,
            None => self.last_block_hash()?,
        };
        let transactions = std::mem::take(&mut self.transaction_pool);
        let block = Block::new(
            self.chain.len() as u64 + 1,
            nonce,
            previous_hash,
            transactions,
        )?;

        info!(
            "Created block {} with {} transactions",
            block.get_index(),
            block.get_transactions().len()
        );
        self.chain.push(block.clone());
        Ok(block)
    }

    /// Digest of the current last block.
    pub fn last_block_hash(&self) -> Result<String> {
        match self.chain.last() {
            Some(block) => block.hash(),
            None => Err(LedgerError::InvalidBlock(
                "Chain has no blocks".to_string(),
            )),
        }
    }

    /// Net balance of an address over the whole chain: credited as
    /// recipient, debited as sender. No caching; every call walks the chain.
    pub fn total_balance(&self, address: &str) -> f64 {
        let mut total = 0.0;
        for block in &self.chain {
            for transaction in block.get_transactions() {
                if address == transaction.get_recipient_address() {
                    total += transaction.get_value();
                }
                if address == transaction.get_sender_address() {
                    total -= transaction.get_value();
                }
            }
        }
        total
    }

    /// Replace the chain with the longest valid candidate, if any is
    /// strictly longer than ours. Invalid candidates are skipped without
    /// comment; a false return means the local chain survived.
    pub fn resolve_conflicts(&mut self, candidates: Vec<Vec<Block>>) -> bool {
        let difficulty = self.settings.mining_difficulty;
        match select_longest_valid(self.chain.len(), candidates, difficulty) {
            Some(chain) => {
                info!("Conflict resolution replaced the chain ({} blocks)", chain.len());
                self.chain = chain;
                true
            }
            None => {
                info!("Conflict resolution kept the local chain");
                false
            }
        }
    }

    pub fn get_chain(&self) -> &[Block] {
        self.chain.as_slice()
    }

    pub fn get_transaction_pool(&self) -> &[Transaction] {
        self.transaction_pool.as_slice()
    }

    pub fn clear_transaction_pool(&mut self) {
        self.transaction_pool.clear();
    }

    pub fn get_miner_address(&self) -> &str {
        self.miner_address.as_str()
    }

    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    pub fn get_neighbors(&self) -> &[String] {
        self.neighbors.as_slice()
    }

    pub fn register_neighbor(&mut self, neighbor: &str) {
        if !self.neighbors.iter().any(|known| known == neighbor) {
            self.neighbors.push(neighbor.to_string());
        }
    }

    pub fn set_neighbors(&mut self, neighbors: Vec<String>) {
        self.neighbors = neighbors;
    }
}
