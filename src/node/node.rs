use crate::config::Settings;
use crate::core::{Block, LedgerCore, Transaction, TransferRequest};
use crate::error::Result;
use crate::network::PeerGateway;
use crate::node::{Miner, Syncer};
use std::sync::{Arc, RwLock};

/// One running ledger node: the shared ledger plus the workers that mine
/// and sync it. Queries copy snapshots out of the lock; the external
/// boundary never hands out a live borrow of ledger state.
pub struct Node {
    ledger: Arc<RwLock<LedgerCore>>,
    miner: Miner,
    syncer: Syncer,
}

impl Node {
    pub fn new(miner_address: &str, gateway: Arc<dyn PeerGateway>) -> Result<Node> {
        Self::with_settings(miner_address, Settings::default(), gateway)
    }

    pub fn with_settings(
        miner_address: &str,
        settings: Settings,
        gateway: Arc<dyn PeerGateway>,
    ) -> Result<Node> {
        let ledger = Arc::new(RwLock::new(LedgerCore::with_settings(
            miner_address,
            settings,
        )?));
        let miner = Miner::new(Arc::clone(&ledger), Arc::clone(&gateway));
        let syncer = Syncer::new(Arc::clone(&ledger), gateway);
        Ok(Node {
            ledger,
            miner,
            syncer,
        })
    }

    /// Shared handle to the underlying ledger, for registering this node
    /// with an in-process gateway.
    pub fn ledger(&self) -> Arc<RwLock<LedgerCore>> {
        Arc::clone(&self.ledger)
    }

    /// Startup sequence: reconcile once against the neighbors already
    /// registered, then keep syncing in the background. Mining stays manual
    /// until start_mining is called.
    pub fn start(&self) {
        self.run_consensus();
        self.start_sync();
    }

    pub fn shutdown(&self) {
        self.stop_mining();
        self.stop_sync();
    }

    pub fn chain(&self) -> Vec<Block> {
        self.read_ledger().get_chain().to_vec()
    }

    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.read_ledger().get_transaction_pool().to_vec()
    }

    /// Apply a signed transfer to the pending pool. False means the request
    /// was rejected and nothing changed.
    pub fn submit_transaction(&self, request: &TransferRequest) -> bool {
        self.write_ledger().add_transaction(
            request.sender_address.as_str(),
            request.recipient_address.as_str(),
            request.value,
            Some(request.sender_public_key.as_str()),
            Some(request.signature.as_str()),
        )
    }

    pub fn clear_pending(&self) {
        self.write_ledger().clear_transaction_pool();
    }

    pub fn mine_once(&self) -> bool {
        self.miner.mine_once()
    }

    pub fn start_mining(&self) {
        self.miner.start();
    }

    pub fn stop_mining(&self) {
        self.miner.stop();
    }

    pub fn start_sync(&self) {
        self.syncer.start();
    }

    pub fn stop_sync(&self) {
        self.syncer.stop();
    }

    /// One consensus round against the registered neighbors, fetching their
    /// chains through the gateway. True when the local chain was replaced.
    pub fn run_consensus(&self) -> bool {
        self.syncer.sync_once()
    }

    /// Consensus over caller-supplied candidate chains, for callers that
    /// already hold them.
    pub fn resolve_with(&self, candidates: Vec<Vec<Block>>) -> bool {
        self.write_ledger().resolve_conflicts(candidates)
    }

    pub fn balance(&self, address: &str) -> f64 {
        self.read_ledger().total_balance(address)
    }

    pub fn register_neighbor(&self, neighbor: &str) {
        self.write_ledger().register_neighbor(neighbor);
    }

    pub fn neighbors(&self) -> Vec<String> {
        self.read_ledger().get_neighbors().to_vec()
    }

    pub fn miner_address(&self) -> String {
        self.read_ledger().get_miner_address().to_string()
    }

    fn read_ledger(&self) -> std::sync::RwLockReadGuard<'_, LedgerCore> {
        self.ledger
            .read()
            .expect("Failed to acquire read lock on ledger - this should never happen")
    }

    fn write_ledger(&self) -> std::sync::RwLockWriteGuard<'_, LedgerCore> {
        self.ledger
            .write()
            .expect("Failed to acquire write lock on ledger - this should never happen")
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        self.shutdown();
    }
}
