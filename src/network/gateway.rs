use crate::core::{Block, LedgerCore};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// The two capabilities the ledger core needs from the outside world.
/// Transport lives behind this seam; nothing inside the core performs I/O.
pub trait PeerGateway: Send + Sync {
    /// A neighbor's current chain, or None when it cannot be reached.
    fn fetch_chain(&self, neighbor: &str) -> Option<Vec<Block>>;

    /// Tell a neighbor a new block exists. The neighbor drops its pending
    /// pool (those transactions were just swept into the block) and
    /// reconciles its chain against everything it can see.
    fn notify_new_block(&self, neighbor: &str, block: &Block);
}

/// Gateway for a standalone node: no peers, nothing to fetch, nobody to
/// notify.
pub struct NullGateway;

impl PeerGateway for NullGateway {
    fn fetch_chain(&self, _neighbor: &str) -> Option<Vec<Block>> {
        None
    }

    fn notify_new_block(&self, _neighbor: &str, _block: &Block) {}
}

/// In-process transport: a registry of ledgers keyed by node name, standing
/// in for the wire. Tests and the multi-node simulation run on this.
pub struct InProcessGateway {
    registry: RwLock<HashMap<String, Arc<RwLock<LedgerCore>>>>,
}

impl Default for InProcessGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InProcessGateway {
    pub fn new() -> InProcessGateway {
        InProcessGateway {
            registry: RwLock::new(HashMap::new()),
        }
    }

    pub fn register(&self, name: &str, ledger: Arc<RwLock<LedgerCore>>) {
        let mut registry = self
            .registry
            .write()
            .expect("Failed to acquire write lock on gateway registry - this should never happen");
        registry.insert(name.to_string(), ledger);
    }
}

impl PeerGateway for InProcessGateway {
    fn fetch_chain(&self, neighbor: &str) -> Option<Vec<Block>> {
        let registry = self
            .registry
            .read()
            .expect("Failed to acquire read lock on gateway registry - this should never happen");
        let ledger = registry.get(neighbor)?;
        let ledger = ledger
            .read()
            .expect("Failed to acquire read lock on ledger - this should never happen");
        Some(ledger.get_chain().to_vec())
    }

    fn notify_new_block(&self, neighbor: &str, block: &Block) {
        // Snapshot phase: collect the candidate chains the neighbor can see
        // before touching its ledger. At most one ledger lock is ever held
        // at a time.
        let target = {
            let registry = self.registry.read().expect(
                "Failed to acquire read lock on gateway registry - this should never happen",
            );
            match registry.get(neighbor) {
                Some(target) => Arc::clone(target),
                None => {
                    warn!("Cannot notify unknown neighbor {neighbor}");
                    return;
                }
            }
        };

        let neighbor_names = {
            let ledger = target
                .read()
                .expect("Failed to acquire read lock on ledger - this should never happen");
            ledger.get_neighbors().to_vec()
        };
        let mut candidates = vec![];
        {
            let registry = self.registry.read().expect(
                "Failed to acquire read lock on gateway registry - this should never happen",
            );
            for name in &neighbor_names {
                if let Some(ledger) = registry.get(name) {
                    let ledger = ledger
                        .read()
                        .expect("Failed to acquire read lock on ledger - this should never happen");
                    candidates.push(ledger.get_chain().to_vec());
                }
            }
        }

        // Mutation phase: one write lock on the notified ledger.
        let mut ledger = target
            .write()
            .expect("Failed to acquire write lock on ledger - this should never happen");
        ledger.clear_transaction_pool();
        let replaced = ledger.resolve_conflicts(candidates);
        info!(
            "Notified {neighbor} of block {}: chain {}",
            block.get_index(),
            if replaced { "replaced" } else { "kept" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MINING_SENDER;
    use crate::testkit::shared_ledger;

    #[test]
    fn test_fetch_chain_unknown_neighbor() {
        let gateway = InProcessGateway::new();
        assert!(gateway.fetch_chain("nowhere").is_none());
    }

    #[test]
    fn test_fetch_chain_returns_registered_chain() {
        let gateway = InProcessGateway::new();
        let ledger = shared_ledger("miner-a", 0);
        gateway.register("a", Arc::clone(&ledger));

        let chain = gateway.fetch_chain("a").unwrap();
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_notify_clears_pool_and_adopts_longer_chain() {
        let gateway = InProcessGateway::new();
        let ledger_a = shared_ledger("miner-a", 0);
        let ledger_b = shared_ledger("miner-b", 0);
        gateway.register("a", Arc::clone(&ledger_a));
        gateway.register("b", Arc::clone(&ledger_b));
        ledger_b.write().unwrap().register_neighbor("a");

        // Grow a's chain past b's and leave a pending transaction on b.
        let block = {
            let mut ledger = ledger_a.write().unwrap();
            ledger.create_block(1, None).unwrap();
            ledger.create_block(2, None).unwrap()
        };
        ledger_b
            .write()
            .unwrap()
            .add_transaction(MINING_SENDER, "miner-b", 1.0, None, None);

        gateway.notify_new_block("b", &block);

        let ledger = ledger_b.read().unwrap();
        assert_eq!(ledger.get_chain().len(), 3);
        assert!(ledger.get_transaction_pool().is_empty());
    }

    #[test]
    fn test_notify_unknown_neighbor_is_harmless() {
        let gateway = InProcessGateway::new();
        let ledger = shared_ledger("miner-a", 0);
        let block = ledger.write().unwrap().create_block(1, None).unwrap();

        gateway.notify_new_block("nowhere", &block);
    }

    #[test]
    fn test_null_gateway_does_nothing() {
        let gateway = NullGateway;
        assert!(gateway.fetch_chain("anyone").is_none());

        let ledger = shared_ledger("miner-a", 0);
        let block = ledger.write().unwrap().create_block(1, None).unwrap();
        gateway.notify_new_block("anyone", &block);
    }
}
