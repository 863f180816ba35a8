// Mining runs in three phases so the ledger lock is never held during the
// proof search: append the reward and snapshot the work under the write
// lock, search unlocked, then re-lock to seal the block. Reads stay
// responsive however long the search takes.

use crate::core::{LedgerCore, ProofOfWork, MINING_SENDER};
use crate::network::PeerGateway;
use crate::node::semaphore::TrySemaphore;
use log::{error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

struct Worker {
    shutdown: Sender<()>,
    handle: JoinHandle<()>,
}

/// Mines blocks against a shared ledger, one attempt at a time. Attempts
/// that arrive while another is in flight are dropped, not queued, whether
/// they come from the periodic loop or a direct call.
pub struct Miner {
    ledger: Arc<RwLock<LedgerCore>>,
    gateway: Arc<dyn PeerGateway>,
    guard: Arc<TrySemaphore>,
    cancel: Arc<AtomicBool>,
    interval: Duration,
    difficulty: usize,
    max_nonce: u64,
    worker: Mutex<Option<Worker>>,
}

impl Miner {
    pub fn new(ledger: Arc<RwLock<LedgerCore>>, gateway: Arc<dyn PeerGateway>) -> Miner {
        let (interval, difficulty, max_nonce) = {
            let ledger = ledger
                .read()
                .expect("Failed to acquire read lock on ledger - this should never happen");
            let settings = ledger.get_settings();
            (
                settings.mining_interval,
                settings.mining_difficulty,
                settings.max_nonce,
            )
        };
        Miner {
            ledger,
            gateway,
            guard: Arc::new(TrySemaphore::new()),
            cancel: Arc::new(AtomicBool::new(false)),
            interval,
            difficulty,
            max_nonce,
            worker: Mutex::new(None),
        }
    }

    /// One mining attempt. True when a block was mined and appended; false
    /// when another attempt held the permit, the search was cancelled, or
    /// the nonce cap ran out.
    pub fn mine_once(&self) -> bool {
        mine_attempt(
            &self.ledger,
            self.gateway.as_ref(),
            &self.guard,
            &self.cancel,
            self.difficulty,
            self.max_nonce,
        )
    }

    /// Start the periodic loop: one attempt, then a pause, until stopped.
    /// Calling start on a running miner does nothing.
    pub fn start(&self) {
        let mut worker = self
            .worker
            .lock()
            .expect("Failed to acquire lock on mining worker - this should never happen");
        if worker.is_some() {
            return;
        }
        self.cancel.store(false, Ordering::SeqCst);

        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        let ledger = Arc::clone(&self.ledger);
        let gateway = Arc::clone(&self.gateway);
        let guard = Arc::clone(&self.guard);
        let cancel = Arc::clone(&self.cancel);
        let interval = self.interval;
        let difficulty = self.difficulty;
        let max_nonce = self.max_nonce;

        let handle = thread::spawn(move || {
            info!("Mining loop started");
            loop {
                mine_attempt(
                    &ledger,
                    gateway.as_ref(),
                    &guard,
                    &cancel,
                    difficulty,
                    max_nonce,
                );
                match shutdown_rx.recv_timeout(interval) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {}
                }
            }
            info!("Mining loop stopped");
        });

        *worker = Some(Worker {
            shutdown: shutdown_tx,
            handle,
        });
    }

    /// Stop the periodic loop and abort any in-flight proof search, then
    /// wait for the worker thread to finish. Manual attempts stay available
    /// afterwards. Stopping a stopped miner does nothing.
    pub fn stop(&self) {
        let worker = {
            let mut worker = self
                .worker
                .lock()
                .expect("Failed to acquire lock on mining worker - this should never happen");
            worker.take()
        };
        if let Some(worker) = worker {
            self.cancel.store(true, Ordering::SeqCst);
            let _ = worker.shutdown.send(());
            if worker.handle.join().is_err() {
                error!("Mining worker thread panicked");
            }
            // The aborted search ended with the join; a flag left raised
            // would turn every later mine_once into a no-op.
            self.cancel.store(false, Ordering::SeqCst);
        }
    }
}

impl Drop for Miner {
    fn drop(&mut self) {
        self.stop();
    }
}

fn mine_attempt(
    ledger: &Arc<RwLock<LedgerCore>>,
    gateway: &dyn PeerGateway,
    guard: &TrySemaphore,
    cancel: &Arc<AtomicBool>,
    difficulty: usize,
    max_nonce: u64,
) -> bool {
    let _permit = match guard.try_acquire() {
        Some(permit) => permit,
        None => {
            info!("Mining already in progress; attempt dropped");
            return false;
        }
    };

    // Phase 1: credit the reward and snapshot the work
    let (transactions, previous_hash) = {
        let mut ledger = ledger
            .write()
            .expect("Failed to acquire write lock on ledger - this should never happen");
        let miner_address = ledger.get_miner_address().to_string();
        let reward = ledger.get_settings().mining_reward;
        ledger.add_transaction(MINING_SENDER, miner_address.as_str(), reward, None, None);

        let previous_hash = match ledger.last_block_hash() {
            Ok(digest) => digest,
            Err(e) => {
                error!("Mining aborted: {e}");
                return false;
            }
        };
        (ledger.get_transaction_pool().to_vec(), previous_hash)
    };

    // Phase 2: proof search with no lock held
    info!("Searching for next proof");
    let mut pow = ProofOfWork::with_max_nonce(difficulty, max_nonce);
    pow.set_cancel_flag(Arc::clone(cancel));
    let nonce = match pow.find_proof(transactions.as_slice(), previous_hash.as_str()) {
        Some(nonce) => nonce,
        None => {
            info!("Proof search ended without a nonce");
            return false;
        }
    };
    info!("Found proof: {nonce}");

    // Phase 3: seal the pool into the next block
    let block = {
        let mut ledger = ledger
            .write()
            .expect("Failed to acquire write lock on ledger - this should never happen");
        match ledger.create_block(nonce, Some(previous_hash)) {
            Ok(block) => block,
            Err(e) => {
                error!("Failed to seal mined block: {e}");
                return false;
            }
        }
    };

    // Let every neighbor know so it can reconcile
    let neighbors = {
        let ledger = ledger
            .read()
            .expect("Failed to acquire read lock on ledger - this should never happen");
        ledger.get_neighbors().to_vec()
    };
    for neighbor in &neighbors {
        gateway.notify_new_block(neighbor.as_str(), &block);
    }

    true
}
