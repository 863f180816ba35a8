use crate::core::LedgerCore;
use crate::network::PeerGateway;
use crate::node::semaphore::TrySemaphore;
use log::{error, info, warn};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

struct Worker {
    shutdown: Sender<()>,
    handle: JoinHandle<()>,
}

/// Periodically reconciles the local chain against every registered
/// neighbor: fetch their chains through the gateway, keep the longest valid
/// one. Rounds that overlap are dropped by a non-blocking permit, the same
/// discipline the miner uses.
pub struct Syncer {
    ledger: Arc<RwLock<LedgerCore>>,
    gateway: Arc<dyn PeerGateway>,
    guard: Arc<TrySemaphore>,
    interval: Duration,
    worker: Mutex<Option<Worker>>,
}

impl Syncer {
    pub fn new(ledger: Arc<RwLock<LedgerCore>>, gateway: Arc<dyn PeerGateway>) -> Syncer {
        let interval = {
            let ledger = ledger
                .read()
                .expect("Failed to acquire read lock on ledger - this should never happen");
            ledger.get_settings().sync_interval
        };
        Syncer {
            ledger,
            gateway,
            guard: Arc::new(TrySemaphore::new()),
            interval,
            worker: Mutex::new(None),
        }
    }

    /// One consensus round. True when the local chain was replaced.
    pub fn sync_once(&self) -> bool {
        sync_attempt(&self.ledger, self.gateway.as_ref(), &self.guard)
    }

    /// Start the periodic loop. Calling start on a running syncer does
    /// nothing.
    pub fn start(&self) {
        let mut worker = self
            .worker
            .lock()
            .expect("Failed to acquire lock on sync worker - this should never happen");
        if worker.is_some() {
            return;
        }

        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        let ledger = Arc::clone(&self.ledger);
        let gateway = Arc::clone(&self.gateway);
        let guard = Arc::clone(&self.guard);
        let interval = self.interval;

        let handle = thread::spawn(move || {
            info!("Sync loop started");
            loop {
                sync_attempt(&ledger, gateway.as_ref(), &guard);
                match shutdown_rx.recv_timeout(interval) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {}
                }
            }
            info!("Sync loop stopped");
        });

        *worker = Some(Worker {
            shutdown: shutdown_tx,
            handle,
        });
    }

    /// Stop the periodic loop and wait for the worker thread to finish.
    /// Stopping a stopped syncer does nothing.
    pub fn stop(&self) {
        let worker = {
            let mut worker = self
                .worker
                .lock()
                .expect("Failed to acquire lock on sync worker - this should never happen");
            worker.take()
        };
        if let Some(worker) = worker {
            let _ = worker.shutdown.send(());
            if worker.handle.join().is_err() {
                error!("Sync worker thread panicked");
            }
        }
    }
}

impl Drop for Syncer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn sync_attempt(
    ledger: &Arc<RwLock<LedgerCore>>,
    gateway: &dyn PeerGateway,
    guard: &TrySemaphore,
) -> bool {
    let _permit = match guard.try_acquire() {
        Some(permit) => permit,
        None => {
            info!("Sync already in progress; round dropped");
            return false;
        }
    };

    let neighbors = {
        let ledger = ledger
            .read()
            .expect("Failed to acquire read lock on ledger - this should never happen");
        ledger.get_neighbors().to_vec()
    };

    // Fetch outside the lock; unreachable neighbors are skipped.
    let mut candidates = vec![];
    for neighbor in &neighbors {
        match gateway.fetch_chain(neighbor.as_str()) {
            Some(chain) => candidates.push(chain),
            None => warn!("Neighbor {neighbor} did not return a chain"),
        }
    }

    let mut ledger = ledger
        .write()
        .expect("Failed to acquire write lock on ledger - this should never happen");
    ledger.resolve_conflicts(candidates)
}
