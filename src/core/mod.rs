//! Core ledger functionality
//!
//! This module contains the fundamental components: blocks, transactions,
//! the in-memory ledger, proof-of-work search, and chain conflict
//! resolution.

pub mod block;
pub mod consensus;
pub mod ledger;
pub mod proof_of_work;
pub mod transaction;

pub use block::Block;
pub use consensus::{is_valid_chain, select_longest_valid};
pub use ledger::LedgerCore;
pub use proof_of_work::{is_valid_proof, ProofOfWork};
pub use transaction::{Transaction, TransferRequest, MINING_SENDER};
