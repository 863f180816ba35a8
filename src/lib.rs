//! # Orechain - My Proof-of-Work Ledger Node
//!
//! This is my single-process proof-of-work ledger, built to make the whole
//! consensus loop visible in one place. When I come back to this code,
//! here's what I need to remember:
//!
//! ## What I Built
//! - **In-Memory Chain**: Append-only blocks hashed over one canonical JSON form
//! - **Signed Transfers**: ECDSA P-256 signatures checked at the submission boundary
//! - **Proof-of-Work**: Leading-zero hex puzzle, cancellable search off the lock
//! - **Conflict Resolution**: Longest fully valid neighbor chain wins, ties keep ours
//! - **Schedulers**: Mining and sync loops on worker threads with clean shutdown
//! - **Wallets**: P-256 keypairs with Bitcoin-style Base58Check addresses
//!
//! ## How I Organized My Code
//! - `core/`: The heart of the ledger (blocks, transactions, mining, consensus)
//! - `wallet/`: Key management, address derivation, transfer signing
//! - `network/`: The gateway seam peers plug into, plus an in-process transport
//! - `node/`: The node facade and the mining/sync workers
//! - `config/`: Settings with environment overrides
//! - `utils/`: Cryptographic functions and the canonical serializer
//! - `cli/`: Command-line interface for wallets, demos, and simulations
//!
//! ## Key Design Decisions I Made
//! - Everything lives in memory; a fresh process means a fresh chain
//! - One canonical serialization (struct declaration order) feeds every digest
//! - Verification failures reject with false; errors are for broken machinery
//! - Balances may go negative unless enforcement is switched on
//! - No singletons: the ledger, settings, and gateway are all injected
//!
//! ## When I Need to Understand Something
//! 1. Start with `main.rs` to see the CLI commands
//! 2. Look at `core/ledger.rs` for the chain and pool logic
//! 3. Check `core/proof_of_work.rs` for the puzzle and the search
//! 4. Review `node/miner.rs` for the lock phases around mining
//! 5. Examine `network/gateway.rs` for how nodes see each other

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod node;
pub mod utils;
pub mod wallet;

#[cfg(test)]
pub mod testkit;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::Settings;
pub use core::{
    is_valid_chain, is_valid_proof, select_longest_valid, Block, LedgerCore, ProofOfWork,
    Transaction, TransferRequest, MINING_SENDER,
};
pub use error::{LedgerError, Result};
pub use network::{InProcessGateway, NullGateway, PeerGateway};
pub use node::{Miner, Node, Syncer};
pub use utils::{
    base58_decode, base58_encode, canonical_json, canonical_json_bytes, current_timestamp,
    ecdsa_p256_sha256_sign, ecdsa_p256_sha256_verify, new_key_pair, ripemd160_digest,
    sha256_digest, sha256_hex,
};
pub use wallet::{derive_address, hash_pub_key, validate_address, Wallet, ADDRESS_CHECK_SUM_LEN};
