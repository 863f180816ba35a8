//! Node lifecycle and background work
//!
//! A node wraps one shared ledger with the two workers that act on it: the
//! miner and the syncer. Both follow the same discipline - explicit worker
//! threads, a non-blocking permit so attempts drop instead of queueing, and
//! a shutdown channel so stop always joins promptly.

pub mod miner;
#[allow(clippy::module_inception)]
pub mod node;
mod semaphore;
pub mod syncer;

pub use miner::Miner;
pub use node::Node;
pub use syncer::Syncer;
