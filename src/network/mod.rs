//! Peer transport seam
//!
//! This module defines the capability boundary between the ledger core and
//! whatever carries bytes between nodes: fetching a neighbor's chain and
//! announcing a freshly mined block. The in-process implementation wires
//! several ledgers together inside one process for tests and simulations.

pub mod gateway;

pub use gateway::{InProcessGateway, NullGateway, PeerGateway};
