//! Shared helpers for exercising the ledger in tests
//!
//! This module provides ready-made settings, ledgers, wallets, and mined
//! chains so individual tests can focus on the behavior under test.

pub mod test_utils;

pub use test_utils::*;
