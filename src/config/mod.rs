//! Configuration management
//!
//! This module holds the node behavior settings: mining difficulty and
//! reward, scheduler intervals, and the optional balance enforcement policy.
//! Settings are plain values constructed up front and injected; nothing here
//! is global.

pub mod settings;

pub use settings::Settings;
