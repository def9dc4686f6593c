//! Configuration management
//!
//! This module handles the node settings: listen address, node identifier,
//! bootstrap peers and network timeouts.

pub mod settings;

pub use settings::Config;
