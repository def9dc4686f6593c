//! # pow-ledger - a minimal proof-of-work ledger node
//!
//! An append-only chain of blocks secured by a proof-of-work puzzle,
//! replicated across independent nodes that reconcile diverging histories
//! by adopting the longest chain that validates.
//!
//! ## How the code is organized
//! - `core/`: blocks, transactions, the proof-of-work puzzle, the ledger and
//!   the chain validator
//! - `storage/`: the pool of transactions waiting for the next block
//! - `network/`: peer registry, chain fetcher, consensus resolver and the
//!   HTTP server
//! - `service/`: the node context implementing the five node operations
//! - `config/`: layered node settings
//! - `utils/`: hashing, timestamps and the canonical JSON encoding
//! - `cli/`: command-line interface
//!
//! Everything is in memory; a restarted node starts again from genesis and
//! catches up through consensus resolution.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod network;
pub mod service;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::Config;
pub use core::{
    Block, ChainValidator, Ledger, ProofOfWork, Transaction, DIFFICULTY_PREFIX,
    GENESIS_PREVIOUS_HASH, GENESIS_PROOF,
};
pub use error::{LedgerError, Result};
pub use network::{
    ChainFetcher, ChainResponse, ConsensusResolver, HttpChainFetcher, NodeRegistry, Resolution,
    Server,
};
pub use service::NodeContext;
pub use storage::MemoryPool;
pub use utils::{current_timestamp, sha256_digest, sha256_hex};
