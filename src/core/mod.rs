//! Core ledger functionality
//!
//! This module contains the ledger data model, the proof-of-work puzzle,
//! the ledger itself and the chain validator.

pub mod block;
pub mod ledger;
pub mod monetary;
pub mod proof_of_work;
pub mod transaction;
pub mod validator;

pub use block::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
pub use ledger::Ledger;
pub use monetary::{MINING_REWARD, REWARD_SENDER};
pub use proof_of_work::{ProofOfWork, CANCEL_POLL_INTERVAL, DIFFICULTY_PREFIX};
pub use transaction::Transaction;
pub use validator::ChainValidator;
