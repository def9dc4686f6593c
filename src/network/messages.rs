//! Request and response bodies of the node's HTTP interface
//!
//! Field names are part of the wire contract: peers decode each other's
//! `/chain` responses with these same types.

use crate::core::{Block, Transaction};
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

pub const MINED_MESSAGE: &str = "New Block Forged";
pub const NODES_ADDED_MESSAGE: &str = "New nodes have been added";
pub const CHAIN_REPLACED_MESSAGE: &str = "Our chain was replaced";
pub const CHAIN_AUTHORITATIVE_MESSAGE: &str = "Our chain is authoritative";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl MineResponse {
    pub fn from_block(block: Block) -> MineResponse {
        MineResponse {
            message: MINED_MESSAGE.to_string(),
            index: block.get_index(),
            transactions: block.get_transactions().to_vec(),
            proof: block.get_proof(),
            previous_hash: block.get_previous_hash().to_string(),
        }
    }
}

/// Body of a transaction submission. Missing fields decode as empty so the
/// "missing values" check can reject them uniformly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionRequest {
    pub sender: String,
    pub recipient: String,
    pub amount: f64,
}

impl TransactionRequest {
    pub fn into_transaction(self) -> Result<Transaction> {
        let tx = Transaction::new(self.sender, self.recipient, self.amount);
        tx.validate()?;
        Ok(tx)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// The full chain export, also what the chain fetcher expects from peers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainResponse {
    pub length: usize,
    pub chain: Vec<Block>,
}

impl ChainResponse {
    pub fn new(chain: Vec<Block>) -> ChainResponse {
        ChainResponse {
            length: chain.len(),
            chain,
        }
    }

    /// The chain, provided the reported length matches what was sent
    pub fn into_chain(self) -> Result<Vec<Block>> {
        if self.length != self.chain.len() {
            return Err(LedgerError::InvalidChain(format!(
                "reported length {} but carried {} blocks",
                self.length,
                self.chain.len()
            )));
        }
        Ok(self.chain)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub nodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub message: String,
    pub chain: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
