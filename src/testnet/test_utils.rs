//! Test utilities for ledger and consensus testing

use crate::core::{Block, Ledger, ProofOfWork, Transaction};
use crate::error::{LedgerError, Result};
use crate::network::{ChainFetcher, ChainResponse};
use std::collections::HashMap;

/// Mine `extra_blocks` blocks on top of `ledger`, one transfer per block
pub fn mine_blocks(ledger: &Ledger, extra_blocks: usize) -> Result<()> {
    for i in 0..extra_blocks {
        ledger.queue_transaction(Transaction::new("alice", "bob", i as f64 + 1.0));
        let last = ledger.last_block()?;
        let proof = ProofOfWork::search(last.get_proof())?;
        ledger.commit_block(proof)?;
    }
    Ok(())
}

/// A valid chain of exactly `length` blocks, genesis included
pub fn build_valid_chain(length: usize) -> Vec<Block> {
    let ledger = Ledger::create_ledger().expect("genesis block");
    mine_blocks(&ledger, length.saturating_sub(1)).expect("mining test blocks");
    ledger.chain()
}

/// Rewrite a block through its JSON form, the way a forging peer would
pub fn tamper<F>(block: &Block, edit: F) -> Block
where
    F: FnOnce(&mut serde_json::Value),
{
    let mut value = serde_json::to_value(block).expect("block to json");
    edit(&mut value);
    serde_json::from_value(value).expect("json to block")
}

/// A chain fetcher answering from a fixed script instead of the network
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: HashMap<String, Result<ChainResponse>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chain(self, peer: &str, chain: Vec<Block>) -> Self {
        let length = chain.len();
        self.with_response(peer, length, chain)
    }

    pub fn with_response(mut self, peer: &str, length: usize, chain: Vec<Block>) -> Self {
        self.responses
            .insert(peer.to_string(), Ok(ChainResponse { length, chain }));
        self
    }

    pub fn with_failure(mut self, peer: &str) -> Self {
        self.responses.insert(
            peer.to_string(),
            Err(LedgerError::Network(format!("{peer} is unreachable"))),
        );
        self
    }
}

impl ChainFetcher for ScriptedFetcher {
    fn fetch_chain(&self, peer: &str) -> Result<ChainResponse> {
        self.responses
            .get(peer)
            .cloned()
            .unwrap_or_else(|| Err(LedgerError::Network(format!("unknown peer {peer}"))))
    }
}
