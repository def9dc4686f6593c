// This is the ledger - the chain of committed blocks plus the pool of
// transactions waiting for the next one
// Everything lives in memory behind a single RwLock so that taking the pool
// and appending a block can never interleave with another writer

use crate::core::{Block, Transaction};
use crate::error::{LedgerError, Result};
use crate::storage::MemoryPool;
use crate::utils::current_timestamp;
use log::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// The chain and the pending pool always change together
struct LedgerState {
    chain: Vec<Block>,
    pending: MemoryPool,
}

pub struct Ledger {
    state: RwLock<LedgerState>,
    // Bumped on every commit or replacement so in-flight proof searches can
    // tell that the tip moved under them
    tip_version: AtomicU64,
}

impl Ledger {
    // A brand new ledger holding only the genesis block
    pub fn create_ledger() -> Result<Ledger> {
        let genesis = Block::generate_genesis_block()?;
        Ok(Ledger::with_chain(vec![genesis]))
    }

    // A ledger seeded with an existing chain, which must not be empty
    pub fn from_chain(chain: Vec<Block>) -> Result<Ledger> {
        if chain.is_empty() {
            return Err(LedgerError::EmptyChain);
        }
        Ok(Ledger::with_chain(chain))
    }

    fn with_chain(chain: Vec<Block>) -> Ledger {
        Ledger {
            state: RwLock::new(LedgerState {
                chain,
                pending: MemoryPool::new(),
            }),
            tip_version: AtomicU64::new(0),
        }
    }

    // Every mutation is computed before it is applied, so a poisoned lock
    // still guards consistent data
    fn read_state(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Canonical hash of a block, the one peers use for `previous_hash`
    pub fn hash(block: &Block) -> Result<String> {
        block.hash()
    }

    /// Queue a transaction and return the index of the block that will hold it
    pub fn queue_transaction(&self, tx: Transaction) -> u64 {
        let mut state = self.write_state();
        state.pending.add(tx);
        state.chain.len() as u64 + 1
    }

    /// Commit the pending pool as a new block carrying `proof`
    pub fn commit_block(&self, proof: u64) -> Result<Block> {
        let mut state = self.write_state();
        let block = self.commit_locked(&mut state, proof, None)?;
        info!(
            "Committed block {} with {} transactions",
            block.get_index(),
            block.get_transactions().len()
        );
        Ok(block)
    }

    /// Commit a block found by a proof search against `last_proof`.
    ///
    /// The reward is queued and the block appended under one lock, and only
    /// if the tip still carries `last_proof`. Otherwise nothing changes and
    /// `StaleProof` is returned.
    pub fn commit_mined_block(
        &self,
        last_proof: u64,
        proof: u64,
        reward: Transaction,
    ) -> Result<Block> {
        let mut state = self.write_state();
        let tip_proof = state
            .chain
            .last()
            .ok_or(LedgerError::EmptyChain)?
            .get_proof();
        if tip_proof != last_proof {
            return Err(LedgerError::StaleProof {
                expected: last_proof,
                actual: tip_proof,
            });
        }
        self.commit_locked(&mut state, proof, Some(reward))
    }

    // Everything that can fail runs before the pool is touched
    fn commit_locked(
        &self,
        state: &mut LedgerState,
        proof: u64,
        reward: Option<Transaction>,
    ) -> Result<Block> {
        let last_block = state.chain.last().ok_or(LedgerError::EmptyChain)?;
        let previous_hash = Self::hash(last_block)?;
        let timestamp = current_timestamp()?;
        let index = state.chain.len() as u64 + 1;

        if let Some(reward) = reward {
            state.pending.add(reward);
        }
        let block = Block::from_parts(
            index,
            timestamp,
            state.pending.take_all(),
            proof,
            previous_hash,
        );
        state.chain.push(block.clone());
        self.tip_version.fetch_add(1, Ordering::SeqCst);
        Ok(block)
    }

    pub fn last_block(&self) -> Result<Block> {
        self.read_state()
            .chain
            .last()
            .cloned()
            .ok_or(LedgerError::EmptyChain)
    }

    /// Snapshot of the whole chain
    pub fn chain(&self) -> Vec<Block> {
        self.read_state().chain.clone()
    }

    pub fn len(&self) -> usize {
        self.read_state().chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_state().chain.is_empty()
    }

    /// Snapshot of the transactions waiting for the next block
    pub fn pending(&self) -> Vec<Transaction> {
        self.read_state().pending.get_all()
    }

    pub fn tip_version(&self) -> u64 {
        self.tip_version.load(Ordering::SeqCst)
    }

    /// Swap in `candidate` if it is still strictly longer than our chain.
    ///
    /// Callers validate the candidate first; the length is rechecked here
    /// because the local chain may have grown since they looked.
    pub fn replace_chain(&self, candidate: Vec<Block>) -> bool {
        let mut state = self.write_state();
        if candidate.len() <= state.chain.len() {
            return false;
        }
        info!(
            "Replacing chain of length {} with chain of length {}",
            state.chain.len(),
            candidate.len()
        );
        state.chain = candidate;
        self.tip_version.fetch_add(1, Ordering::SeqCst);
        true
    }
}
