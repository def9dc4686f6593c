use crate::core::Transaction;

/// Transactions waiting for the next block, in submission order.
///
/// The pool has no lock of its own: the ledger keeps it behind the same lock
/// as the chain so that taking the pool and appending the block happen in
/// one step.
#[derive(Debug, Clone, Default)]
pub struct MemoryPool {
    inner: Vec<Transaction>,
}

impl MemoryPool {
    pub fn new() -> MemoryPool {
        MemoryPool { inner: Vec::new() }
    }

    pub fn add(&mut self, tx: Transaction) {
        self.inner.push(tx);
    }

    /// Move every pending transaction out, leaving the pool empty
    pub fn take_all(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.inner)
    }

    pub fn get_all(&self) -> Vec<Transaction> {
        self.inner.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
