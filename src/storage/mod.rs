//! In-memory storage
//!
//! The ledger keeps everything in memory; this module holds the pool of
//! transactions waiting to be committed.

pub mod memory_pool;

pub use memory_pool::MemoryPool;
