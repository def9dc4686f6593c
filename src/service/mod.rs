//! Boundary operations
//!
//! The five operations the transport exposes (mine, submit a transaction,
//! export the chain, register peers, resolve consensus), implemented over an
//! explicit node context rather than process-wide state.

pub mod context;

pub use context::NodeContext;
