//! Utility functions and helpers
//!
//! Hashing, timestamps and the canonical JSON encoding used throughout the ledger.

pub mod crypto;
pub mod serialization;

pub use crypto::{current_timestamp, sha256_digest, sha256_hex};

pub use serialization::{deserialize, serialize};
