//! Shared fixtures for unit tests: mined chains, forged blocks and a
//! scripted chain fetcher.

pub mod test_utils;

pub use test_utils::*;
