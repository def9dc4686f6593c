use crate::core::Transaction;
use crate::error::Result;
use crate::utils::{current_timestamp, serialize, sha256_hex};
use serde::{Deserialize, Serialize};

/// Proof carried by every genesis block
pub const GENESIS_PROOF: u64 = 100;

/// Previous-hash sentinel carried by every genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// One ledger entry. The field order below is the canonical hash encoding,
/// and peers depend on it to recompute `previous_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    index: u64,
    timestamp: i64, // milliseconds since the Unix epoch
    transactions: Vec<Transaction>,
    proof: u64,
    previous_hash: String,
}

impl Block {
    pub fn new_block(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Result<Block> {
        Ok(Block::from_parts(
            index,
            current_timestamp()?,
            transactions,
            proof,
            previous_hash,
        ))
    }

    pub fn from_parts(
        index: u64,
        timestamp: i64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Block {
        Block {
            index,
            timestamp,
            transactions,
            proof,
            previous_hash,
        }
    }

    pub fn generate_genesis_block() -> Result<Block> {
        Block::new_block(
            1,
            Vec::new(),
            GENESIS_PROOF,
            String::from(GENESIS_PREVIOUS_HASH),
        )
    }

    /// SHA-256 over the canonical JSON encoding, as lowercase hex
    pub fn hash(&self) -> Result<String> {
        let encoded = serialize(self)?;
        Ok(sha256_hex(&encoded))
    }

    pub fn get_index(&self) -> u64 {
        self.index
    }

    pub fn get_timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn get_transactions(&self) -> &[Transaction] {
        self.transactions.as_slice()
    }

    pub fn get_proof(&self) -> u64 {
        self.proof
    }

    pub fn get_previous_hash(&self) -> &str {
        self.previous_hash.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_block() -> Block {
        Block::from_parts(
            2,
            1_700_000_000_000,
            vec![Transaction::new("A", "B", 5.0)],
            35293,
            "abc".to_string(),
        )
    }

    #[test]
    fn test_genesis_block() {
        let genesis = Block::generate_genesis_block().unwrap();
        assert_eq!(genesis.get_index(), 1);
        assert_eq!(genesis.get_proof(), GENESIS_PROOF);
        assert_eq!(genesis.get_previous_hash(), GENESIS_PREVIOUS_HASH);
        assert!(genesis.get_transactions().is_empty());
    }

    #[test]
    fn test_canonical_encoding() {
        let encoded = String::from_utf8(serialize(&sample_block()).unwrap()).unwrap();
        assert_eq!(
            encoded,
            r#"{"index":2,"timestamp":1700000000000,"transactions":[{"sender":"A","recipient":"B","amount":5.0}],"proof":35293,"previous_hash":"abc"}"#
        );
    }

    #[test]
    fn test_identical_blocks_hash_identically() {
        let a = sample_block();
        let b = sample_block();
        assert_eq!(a.hash().unwrap(), b.hash().unwrap());
        assert_eq!(a.hash().unwrap().len(), 64);
    }

    #[test]
    fn test_hash_changes_with_any_field() {
        let base = sample_block().hash().unwrap();
        let changed = Block::from_parts(
            2,
            1_700_000_000_000,
            vec![Transaction::new("A", "B", 5.0)],
            35294,
            "abc".to_string(),
        );
        assert_ne!(base, changed.hash().unwrap());
    }

    #[test]
    fn test_hash_survives_wire_roundtrip() {
        let block = sample_block();
        let json = serde_json::to_string(&block).unwrap();
        let decoded: Block = serde_json::from_str(&json).unwrap();
        assert_eq!(block.hash().unwrap(), decoded.hash().unwrap());
    }
}
