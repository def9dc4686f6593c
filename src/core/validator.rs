use crate::core::{Block, ProofOfWork};
use log::{debug, error};

/// Integrity checks for a candidate chain, typically one a peer sent us
pub struct ChainValidator;

impl ChainValidator {
    /// Whether the chain starts at index 1 and every later block links to
    /// its predecessor by hash, continues its index, and carries a proof
    /// valid against its predecessor's proof. Stops at the first violation.
    pub fn validate(chain: &[Block]) -> bool {
        let Some(first) = chain.first() else {
            debug!("Rejecting empty chain");
            return false;
        };
        if first.get_index() != 1 {
            debug!("Chain starts at index {}", first.get_index());
            return false;
        }

        for pair in chain.windows(2) {
            let (previous, block) = (&pair[0], &pair[1]);

            let previous_hash = match previous.hash() {
                Ok(hash) => hash,
                Err(e) => {
                    error!("Failed to hash block {}: {e}", previous.get_index());
                    return false;
                }
            };
            if block.get_previous_hash() != previous_hash {
                debug!("Block {} does not link to its predecessor", block.get_index());
                return false;
            }

            if block.get_index() != previous.get_index() + 1 {
                debug!(
                    "Block {} follows block {}",
                    block.get_index(),
                    previous.get_index()
                );
                return false;
            }

            if !ProofOfWork::validate(previous.get_proof(), block.get_proof()) {
                debug!("Block {} carries an invalid proof", block.get_index());
                return false;
            }
        }
        true
    }
}
