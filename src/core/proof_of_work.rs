use crate::error::{LedgerError, Result};
use crate::utils::sha256_hex;
use log::{debug, info};

/// Leading hex characters a valid digest must carry. Fixed difficulty, so
/// every guess has roughly a 1 in 65536 chance.
pub const DIFFICULTY_PREFIX: &str = "0000";

/// How many candidates are tried between two cancellation checks
pub const CANCEL_POLL_INTERVAL: u64 = 1024;

/// Proof search against the proof of the chain's last block
pub struct ProofOfWork {
    last_proof: u64,
}

impl ProofOfWork {
    pub fn new_proof_of_work(last_proof: u64) -> ProofOfWork {
        ProofOfWork { last_proof }
    }

    /// First proof from 0 upward that satisfies the difficulty predicate.
    /// Fails only if no candidate in the whole `u64` range qualifies.
    pub fn search(last_proof: u64) -> Result<u64> {
        let pow = ProofOfWork::new_proof_of_work(last_proof);
        pow.run_until(|| false).ok_or_else(|| {
            LedgerError::Mining(format!("no proof exists for last proof {last_proof}"))
        })
    }

    /// Check `proof` against the previous block's proof
    pub fn validate(last_proof: u64, proof: u64) -> bool {
        let data = Self::prepare_data(last_proof, proof);
        sha256_hex(data.as_bytes()).starts_with(DIFFICULTY_PREFIX)
    }

    // Both proofs as decimal strings, concatenated
    fn prepare_data(last_proof: u64, proof: u64) -> String {
        format!("{last_proof}{proof}")
    }

    pub fn get_last_proof(&self) -> u64 {
        self.last_proof
    }

    /// Search until a proof is found or `cancelled` reports true. The
    /// predicate is polled every `CANCEL_POLL_INTERVAL` candidates.
    pub fn run_until<F>(&self, cancelled: F) -> Option<u64>
    where
        F: Fn() -> bool,
    {
        self.run_from(0, cancelled)
    }

    // None also when the candidates run out at u64::MAX
    fn run_from<F>(&self, start: u64, cancelled: F) -> Option<u64>
    where
        F: Fn() -> bool,
    {
        debug!("Searching proof against last proof {}", self.last_proof);
        let mut proof = start;
        loop {
            if proof % CANCEL_POLL_INTERVAL == 0 && cancelled() {
                info!(
                    "Proof search against {} cancelled after {proof} candidates",
                    self.last_proof
                );
                return None;
            }
            if Self::validate(self.last_proof, proof) {
                debug!("Found proof {proof} for last proof {}", self.last_proof);
                return Some(proof);
            }
            if proof == u64::MAX {
                debug!("Proof space against {} exhausted", self.last_proof);
                return None;
            }
            proof += 1;
        }
    }
}
