// Longest-valid-chain consensus
// I pull every peer's chain, keep the longest one that actually validates,
// and swap it in only if it beats what I already have
// No lock is held while peers are being asked

use crate::core::{Block, ChainValidator, Ledger};
use crate::error::{LedgerError, Result};
use crate::network::{ChainFetcher, NodeRegistry};
use log::{info, warn};
use std::thread;

/// Outcome of a resolution round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A longer valid peer chain replaced ours
    Replaced,
    /// Ours was kept
    Authoritative,
}

pub struct ConsensusResolver {
    fetcher: Box<dyn ChainFetcher>,
}

impl ConsensusResolver {
    pub fn new(fetcher: Box<dyn ChainFetcher>) -> ConsensusResolver {
        ConsensusResolver { fetcher }
    }

    pub fn resolve(&self, ledger: &Ledger, registry: &NodeRegistry) -> Resolution {
        let local_length = ledger.len();
        let peers = registry.list();

        // Peers are independent, so I ask them all at once
        let fetched: Vec<(String, Result<Vec<Block>>)> = thread::scope(|scope| {
            let handles: Vec<_> = peers
                .iter()
                .map(|peer| {
                    scope.spawn(move || {
                        let chain = self
                            .fetcher
                            .fetch_chain(peer)
                            .and_then(|response| response.into_chain());
                        (peer.clone(), chain)
                    })
                })
                .collect();
            handles
                .into_iter()
                .zip(peers.iter())
                .map(|(handle, peer)| match handle.join() {
                    Ok(result) => result,
                    Err(_) => (
                        peer.clone(),
                        Err(LedgerError::Network("chain fetch panicked".to_string())),
                    ),
                })
                .collect()
        });

        let mut best_length = local_length;
        let mut best_chain: Option<Vec<Block>> = None;

        for (peer, result) in fetched {
            let chain = match result {
                Ok(chain) => chain,
                Err(e) => {
                    warn!("Skipping peer {peer}: {e}");
                    continue;
                }
            };

            if chain.len() <= best_length {
                continue;
            }
            if !ChainValidator::validate(&chain) {
                info!(
                    "Discarding chain of length {} from {peer}: failed validation",
                    chain.len()
                );
                continue;
            }
            best_length = chain.len();
            best_chain = Some(chain);
        }

        if let Some(chain) = best_chain {
            if ledger.replace_chain(chain) {
                info!("Chain replaced, new length {best_length}");
                return Resolution::Replaced;
            }
        }
        Resolution::Authoritative
    }
}
