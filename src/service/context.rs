// The node context - one owned object holding everything a request handler
// may touch: the ledger, the peer registry, the consensus resolver and this
// node's identity. main builds it once and shares it through an Arc

use crate::config::Config;
use crate::core::{Ledger, ProofOfWork, Transaction};
use crate::error::{LedgerError, Result};
use crate::network::{
    ChainFetcher, ChainResponse, ConsensusResolver, HttpChainFetcher, MessageResponse,
    MineResponse, NodeRegistry, RegisterRequest, RegisterResponse, Resolution, ResolveResponse,
    TransactionRequest, CHAIN_AUTHORITATIVE_MESSAGE, CHAIN_REPLACED_MESSAGE, NODES_ADDED_MESSAGE,
};
use log::{info, warn};
use std::time::Duration;

// Points in a mining attempt where the tip may be read again by someone else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MiningStep {
    Searching,
    Committing,
}

pub struct NodeContext {
    ledger: Ledger,
    registry: NodeRegistry,
    resolver: ConsensusResolver,
    node_identifier: String,
    mining_attempts: u32,
}

impl NodeContext {
    pub fn new(
        node_identifier: impl Into<String>,
        fetcher: Box<dyn ChainFetcher>,
        mining_attempts: u32,
    ) -> Result<NodeContext> {
        Ok(NodeContext {
            ledger: Ledger::create_ledger()?,
            registry: NodeRegistry::new(),
            resolver: ConsensusResolver::new(fetcher),
            node_identifier: node_identifier.into(),
            mining_attempts: mining_attempts.max(1),
        })
    }

    // A context wired to the real HTTP fetcher, with the bootstrap peers
    // from the configuration already registered
    pub fn from_config(config: &Config) -> Result<NodeContext> {
        let fetcher = HttpChainFetcher::new(Duration::from_millis(config.fetch_timeout_ms));
        let context = NodeContext::new(
            config.node_id.clone(),
            Box::new(fetcher),
            config.mining_attempts,
        )?;
        context.registry.register_all(&config.peers)?;
        Ok(context)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn node_identifier(&self) -> &str {
        self.node_identifier.as_str()
    }

    // Mine: search a proof against the current tip without holding any lock,
    // then commit the reward and the pending pool in one step
    // If another block lands first the search is cancelled and retried
    pub fn mine(&self) -> Result<MineResponse> {
        self.mine_observed(|_, _| {})
    }

    fn mine_observed<F>(&self, observe: F) -> Result<MineResponse>
    where
        F: Fn(u32, MiningStep),
    {
        for attempt in 1..=self.mining_attempts {
            let version = self.ledger.tip_version();
            let last_proof = self.ledger.last_block()?.get_proof();

            observe(attempt, MiningStep::Searching);
            let pow = ProofOfWork::new_proof_of_work(last_proof);
            let Some(proof) = pow.run_until(|| self.ledger.tip_version() != version) else {
                info!("Tip moved during proof search (attempt {attempt}), retrying");
                continue;
            };

            observe(attempt, MiningStep::Committing);
            let reward = Transaction::new_reward_tx(&self.node_identifier);
            match self.ledger.commit_mined_block(last_proof, proof, reward) {
                Ok(block) => {
                    info!(
                        "Forged block {} with proof {proof} and {} transactions",
                        block.get_index(),
                        block.get_transactions().len()
                    );
                    return Ok(MineResponse::from_block(block));
                }
                Err(LedgerError::StaleProof { expected, actual }) => {
                    warn!("Proof for {expected} went stale, tip now has {actual} (attempt {attempt})");
                }
                Err(e) => return Err(e),
            }
        }
        Err(LedgerError::Mining(format!(
            "tip kept moving, gave up after {} attempts",
            self.mining_attempts
        )))
    }

    pub fn submit_transaction(&self, request: TransactionRequest) -> Result<MessageResponse> {
        let tx = request.into_transaction()?;
        let index = self.ledger.queue_transaction(tx);
        Ok(MessageResponse {
            message: format!("Transaction will be added to block {index}"),
        })
    }

    pub fn full_chain(&self) -> ChainResponse {
        ChainResponse::new(self.ledger.chain())
    }

    pub fn register_nodes(&self, request: RegisterRequest) -> Result<RegisterResponse> {
        if request.nodes.is_empty() {
            return Err(LedgerError::InvalidRequest(
                "Please supply a valid list of nodes".to_string(),
            ));
        }
        self.registry.register_all(&request.nodes)?;
        Ok(RegisterResponse {
            message: NODES_ADDED_MESSAGE.to_string(),
            total_nodes: self.registry.list(),
        })
    }

    pub fn resolve(&self) -> ResolveResponse {
        let message = match self.resolver.resolve(&self.ledger, &self.registry) {
            Resolution::Replaced => CHAIN_REPLACED_MESSAGE,
            Resolution::Authoritative => CHAIN_AUTHORITATIVE_MESSAGE,
        };
        ResolveResponse {
            message: message.to_string(),
            chain: self.ledger.chain(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChainValidator, GENESIS_PROOF};
    use crate::testnet::{build_valid_chain, ScriptedFetcher};

    fn context_with(fetcher: ScriptedFetcher) -> NodeContext {
        NodeContext::new("node-under-test", Box::new(fetcher), 3).unwrap()
    }

    #[test]
    fn test_mine_credits_reward() {
        let context = context_with(ScriptedFetcher::new());
        let response = context.mine().unwrap();

        assert_eq!(response.message, "New Block Forged");
        assert_eq!(response.index, 2);
        assert_eq!(response.transactions.len(), 1);
        assert_eq!(response.transactions[0].get_sender(), "0");
        assert_eq!(response.transactions[0].get_recipient(), "node-under-test");
        assert_eq!(response.transactions[0].get_amount(), 1.0);
        assert!(ProofOfWork::validate(GENESIS_PROOF, response.proof));
        assert!(ChainValidator::validate(&context.ledger().chain()));
    }

    #[test]
    fn test_mine_includes_pending_transactions() {
        let context = context_with(ScriptedFetcher::new());
        context
            .submit_transaction(TransactionRequest {
                sender: "A".to_string(),
                recipient: "B".to_string(),
                amount: 5.0,
            })
            .unwrap();

        let response = context.mine().unwrap();
        assert_eq!(response.transactions[0], Transaction::new("A", "B", 5.0));
        assert!(response.transactions[1].is_reward());
        assert!(context.ledger().pending().is_empty());
    }

    // Lands a competing block on the tip, then queues a transfer for later
    fn commit_competing_block(ledger: &Ledger) {
        let last_proof = ledger.last_block().unwrap().get_proof();
        let proof = ProofOfWork::search(last_proof).unwrap();
        ledger.commit_block(proof).unwrap();
        ledger.queue_transaction(Transaction::new("C", "D", 2.0));
    }

    #[test]
    fn test_mine_gives_up_when_proof_goes_stale() {
        let context = NodeContext::new("miner", Box::new(ScriptedFetcher::new()), 1).unwrap();
        let result = context.mine_observed(|_, step| {
            if step == MiningStep::Committing {
                commit_competing_block(context.ledger());
            }
        });

        assert!(matches!(result, Err(LedgerError::Mining(_))));
        assert_eq!(context.ledger().len(), 2);
        assert_eq!(context.ledger().pending(), vec![Transaction::new("C", "D", 2.0)]);
        assert!(!context.ledger().chain()[1]
            .get_transactions()
            .iter()
            .any(Transaction::is_reward));
    }

    #[test]
    fn test_mine_gives_up_when_search_is_cancelled() {
        let context = NodeContext::new("miner", Box::new(ScriptedFetcher::new()), 1).unwrap();
        let result = context.mine_observed(|_, step| {
            if step == MiningStep::Searching {
                commit_competing_block(context.ledger());
            }
        });

        assert!(matches!(result, Err(LedgerError::Mining(_))));
        assert_eq!(context.ledger().len(), 2);
        assert_eq!(context.ledger().pending().len(), 1);
    }

    #[test]
    fn test_mine_retries_on_the_new_tip() {
        let context = NodeContext::new("miner", Box::new(ScriptedFetcher::new()), 3).unwrap();
        let response = context
            .mine_observed(|attempt, step| {
                if attempt == 1 && step == MiningStep::Committing {
                    commit_competing_block(context.ledger());
                }
            })
            .unwrap();

        assert_eq!(response.index, 3);
        assert_eq!(response.transactions[0], Transaction::new("C", "D", 2.0));
        assert!(response.transactions[1].is_reward());
        assert!(context.ledger().pending().is_empty());
        assert!(ChainValidator::validate(&context.ledger().chain()));
    }

    #[test]
    fn test_submit_transaction_message() {
        let context = context_with(ScriptedFetcher::new());
        let response = context
            .submit_transaction(TransactionRequest {
                sender: "A".to_string(),
                recipient: "B".to_string(),
                amount: 5.0,
            })
            .unwrap();
        assert_eq!(response.message, "Transaction will be added to block 2");
    }

    #[test]
    fn test_submit_invalid_transaction_does_not_mutate() {
        let context = context_with(ScriptedFetcher::new());
        let result = context.submit_transaction(TransactionRequest {
            sender: "A".to_string(),
            recipient: String::new(),
            amount: 5.0,
        });
        assert!(matches!(result, Err(LedgerError::InvalidTransaction(_))));
        assert!(context.ledger().pending().is_empty());
    }

    #[test]
    fn test_register_nodes() {
        let context = context_with(ScriptedFetcher::new());
        let response = context
            .register_nodes(RegisterRequest {
                nodes: vec!["http://b:1".to_string(), "http://a:1".to_string()],
            })
            .unwrap();
        assert_eq!(response.message, "New nodes have been added");
        assert_eq!(
            response.total_nodes,
            vec!["http://a:1".to_string(), "http://b:1".to_string()]
        );
    }

    #[test]
    fn test_register_empty_list_rejected() {
        let context = context_with(ScriptedFetcher::new());
        let result = context.register_nodes(RegisterRequest { nodes: Vec::new() });
        assert!(matches!(result, Err(LedgerError::InvalidRequest(_))));
    }

    #[test]
    fn test_register_with_bad_address_registers_nothing() {
        let context = context_with(ScriptedFetcher::new());
        let result = context.register_nodes(RegisterRequest {
            nodes: vec!["http://a:1".to_string(), "  ".to_string()],
        });
        assert!(matches!(result, Err(LedgerError::InvalidRequest(_))));
        assert!(context.registry().is_empty());
    }

    #[test]
    fn test_resolve_messages() {
        let peer_chain = build_valid_chain(3);
        let context = context_with(ScriptedFetcher::new().with_chain("http://peer:1", peer_chain.clone()));

        let response = context.resolve();
        assert_eq!(response.message, "Our chain is authoritative");

        context
            .register_nodes(RegisterRequest {
                nodes: vec!["http://peer:1".to_string()],
            })
            .unwrap();
        let response = context.resolve();
        assert_eq!(response.message, "Our chain was replaced");
        assert_eq!(response.chain, peer_chain);
    }

    #[test]
    fn test_full_chain_reports_length() {
        let context = context_with(ScriptedFetcher::new());
        context.mine().unwrap();
        let response = context.full_chain();
        assert_eq!(response.length, 2);
        assert_eq!(response.chain.len(), 2);
    }
}
