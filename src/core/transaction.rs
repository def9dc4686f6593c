// A transaction is a plain transfer record: who pays, who receives, how much
// It has no identity beyond its fields and is never mutated once queued

use crate::core::{MINING_REWARD, REWARD_SENDER};
use crate::error::{LedgerError, Result};
use serde::{Deserialize, Serialize};

// Field order is part of the hash encoding, so I keep it fixed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    sender: String,
    recipient: String,
    amount: f64,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: f64) -> Transaction {
        Transaction {
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
        }
    }

    // The reward a node pays itself for forging a block
    // The sender "0" signals that this coin was newly minted
    pub fn new_reward_tx(node_identifier: &str) -> Transaction {
        Transaction::new(REWARD_SENDER, node_identifier, MINING_REWARD)
    }

    pub fn get_sender(&self) -> &str {
        self.sender.as_str()
    }

    pub fn get_recipient(&self) -> &str {
        self.recipient.as_str()
    }

    pub fn get_amount(&self) -> f64 {
        self.amount
    }

    pub fn is_reward(&self) -> bool {
        self.sender == REWARD_SENDER
    }

    // The only checks a submitted transaction gets: both parties named and a
    // non-zero amount
    pub fn validate(&self) -> Result<()> {
        if self.sender.is_empty() || self.recipient.is_empty() || self.amount == 0.0 {
            return Err(LedgerError::InvalidTransaction("Missing values".to_string()));
        }
        Ok(())
    }
}
