//! Reward constants
//!
//! Every node in a deployment must agree on these, since reward
//! transactions end up inside hashed blocks.

/// Sender used for newly minted coins
pub const REWARD_SENDER: &str = "0";

/// Amount credited to the node that forges a block
pub const MINING_REWARD: f64 = 1.0;
