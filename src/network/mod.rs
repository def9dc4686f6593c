//! Peer-to-peer networking
//!
//! Everything that crosses the process boundary: the peer registry, the
//! chain fetcher used during consensus, the resolver itself, and the HTTP
//! server exposing the node's operations.

pub mod consensus;
pub mod fetcher;
pub mod http;
pub mod messages;
pub mod node;
pub mod server;

pub use consensus::{ConsensusResolver, Resolution};
pub use fetcher::{ChainFetcher, HttpChainFetcher, CHAIN_PATH};
pub use messages::{
    ChainResponse, ErrorResponse, MessageResponse, MineResponse, RegisterRequest,
    RegisterResponse, ResolveResponse, TransactionRequest, CHAIN_AUTHORITATIVE_MESSAGE,
    CHAIN_REPLACED_MESSAGE, MINED_MESSAGE, NODES_ADDED_MESSAGE,
};
pub use node::NodeRegistry;
pub use server::{Server, DEFAULT_NODE_ADDR};
