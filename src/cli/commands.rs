use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "pow-ledger")]
pub struct Opt {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "startnode", about = "Start a ledger node")]
    StartNode {
        #[arg(long = "config", help = "TOML configuration file")]
        config: Option<PathBuf>,
        #[arg(long = "addr", help = "Address to listen on, e.g. 127.0.0.1:5001")]
        addr: Option<String>,
        #[arg(long = "node-id", help = "Identifier credited with mining rewards")]
        node_id: Option<String>,
        #[arg(long = "peer", help = "Peer to register at startup (repeatable)")]
        peers: Vec<String>,
    },
    #[command(name = "printchain", about = "Fetch and print a peer's chain")]
    Printchain {
        #[arg(help = "Peer address, e.g. http://127.0.0.1:5001")]
        peer: String,
        #[arg(long = "timeout-ms", default_value_t = 5000, help = "Fetch timeout")]
        timeout_ms: u64,
    },
    #[command(
        name = "validatechain",
        about = "Validate a chain exported as {length, chain} JSON"
    )]
    ValidateChain {
        #[arg(help = "Path to the exported chain")]
        path: PathBuf,
    },
    #[command(name = "findproof", about = "Search the proof following LAST_PROOF")]
    FindProof {
        #[arg(help = "Proof of the previous block")]
        last_proof: u64,
    },
}
