// Entry point for the ledger node and its offline helper commands
use clap::Parser;
use log::{error, info, LevelFilter};
use pow_ledger::{
    ChainFetcher, ChainResponse, ChainValidator, Command, Config, HttpChainFetcher, NodeContext,
    Opt, ProofOfWork, Server,
};
use std::fs;
use std::process;
use std::sync::Arc;
use std::time::Duration;

fn main() {
    // Info by default, RUST_LOG still wins when set
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::StartNode {
            config,
            addr,
            node_id,
            peers,
        } => {
            // file and environment first, flags last
            let mut config = Config::load(config.as_deref())?;
            if let Some(addr) = addr {
                config.listen_addr = addr;
            }
            if let Some(node_id) = node_id {
                config.node_id = node_id;
            }
            config.peers.extend(peers);
            let config = config.validate()?;

            info!("Starting node {} on {}", config.node_id, config.listen_addr);
            let context = Arc::new(NodeContext::from_config(&config)?);
            if !context.registry().is_empty() {
                info!("Bootstrap peers: {:?}", context.registry().list());
            }

            let server = Server::new(context);
            server.run(&config.listen_addr)?
        }
        Command::Printchain { peer, timeout_ms } => {
            let fetcher = HttpChainFetcher::new(Duration::from_millis(timeout_ms));
            let response = fetcher.fetch_chain(&peer)?;
            println!("Chain length: {}", response.length);
            for block in &response.chain {
                println!("Block index: {}", block.get_index());
                println!("Timestamp: {}", block.get_timestamp());
                println!("Proof: {}", block.get_proof());
                println!("Previous hash: {}", block.get_previous_hash());
                println!("Hash: {}", block.hash()?);
                for tx in block.get_transactions() {
                    println!(
                        "- {} -> {}: {}",
                        tx.get_sender(),
                        tx.get_recipient(),
                        tx.get_amount()
                    );
                }
                println!();
            }
        }
        Command::ValidateChain { path } => {
            let contents = fs::read(&path)?;
            let response: ChainResponse = serde_json::from_slice(&contents)?;
            let chain = response.into_chain()?;
            if ChainValidator::validate(&chain) {
                println!("Valid chain of {} blocks", chain.len());
            } else {
                return Err(format!("Chain in {} is invalid", path.display()).into());
            }
        }
        Command::FindProof { last_proof } => {
            let proof = ProofOfWork::search(last_proof)?;
            println!("Proof following {last_proof}: {proof}");
        }
    }
    Ok(())
}
