use crate::error::{LedgerError, Result};
use crate::network::DEFAULT_NODE_ADDR;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use uuid::Uuid;

const NODE_ADDRESS_KEY: &str = "NODE_ADDRESS";
const NODE_ID_KEY: &str = "NODE_ID";
const NODE_PEERS_KEY: &str = "NODE_PEERS";

const DEFAULT_FETCH_TIMEOUT_MS: u64 = 5000;
const DEFAULT_MINING_ATTEMPTS: u32 = 3;

/// Node settings. Layered as defaults, then an optional TOML file, then
/// environment variables, then command-line flags (applied by the caller).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    pub node_id: String,
    pub peers: Vec<String>,
    pub fetch_timeout_ms: u64,
    pub mining_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            listen_addr: String::from(DEFAULT_NODE_ADDR),
            node_id: Self::generate_node_id(),
            peers: Vec::new(),
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            mining_attempts: DEFAULT_MINING_ATTEMPTS,
        }
    }
}

impl Config {
    /// A fresh random identifier, UUID v4 without hyphens
    pub fn generate_node_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// Defaults, overlaid with `path` when given, then with the environment
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Config::default(),
        };
        config.with_env(|key| env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path).map_err(|e| {
            LedgerError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Config> {
        let config: Config = toml::from_str(contents)?;
        config.validate()
    }

    /// Overlay environment values, looked up through `lookup`
    pub fn with_env<F>(mut self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(NODE_ADDRESS_KEY) {
            self.listen_addr = addr;
        }
        if let Some(node_id) = lookup(NODE_ID_KEY) {
            self.node_id = node_id;
        }
        if let Some(peers) = lookup(NODE_PEERS_KEY) {
            self.peers = peers
                .split(',')
                .map(str::trim)
                .filter(|peer| !peer.is_empty())
                .map(String::from)
                .collect();
        }
        self.validate()
    }

    pub fn validate(self) -> Result<Config> {
        if self.listen_addr.trim().is_empty() {
            return Err(LedgerError::Config("listen_addr must not be empty".to_string()));
        }
        if self.node_id.trim().is_empty() {
            return Err(LedgerError::Config("node_id must not be empty".to_string()));
        }
        if self.fetch_timeout_ms == 0 {
            return Err(LedgerError::Config(
                "fetch_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(self)
    }

    /// Extract the port from the listen address (e.g., "127.0.0.1:5001" -> "5001")
    pub fn port(&self) -> Option<&str> {
        self.listen_addr.rsplit_once(':').map(|(_, port)| port)
    }
}
