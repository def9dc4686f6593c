use crate::error::{LedgerError, Result};
use crate::network::http;
use crate::network::ChainResponse;
use crate::utils::deserialize;
use log::debug;
use std::time::Duration;

/// Path every node serves its full chain on
pub const CHAIN_PATH: &str = "/chain";

/// Fetches a peer's full chain. Implementations report transport and
/// decoding failures as errors; the resolver skips those peers.
pub trait ChainFetcher: Send + Sync {
    fn fetch_chain(&self, peer: &str) -> Result<ChainResponse>;
}

/// Fetches chains over HTTP, one connection per request
#[derive(Debug, Clone)]
pub struct HttpChainFetcher {
    timeout: Duration,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> HttpChainFetcher {
        HttpChainFetcher { timeout }
    }

    pub fn get_timeout(&self) -> Duration {
        self.timeout
    }
}

impl ChainFetcher for HttpChainFetcher {
    fn fetch_chain(&self, peer: &str) -> Result<ChainResponse> {
        debug!("Fetching chain from {peer}");
        let response = http::get(peer, CHAIN_PATH, self.timeout)?;
        if response.status != 200 {
            return Err(LedgerError::Network(format!(
                "Peer {peer} answered {} to {CHAIN_PATH}",
                response.status
            )));
        }
        deserialize::<ChainResponse>(&response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Block;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    // Serve exactly one canned response on an ephemeral port
    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    fn fetcher() -> HttpChainFetcher {
        HttpChainFetcher::new(Duration::from_secs(2))
    }

    #[test]
    fn test_fetch_chain_success() {
        let chain = vec![Block::generate_genesis_block().unwrap()];
        let body = serde_json::to_string(&ChainResponse::new(chain.clone())).unwrap();
        let peer = serve_once(format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        ));

        let response = fetcher().fetch_chain(&peer).unwrap();
        assert_eq!(response.length, 1);
        assert_eq!(response.chain, chain);
    }

    #[test]
    fn test_fetch_chain_bad_status() {
        let peer = serve_once("HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n".to_string());
        assert!(matches!(
            fetcher().fetch_chain(&peer),
            Err(LedgerError::Network(_))
        ));
    }

    #[test]
    fn test_fetch_chain_malformed_body() {
        let peer = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 8\r\n\r\nnot json".to_string());
        assert!(matches!(
            fetcher().fetch_chain(&peer),
            Err(LedgerError::Serialization(_))
        ));
    }

    #[test]
    fn test_fetch_chain_unreachable() {
        // bind then drop so nothing listens on the port
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        assert!(fetcher().fetch_chain(&format!("http://{addr}")).is_err());
    }
}
