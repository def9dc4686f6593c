use crate::error::{LedgerError, Result};
use crate::network::http::{self, HttpRequest};
use crate::network::{ErrorResponse, RegisterRequest, TransactionRequest};
use crate::service::NodeContext;
use crate::utils::{deserialize, serialize};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const DEFAULT_NODE_ADDR: &str = "127.0.0.1:5001";
const TCP_READ_TIMEOUT: u64 = 60;

/// Threaded HTTP front end: one thread per connection, one request per
/// connection, every request routed to the shared node context
pub struct Server {
    context: Arc<NodeContext>,
}

impl Server {
    pub fn new(context: Arc<NodeContext>) -> Self {
        Self { context }
    }

    pub fn bind(addr: &str) -> Result<TcpListener> {
        TcpListener::bind(addr)
            .map_err(|e| LedgerError::Network(format!("Failed to bind to {addr}: {e}")))
    }

    /// Bind and serve on the calling thread
    pub fn run(&self, addr: &str) -> Result<()> {
        let listener = Self::bind(addr)?;
        self.serve(listener)
    }

    /// Bind, then serve on a background thread. Returns the bound address,
    /// which is how callers learn the port when binding to port 0.
    pub fn spawn(self, addr: &str) -> Result<SocketAddr> {
        let listener = Self::bind(addr)?;
        let local_addr = listener.local_addr()?;
        thread::spawn(move || {
            if let Err(e) = self.serve(listener) {
                error!("Server on {local_addr} stopped: {e}");
            }
        });
        Ok(local_addr)
    }

    pub fn serve(&self, listener: TcpListener) -> Result<()> {
        info!("Server listening on {}", listener.local_addr()?);

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let peer_addr = match stream.peer_addr() {
                        Ok(addr) => addr,
                        Err(e) => {
                            error!("Failed to get peer address: {e}");
                            continue;
                        }
                    };

                    let context = Arc::clone(&self.context);
                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection(&context, stream, peer_addr) {
                            error!("Error handling connection from {peer_addr}: {e}");
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {e}");
                }
            }
        }

        Ok(())
    }

    fn handle_connection(
        context: &NodeContext,
        mut stream: TcpStream,
        peer_addr: SocketAddr,
    ) -> Result<()> {
        stream
            .set_read_timeout(Some(Duration::from_secs(TCP_READ_TIMEOUT)))
            .map_err(|e| LedgerError::Network(format!("Failed to set read timeout: {e}")))?;

        let (status, body) = match http::read_request(&mut stream) {
            Ok(request) => {
                debug!("{} {} from {peer_addr}", request.method, request.path);
                Self::route(context, &request)
            }
            Err(e) => {
                warn!("Unreadable request from {peer_addr}: {e}");
                Self::error_reply(400, "Invalid request")
            }
        };

        http::write_json(&mut stream, status, &body)?;
        if let Err(e) = stream.shutdown(Shutdown::Both) {
            debug!("Failed to shut down connection with {peer_addr}: {e}");
        }
        Ok(())
    }

    /// Map a request onto a node operation, returning status and JSON body
    pub fn route(context: &NodeContext, request: &HttpRequest) -> (u16, Vec<u8>) {
        let method = request.method.as_str();
        match (request.path.as_str(), method) {
            ("/mine", "GET") => Self::reply(200, context.mine()),
            ("/transactions/new", "POST") => {
                match deserialize::<TransactionRequest>(&request.body) {
                    Ok(tx_request) => Self::reply(201, context.submit_transaction(tx_request)),
                    Err(e) => {
                        warn!("Error decoding transaction payload: {e}");
                        Self::error_reply(400, "Invalid request payload")
                    }
                }
            }
            ("/chain", "GET") => Self::reply(200, Ok(context.full_chain())),
            ("/nodes/register", "POST") => match deserialize::<RegisterRequest>(&request.body) {
                Ok(register_request) => Self::reply(201, context.register_nodes(register_request)),
                Err(e) => {
                    warn!("Error decoding register payload: {e}");
                    Self::error_reply(400, "Invalid request payload")
                }
            },
            ("/nodes/resolve", "GET") => Self::reply(200, Ok(context.resolve())),
            ("/mine" | "/chain" | "/nodes/resolve" | "/transactions/new" | "/nodes/register", _) => {
                Self::error_reply(405, &format!("Method {method} not allowed"))
            }
            _ => Self::error_reply(404, "Not found"),
        }
    }

    fn reply<T: Serialize>(status: u16, result: Result<T>) -> (u16, Vec<u8>) {
        let payload = match result {
            Ok(payload) => payload,
            Err(e) if e.is_client_error() => {
                warn!("Rejected request: {e}");
                return Self::error_reply(400, &e.to_string());
            }
            Err(e) => {
                error!("Request failed: {e}");
                return Self::error_reply(500, &e.to_string());
            }
        };
        match serialize(&payload) {
            Ok(body) => (status, body),
            Err(e) => {
                error!("Error encoding response: {e}");
                Self::error_reply(500, "Failed to encode response")
            }
        }
    }

    fn error_reply(status: u16, message: &str) -> (u16, Vec<u8>) {
        let body = ErrorResponse {
            error: message.to_string(),
        };
        // a struct holding one String always encodes
        let body = serialize(&body).unwrap_or_else(|_| b"{}".to_vec());
        (status, body)
    }
}
