//! Minimal HTTP/1.1 plumbing over std TCP streams
//!
//! Just enough of the protocol for JSON request/response between nodes:
//! a request reader and response writer for the server side, and a `GET`
//! client for fetching peer chains. Every exchange uses one connection.

use crate::error::{LedgerError, Result};
use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

const HEADER_TERMINATOR: &[u8] = b"\r\n\r\n";

/// Upper bound on headers plus body, for both directions
pub const MAX_MESSAGE_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: String,
    pub path: String,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

fn find_header_end(data: &[u8]) -> Option<usize> {
    data.windows(HEADER_TERMINATOR.len())
        .position(|w| w == HEADER_TERMINATOR)
        .map(|pos| pos + HEADER_TERMINATOR.len())
}

// Header lookup, case-insensitive on the name
fn header_value<'a>(headers: &'a str, name: &str) -> Option<&'a str> {
    headers.split("\r\n").skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        if key.trim().eq_ignore_ascii_case(name) {
            Some(value.trim())
        } else {
            None
        }
    })
}

fn bad_message(msg: &str) -> LedgerError {
    LedgerError::Network(format!("Malformed HTTP message: {msg}"))
}

/// Read one request: headers up to the blank line, then `Content-Length` bytes
pub fn read_request<R: Read>(stream: &mut R) -> Result<HttpRequest> {
    let mut buf = [0u8; 4096];
    let mut data = Vec::new();
    let header_end = loop {
        if let Some(end) = find_header_end(&data) {
            break end;
        }
        if data.len() > MAX_MESSAGE_BYTES {
            return Err(bad_message("headers too large"));
        }
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Err(bad_message("connection closed before headers ended"));
        }
        data.extend_from_slice(&buf[..n]);
    };

    let headers = String::from_utf8_lossy(&data[..header_end]).to_string();
    let mut body = data[header_end..].to_vec();

    let request_line = headers.split("\r\n").next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().ok_or_else(|| bad_message("missing method"))?;
    let path = parts.next().ok_or_else(|| bad_message("missing path"))?;

    let content_len = match header_value(&headers, "Content-Length") {
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| bad_message("invalid Content-Length"))?,
        None => 0,
    };
    if content_len > MAX_MESSAGE_BYTES {
        return Err(bad_message("body too large"));
    }

    while body.len() < content_len {
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Err(bad_message("connection closed before body ended"));
        }
        body.extend_from_slice(&buf[..n]);
    }
    body.truncate(content_len);

    Ok(HttpRequest {
        method: method.to_string(),
        // query strings are not used by any route
        path: path.split('?').next().unwrap_or(path).to_string(),
        body,
    })
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Internal Server Error",
    }
}

/// Write a complete JSON response and close the exchange
pub fn write_json<W: Write>(stream: &mut W, status: u16, body: &[u8]) -> Result<()> {
    let head = format!(
        "HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        reason_phrase(status),
        body.len()
    );
    stream.write_all(head.as_bytes())?;
    stream.write_all(body)?;
    stream.flush()?;
    Ok(())
}

/// Split a peer address like `http://host:port/` into `host:port`
pub fn authority(peer: &str) -> Result<&str> {
    let rest = match peer.split_once("://") {
        Some(("http", rest)) => rest,
        Some((scheme, _)) => {
            return Err(LedgerError::Network(format!(
                "Unsupported scheme {scheme} in peer address {peer}"
            )))
        }
        None => peer,
    };
    let authority = rest.split('/').next().unwrap_or(rest);
    if authority.is_empty() {
        return Err(LedgerError::Network(format!(
            "Peer address {peer} has no host"
        )));
    }
    Ok(authority)
}

/// Issue `GET path` against `peer` and return the status and body
pub fn get(peer: &str, path: &str, timeout: Duration) -> Result<HttpResponse> {
    let host = authority(peer)?;
    let addr = host
        .to_socket_addrs()
        .map_err(|e| LedgerError::Network(format!("Failed to resolve {host}: {e}")))?
        .next()
        .ok_or_else(|| LedgerError::Network(format!("No address found for {host}")))?;

    let mut stream = TcpStream::connect_timeout(&addr, timeout)
        .map_err(|e| LedgerError::Network(format!("Failed to connect to {host}: {e}")))?;
    stream
        .set_read_timeout(Some(timeout))
        .map_err(|e| LedgerError::Network(format!("Failed to set read timeout: {e}")))?;
    stream
        .set_write_timeout(Some(timeout))
        .map_err(|e| LedgerError::Network(format!("Failed to set write timeout: {e}")))?;

    let request = format!(
        "GET {path} HTTP/1.1\r\nHost: {host}\r\nAccept: application/json\r\nConnection: close\r\n\r\n"
    );
    stream
        .write_all(request.as_bytes())
        .map_err(|e| LedgerError::Network(format!("Failed to send request to {host}: {e}")))?;

    let mut raw = Vec::new();
    stream
        .take(MAX_MESSAGE_BYTES as u64 + 1)
        .read_to_end(&mut raw)
        .map_err(|e| LedgerError::Network(format!("Failed to read response from {host}: {e}")))?;
    if raw.len() > MAX_MESSAGE_BYTES {
        return Err(bad_message("response too large"));
    }
    parse_response(&raw)
}

/// Parse a full response read until the peer closed the connection
pub fn parse_response(raw: &[u8]) -> Result<HttpResponse> {
    let header_end = find_header_end(raw).ok_or_else(|| bad_message("missing header end"))?;
    let headers = String::from_utf8_lossy(&raw[..header_end]).to_string();
    let status = headers
        .split("\r\n")
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| bad_message("missing status code"))?;

    let payload = &raw[header_end..];
    let body = match header_value(&headers, "Transfer-Encoding") {
        Some(encoding) if encoding.eq_ignore_ascii_case("chunked") => decode_chunked(payload)?,
        _ => match header_value(&headers, "Content-Length") {
            Some(value) => {
                let len = value
                    .parse::<usize>()
                    .map_err(|_| bad_message("invalid Content-Length"))?;
                if len > payload.len() {
                    return Err(bad_message("truncated body"));
                }
                payload[..len].to_vec()
            }
            None => payload.to_vec(),
        },
    };

    Ok(HttpResponse { status, body })
}

fn decode_chunked(mut payload: &[u8]) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    loop {
        let line_end = payload
            .windows(2)
            .position(|w| w == b"\r\n")
            .ok_or_else(|| bad_message("missing chunk size"))?;
        let size_line = String::from_utf8_lossy(&payload[..line_end]).to_string();
        let size_hex = size_line.split(';').next().unwrap_or_default().trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| bad_message("invalid chunk size"))?;
        payload = &payload[line_end + 2..];
        if size == 0 {
            return Ok(body);
        }
        if payload.len() < size {
            return Err(bad_message("truncated chunk"));
        }
        body.extend_from_slice(&payload[..size]);
        payload = payload.get(size + 2..).unwrap_or_default();
    }
}
