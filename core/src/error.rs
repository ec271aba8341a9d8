//! Error types for the SMS gateway client.
//!
//! # Design
//! Three separate enums mirror the three places a request can go wrong:
//! building the request bytes, exchanging them with the peer, and parsing
//! what came back. `ParseError` distinguishes "no header terminator" from
//! "bad status line" from "non-UTF8 header block" for diagnosability, even
//! though all of them fold into the same sentinel 500 response at the
//! `HttpResponse::from_bytes` boundary.

use std::fmt;
use std::io;

/// Errors while serializing the request.
#[derive(Debug)]
pub enum BuildError {
    /// The message payload could not be serialized to JSON.
    Serialization(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Serialization(msg) => write!(f, "serialization failed: {msg}"),
        }
    }
}

impl std::error::Error for BuildError {}

/// Errors in the TCP/TLS exchange with the gateway.
#[derive(Debug)]
pub enum TransportError {
    /// TCP connect to the target failed.
    Connect(io::Error),

    /// The target host is not a valid TLS server name.
    InvalidServerName(String),

    /// TLS handshake or record-layer failure.
    Tls(rustls::Error),

    /// Writing the request bytes failed.
    Send(io::Error),

    /// Reading the response bytes failed.
    Receive(io::Error),

    /// The peer did not produce data within the configured timeout.
    Timeout,

    /// The accumulated response exceeded the configured size cap (bytes).
    ResponseTooLarge(usize),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(e) => write!(f, "connect failed: {e}"),
            TransportError::InvalidServerName(host) => {
                write!(f, "invalid TLS server name: {host}")
            }
            TransportError::Tls(e) => write!(f, "TLS error: {e}"),
            TransportError::Send(e) => write!(f, "send failed: {e}"),
            TransportError::Receive(e) => write!(f, "receive failed: {e}"),
            TransportError::Timeout => write!(f, "peer did not respond within the timeout"),
            TransportError::ResponseTooLarge(limit) => {
                write!(f, "response exceeded {limit} bytes")
            }
        }
    }
}

impl std::error::Error for TransportError {}

/// Errors while decoding a raw response byte buffer.
#[derive(Debug)]
pub enum ParseError {
    /// The buffer contains no `\r\n\r\n` header/body delimiter.
    MissingHeaderTerminator,

    /// The header block is not valid UTF-8.
    InvalidHeaderEncoding,

    /// The status line does not have the `HTTP/1.1 <code> <reason>` shape.
    MalformedStatusLine(String),

    /// The status-code token is not an integer.
    InvalidStatusCode(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::MissingHeaderTerminator => {
                write!(f, "no header terminator in response")
            }
            ParseError::InvalidHeaderEncoding => {
                write!(f, "response header block is not valid UTF-8")
            }
            ParseError::MalformedStatusLine(line) => {
                write!(f, "malformed status line: {line:?}")
            }
            ParseError::InvalidStatusCode(token) => {
                write!(f, "invalid status code: {token:?}")
            }
        }
    }
}

impl std::error::Error for ParseError {}
