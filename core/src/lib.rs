//! Synchronous HTTP/1.1 client core for the SMS gateway.
//!
//! # Overview
//! Hand-rolled HTTP/1.1 over a blocking TCP (optionally TLS) socket: one
//! connection, one request, one response. `SmsClient::build_send_sms`
//! serializes the gateway request to bytes, `Transport::exchange` runs the
//! connect/send/receive-until-closed cycle, and `HttpResponse::from_bytes`
//! decodes whatever came back without ever failing past its boundary.
//!
//! # Design
//! - `SmsClient` is stateless between calls — target, credentials, transport.
//! - Request building and response parsing are pure byte-in/byte-out and
//!   testable without a network; the transport is the only I/O seam.
//! - `send` always yields a status/body pair, with 500 standing in for any
//!   internal failure, so callers never handle an error path.

pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{SendOutcome, SmsClient};
pub use error::{BuildError, ParseError, TransportError};
pub use http::HttpResponse;
pub use transport::Transport;
pub use types::{Credentials, ServiceTarget, SmsMessage};
