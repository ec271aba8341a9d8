//! Domain types for the SMS gateway client.
//!
//! # Design
//! `SmsMessage` serializes with its fields in declaration order, so the wire
//! JSON always reads `sender`, `recipient`, `message` — the order the gateway
//! documents. The mock-server crate defines its own request type instead of
//! importing this one; integration tests catch schema drift between the two.

use serde::{Deserialize, Serialize};

/// A single SMS submission. Strings are passed through to the gateway as-is;
/// the client performs no validation beyond presence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SmsMessage {
    pub sender: String,
    pub recipient: String,
    pub message: String,
}

/// Basic-auth credentials. Only ever used to compute the `Authorization`
/// header value; never persisted by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Where to connect: host, port, and whether to perform a TLS handshake
/// before any HTTP bytes are exchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTarget {
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
}
