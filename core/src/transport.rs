//! Blocking TCP/TLS transport for a single request/response exchange.
//!
//! # Design
//! One connection per call: connect, optionally complete a TLS handshake,
//! write the full request, then read fixed-size chunks until the peer closes
//! the connection. The connection lives on this call stack only and is
//! dropped on every exit path. Two knobs bound a misbehaving peer: an
//! optional read/write timeout and a cap on the accumulated response size.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConnection, RootCertStore, StreamOwned};

use crate::error::TransportError;
use crate::types::ServiceTarget;

const RECV_CHUNK_SIZE: usize = 4096;
const DEFAULT_MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;

static CERTIFICATE_STORE: OnceLock<Arc<RootCertStore>> = OnceLock::new();

fn root_certificates() -> Arc<RootCertStore> {
    CERTIFICATE_STORE
        .get_or_init(|| {
            let mut store = RootCertStore::empty();
            store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            Arc::new(store)
        })
        .clone()
}

/// Owns the raw byte exchange with the gateway.
#[derive(Debug, Clone)]
pub struct Transport {
    timeout: Option<Duration>,
    max_response_bytes: usize,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            timeout: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl Transport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound each read and write on the socket. Without this, a peer that
    /// never responds blocks the caller indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Cap the accumulated response size.
    pub fn with_max_response_bytes(mut self, limit: usize) -> Self {
        self.max_response_bytes = limit;
        self
    }

    /// Connect to the target, send the request bytes, and read until the
    /// peer closes the connection. Returns the accumulated response bytes.
    pub fn exchange(
        &self,
        target: &ServiceTarget,
        request: &[u8],
    ) -> Result<Vec<u8>, TransportError> {
        let tcp = TcpStream::connect((target.host.as_str(), target.port))
            .map_err(TransportError::Connect)?;
        tcp.set_read_timeout(self.timeout)
            .map_err(TransportError::Connect)?;
        tcp.set_write_timeout(self.timeout)
            .map_err(TransportError::Connect)?;

        let mut stream = if target.use_tls {
            Stream::tls(tcp, &target.host)?
        } else {
            Stream::Plain(tcp)
        };

        stream.write_all(request).map_err(send_error)?;
        stream.flush().map_err(send_error)?;

        self.receive_until_closed(&mut stream)
    }

    fn receive_until_closed(&self, stream: &mut Stream) -> Result<Vec<u8>, TransportError> {
        let mut response = Vec::new();
        let mut chunk = [0u8; RECV_CHUNK_SIZE];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => return Ok(response),
                Ok(n) => {
                    if response.len() + n > self.max_response_bytes {
                        return Err(TransportError::ResponseTooLarge(self.max_response_bytes));
                    }
                    response.extend_from_slice(&chunk[..n]);
                }
                // Peers that drop the connection without a TLS close_notify
                // surface as UnexpectedEof; treat it as end-of-stream once
                // data has arrived.
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof && !response.is_empty() => {
                    return Ok(response);
                }
                Err(e) if is_timeout(&e) => return Err(TransportError::Timeout),
                Err(e) => return Err(TransportError::Receive(e)),
            }
        }
    }
}

/// A connected byte channel, plain or TLS-wrapped.
enum Stream {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl Stream {
    fn tls(tcp: TcpStream, host: &str) -> Result<Self, TransportError> {
        let server_name = ServerName::try_from(host.to_string())
            .map_err(|_| TransportError::InvalidServerName(host.to_string()))?;
        let config = rustls::ClientConfig::builder()
            .with_root_certificates(root_certificates())
            .with_no_client_auth();
        let connection =
            ClientConnection::new(Arc::new(config), server_name).map_err(TransportError::Tls)?;
        Ok(Self::Tls(Box::new(StreamOwned::new(connection, tcp))))
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Stream::Plain(tcp) => tcp.read(buf),
            Stream::Tls(tls) => tls.read(buf),
        }
    }
}

impl Write for Stream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Stream::Plain(tcp) => tcp.write(buf),
            Stream::Tls(tls) => tls.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Stream::Plain(tcp) => tcp.flush(),
            Stream::Tls(tls) => tls.flush(),
        }
    }
}

fn send_error(e: io::Error) -> TransportError {
    if is_timeout(&e) {
        TransportError::Timeout
    } else {
        TransportError::Send(e)
    }
}

// Unix reports an expired SO_RCVTIMEO as WouldBlock, Windows as TimedOut.
fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut
    )
}
