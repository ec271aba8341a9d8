//! Mock SMS gateway for integration tests.
//!
//! # Design
//! The client under test speaks hand-rolled HTTP/1.1 and reads the response
//! until the peer closes the connection, so this server answers exactly one
//! request per connection and then shuts the socket down. Request validation
//! (`respond` and its helpers) is synchronous and pure; only the accept loop
//! and socket shuttling are async. The expected payload shape is defined
//! here independently of the client crate; integration tests catch drift.

use base64ct::{Base64, Encoding};
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Credentials every request must present via HTTP Basic auth.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// The payload `/send_sms` accepts.
#[derive(Deserialize)]
struct SendSms {
    #[allow(dead_code)]
    sender: String,
    #[allow(dead_code)]
    recipient: String,
    #[allow(dead_code)]
    message: String,
}

/// Accept connections forever, answering one request per connection.
pub async fn run(listener: TcpListener, credentials: Credentials) -> std::io::Result<()> {
    loop {
        let (stream, _) = listener.accept().await?;
        let credentials = credentials.clone();
        tokio::spawn(async move {
            let _ = handle_connection(stream, credentials).await;
        });
    }
}

async fn handle_connection(
    mut stream: TcpStream,
    credentials: Credentials,
) -> std::io::Result<()> {
    let raw = read_request(&mut stream).await?;
    let reply = respond(&raw, &credentials);
    stream.write_all(&reply).await?;
    stream.shutdown().await
}

/// Read one request: headers up to CRLFCRLF, then `Content-Length` bytes of
/// body. An early peer close returns whatever arrived.
async fn read_request(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        if let Some(header_end) = find_subsequence(&raw, b"\r\n\r\n") {
            let total = header_end + 4 + declared_content_length(&raw[..header_end]);
            if raw.len() >= total {
                raw.truncate(total);
                return Ok(raw);
            }
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(raw);
        }
        raw.extend_from_slice(&chunk[..n]);
    }
}

fn declared_content_length(header_block: &[u8]) -> usize {
    let text = String::from_utf8_lossy(header_block);
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

/// Validate one raw request and produce the full response bytes.
pub fn respond(raw: &[u8], credentials: &Credentials) -> Vec<u8> {
    let Some(header_end) = find_subsequence(raw, b"\r\n\r\n") else {
        return response(400, "Bad Request", "{\"error\": \"malformed request\"}\n");
    };
    let Ok(header_block) = std::str::from_utf8(&raw[..header_end]) else {
        return response(400, "Bad Request", "{\"error\": \"malformed request\"}\n");
    };
    let body = &raw[header_end + 4..];

    let mut lines = header_block.split("\r\n");
    let request_line = lines.next().unwrap_or_default();
    let mut tokens = request_line.split(' ');
    let method = tokens.next().unwrap_or_default();
    let path = tokens.next().unwrap_or_default();

    if path != "/send_sms" {
        return response(404, "Not Found", "{\"error\": \"not found\"}\n");
    }
    if method != "POST" {
        return response(
            405,
            "Method Not Allowed",
            "{\"error\": \"method not allowed\"}\n",
        );
    }

    let authorization = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim() == "Authorization")
        .map(|(_, value)| value.trim().to_string());
    if authorization.as_deref() != Some(expected_authorization(credentials).as_str()) {
        return response(401, "Unauthorized", "{\"error\": \"unauthorized\"}\n");
    }

    if serde_json::from_slice::<SendSms>(body).is_err() {
        return response(400, "Bad Request", "{\"error\": \"invalid payload\"}\n");
    }

    response(200, "OK", "{\"ok\": true}\n")
}

fn expected_authorization(credentials: &Credentials) -> String {
    let raw = format!("{}:{}", credentials.username, credentials.password);
    format!("Basic {}", Base64::encode_string(raw.as_bytes()))
}

fn response(status: u16, reason: &str, body: &str) -> Vec<u8> {
    format!(
        "HTTP/1.1 {status} {reason}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {body}",
        body.len()
    )
    .into_bytes()
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
