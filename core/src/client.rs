//! Request building and the single-shot send operation.
//!
//! # Design
//! `SmsClient` holds the connection target and credentials and carries no
//! mutable state between calls. `build_send_sms` produces the full request
//! as bytes without touching the network, so it can be tested and verified
//! against wire captures in isolation; `send` runs one connect/send/receive
//! cycle through the transport and never returns an error — every failure
//! folds into a 500 status with a descriptive body.

use base64ct::{Base64, Encoding};

use crate::error::BuildError;
use crate::http::HttpResponse;
use crate::transport::Transport;
use crate::types::{Credentials, ServiceTarget, SmsMessage};

const REQUEST_PATH: &str = "/send_sms";

/// The outcome of a send: always a status code and a body, 500 standing in
/// for any internal failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    pub status: u16,
    pub body: String,
}

/// Synchronous single-request client for the SMS gateway.
#[derive(Debug, Clone)]
pub struct SmsClient {
    target: ServiceTarget,
    credentials: Credentials,
    transport: Transport,
}

impl SmsClient {
    pub fn new(target: ServiceTarget, credentials: Credentials) -> Self {
        Self {
            target,
            credentials,
            transport: Transport::default(),
        }
    }

    /// Replace the default transport, e.g. to set a timeout or response cap.
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Serialize a complete HTTP/1.1 request for the given message.
    ///
    /// Headers are emitted in a fixed order: `Host`, `Authorization`,
    /// `Content-Type`, `Content-Length`. The JSON body is appended as raw
    /// bytes after the blank line, with no trailing CRLF.
    pub fn build_send_sms(&self, message: &SmsMessage) -> Result<Vec<u8>, BuildError> {
        let body =
            serde_json::to_vec(message).map_err(|e| BuildError::Serialization(e.to_string()))?;
        let auth = basic_auth(&self.credentials);

        let mut head = String::with_capacity(128);
        head.push_str("POST ");
        head.push_str(REQUEST_PATH);
        head.push_str(" HTTP/1.1\r\n");
        head.push_str(&format!("Host: {}\r\n", self.target.host));
        head.push_str(&format!("Authorization: Basic {auth}\r\n"));
        head.push_str("Content-Type: application/json\r\n");
        head.push_str(&format!("Content-Length: {}\r\n", body.len()));
        head.push_str("\r\n");

        let mut request = head.into_bytes();
        request.extend_from_slice(&body);
        Ok(request)
    }

    /// Run one request/response cycle. Transport and build failures are
    /// logged and surfaced as status 500; parse failures are absorbed inside
    /// `HttpResponse::from_bytes`. The response body is decoded lossily.
    pub fn send(&self, message: &SmsMessage) -> SendOutcome {
        let request = match self.build_send_sms(message) {
            Ok(request) => request,
            Err(e) => {
                log::error!("failed to build request: {e}");
                return SendOutcome {
                    status: 500,
                    body: e.to_string(),
                };
            }
        };

        match self.transport.exchange(&self.target, &request) {
            Ok(raw) => {
                let response = HttpResponse::from_bytes(&raw);
                let body = String::from_utf8_lossy(&response.body).into_owned();
                log::info!("received response: {}, {}", response.status, body);
                SendOutcome {
                    status: response.status,
                    body,
                }
            }
            Err(e) => {
                log::error!("failed to send request: {e}");
                SendOutcome {
                    status: 500,
                    body: e.to_string(),
                }
            }
        }
    }
}

/// Base64 of `username:password` for the `Authorization` header.
fn basic_auth(credentials: &Credentials) -> String {
    let raw = format!("{}:{}", credentials.username, credentials.password);
    Base64::encode_string(raw.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SmsClient {
        SmsClient::new(
            ServiceTarget {
                host: "localhost".to_string(),
                port: 8443,
                use_tls: false,
            },
            Credentials {
                username: "u".to_string(),
                password: "p".to_string(),
            },
        )
    }

    fn message() -> SmsMessage {
        SmsMessage {
            sender: "+100".to_string(),
            recipient: "+200".to_string(),
            message: "hi".to_string(),
        }
    }

    #[test]
    fn build_emits_request_line_and_headers_in_order() {
        let request = client().build_send_sms(&message()).unwrap();
        let text = String::from_utf8(request).unwrap();
        let head = text.split("\r\n\r\n").next().unwrap();
        let lines: Vec<&str> = head.split("\r\n").collect();
        assert_eq!(lines[0], "POST /send_sms HTTP/1.1");
        assert_eq!(lines[1], "Host: localhost");
        assert_eq!(lines[2], "Authorization: Basic dTpw");
        assert_eq!(lines[3], "Content-Type: application/json");
        assert!(lines[4].starts_with("Content-Length: "));
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn build_body_is_json_with_keys_in_order() {
        let request = client().build_send_sms(&message()).unwrap();
        let split = request.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let body = &request[split + 4..];

        let value: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(value["sender"], "+100");
        assert_eq!(value["recipient"], "+200");
        assert_eq!(value["message"], "hi");

        let text = std::str::from_utf8(body).unwrap();
        let sender_at = text.find("\"sender\"").unwrap();
        let recipient_at = text.find("\"recipient\"").unwrap();
        let message_at = text.find("\"message\"").unwrap();
        assert!(sender_at < recipient_at && recipient_at < message_at);
    }

    #[test]
    fn content_length_matches_body() {
        let request = client().build_send_sms(&message()).unwrap();
        let text = String::from_utf8(request.clone()).unwrap();
        let split = request.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let body_len = request.len() - split - 4;

        let declared: usize = text
            .split("\r\n")
            .find_map(|line| line.strip_prefix("Content-Length: "))
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(declared, body_len);
    }

    #[test]
    fn body_has_no_trailing_crlf() {
        let request = client().build_send_sms(&message()).unwrap();
        assert!(request.ends_with(b"}"));
    }

    #[test]
    fn auth_encoding_is_deterministic() {
        let credentials = Credentials {
            username: "user".to_string(),
            password: "secret".to_string(),
        };
        assert_eq!(basic_auth(&credentials), basic_auth(&credentials));
    }

    #[test]
    fn auth_encoding_matches_known_value() {
        let credentials = Credentials {
            username: "u".to_string(),
            password: "p".to_string(),
        };
        // base64("u:p")
        assert_eq!(basic_auth(&credentials), "dTpw");
    }

    #[test]
    fn message_strings_pass_through_unvalidated() {
        let odd = SmsMessage {
            sender: String::new(),
            recipient: "not a number".to_string(),
            message: "line\nbreak".to_string(),
        };
        let request = client().build_send_sms(&odd).unwrap();
        let split = request.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        let value: serde_json::Value = serde_json::from_slice(&request[split + 4..]).unwrap();
        assert_eq!(value["sender"], "");
        assert_eq!(value["message"], "line\nbreak");
    }
}
