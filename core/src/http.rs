//! HTTP/1.1 response parsing from a raw byte buffer.
//!
//! # Design
//! The `\r\n\r\n` header/body delimiter is located at the byte level and only
//! the header block is decoded as UTF-8. The body is carried as raw bytes —
//! binary payloads and multi-byte characters spanning the delimiter never go
//! through a text round-trip. `try_from_bytes` reports what exactly was
//! malformed; `from_bytes` is total and folds any failure into a sentinel
//! 500 response, so callers always receive a usable status/body pair.

use std::collections::HashMap;

use crate::error::ParseError;

/// A parsed HTTP response. Header keys are kept case-sensitive as received;
/// a repeated key keeps its last value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Parse a raw response buffer, reporting the failure mode on error.
    pub fn try_from_bytes(raw: &[u8]) -> Result<Self, ParseError> {
        let header_end =
            find_subsequence(raw, b"\r\n\r\n").ok_or(ParseError::MissingHeaderTerminator)?;
        let header_block = std::str::from_utf8(&raw[..header_end])
            .map_err(|_| ParseError::InvalidHeaderEncoding)?;
        let body = raw[header_end + 4..].to_vec();

        let mut lines = header_block.split("\r\n");
        // `split` always yields at least one element, possibly empty.
        let status_line = lines.next().unwrap_or_default();
        let mut tokens = status_line.splitn(3, ' ');
        let _version = tokens.next();
        let code_token = tokens
            .next()
            .ok_or_else(|| ParseError::MalformedStatusLine(status_line.to_string()))?;
        let status = code_token
            .parse::<u16>()
            .map_err(|_| ParseError::InvalidStatusCode(code_token.to_string()))?;

        let mut headers = HashMap::new();
        for line in lines {
            if let Some((key, value)) = line.split_once(':') {
                headers.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        Ok(Self {
            status,
            headers,
            body,
        })
    }

    /// Parse a raw response buffer. Never fails: a malformed buffer yields
    /// the sentinel response — status 500, no headers, a JSON error body.
    pub fn from_bytes(raw: &[u8]) -> Self {
        match Self::try_from_bytes(raw) {
            Ok(response) => response,
            Err(e) => {
                log::error!("failed to parse response: {e}");
                Self::sentinel(&e.to_string())
            }
        }
    }

    fn sentinel(description: &str) -> Self {
        let body = serde_json::json!({ "error": description });
        Self {
            status: 500,
            headers: HashMap::new(),
            body: body.to_string().into_bytes(),
        }
    }
}

/// First position of `needle` in `haystack`, if any.
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_status_headers_and_body() {
        let raw = b"HTTP/1.1 200 OK\r\nContent-Length: 13\r\n\r\n{\"ok\": true}\n";
        let response = HttpResponse::try_from_bytes(raw).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.headers.get("Content-Length").unwrap(), "13");
        assert_eq!(response.body, b"{\"ok\": true}\n");
    }

    #[test]
    fn body_bytes_are_preserved_exactly() {
        let mut raw = b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\n\r\n".to_vec();
        let payload = [0u8, 159, 146, 150, 13, 10, 13, 10, 255];
        raw.extend_from_slice(&payload);
        let response = HttpResponse::try_from_bytes(&raw).unwrap();
        assert_eq!(response.body, payload);
    }

    #[test]
    fn non_utf8_body_does_not_fail_parsing() {
        // Only the header block must be text; the body is raw bytes.
        let mut raw = b"HTTP/1.1 200 OK\r\nX-Kind: blob\r\n\r\n".to_vec();
        raw.extend_from_slice(&[0xff, 0xfe, 0xfd]);
        let response = HttpResponse::try_from_bytes(&raw).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, [0xff, 0xfe, 0xfd]);
    }

    #[test]
    fn duplicate_header_keeps_last_value() {
        let raw = b"HTTP/1.1 200 OK\r\nX-A: 1\r\nX-A: 2\r\n\r\n";
        let response = HttpResponse::try_from_bytes(raw).unwrap();
        assert_eq!(response.headers.get("X-A").unwrap(), "2");
    }

    #[test]
    fn header_keys_and_values_are_trimmed() {
        let raw = b"HTTP/1.1 200 OK\r\n  X-Spaced  :   padded value \r\n\r\n";
        let response = HttpResponse::try_from_bytes(raw).unwrap();
        assert_eq!(response.headers.get("X-Spaced").unwrap(), "padded value");
    }

    #[test]
    fn header_value_may_contain_colons() {
        let raw = b"HTTP/1.1 200 OK\r\nDate: Mon, 01 Jan 2024 10:00:00 GMT\r\n\r\n";
        let response = HttpResponse::try_from_bytes(raw).unwrap();
        assert_eq!(
            response.headers.get("Date").unwrap(),
            "Mon, 01 Jan 2024 10:00:00 GMT"
        );
    }

    #[test]
    fn missing_terminator_is_reported() {
        let err = HttpResponse::try_from_bytes(b"HTTP/1.1 200 OK\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingHeaderTerminator));
    }

    #[test]
    fn empty_input_is_reported() {
        let err = HttpResponse::try_from_bytes(b"").unwrap_err();
        assert!(matches!(err, ParseError::MissingHeaderTerminator));
    }

    #[test]
    fn non_utf8_header_block_is_reported() {
        let raw = [0xff, 0xfe, b'\r', b'\n', b'\r', b'\n'];
        let err = HttpResponse::try_from_bytes(&raw).unwrap_err();
        assert!(matches!(err, ParseError::InvalidHeaderEncoding));
    }

    #[test]
    fn status_line_without_code_is_reported() {
        let err = HttpResponse::try_from_bytes(b"HTTP/1.1\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedStatusLine(_)));
    }

    #[test]
    fn non_integer_status_code_is_reported() {
        let err = HttpResponse::try_from_bytes(b"HTTP/1.1 abc OK\r\n\r\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidStatusCode(_)));
    }

    #[test]
    fn from_bytes_is_total_on_arbitrary_input() {
        let inputs: &[&[u8]] = &[
            b"",
            b"garbage",
            b"\r\n\r\n",
            b"HTTP/1.1\r\n\r\n",
            b"HTTP/1.1 nope OK\r\n\r\n",
            &[0xc0, 0xc1, b'\r', b'\n', b'\r', b'\n'],
        ];
        for input in inputs {
            let response = HttpResponse::from_bytes(input);
            if HttpResponse::try_from_bytes(input).is_err() {
                assert_eq!(response.status, 500);
                assert!(response.headers.is_empty());
                let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
                assert!(body["error"].is_string());
            }
        }
    }

    #[test]
    fn bare_delimiter_parses_as_malformed() {
        // "\r\n\r\n" alone has an empty status line, which has no code token.
        let response = HttpResponse::from_bytes(b"\r\n\r\n");
        assert_eq!(response.status, 500);
    }

    #[test]
    fn header_line_without_colon_is_skipped() {
        let raw = b"HTTP/1.1 200 OK\r\nnot a header\r\nX-B: ok\r\n\r\n";
        let response = HttpResponse::try_from_bytes(raw).unwrap();
        assert_eq!(response.headers.len(), 1);
        assert_eq!(response.headers.get("X-B").unwrap(), "ok");
    }
}
