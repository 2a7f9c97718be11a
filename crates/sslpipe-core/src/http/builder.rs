//! Raw HTTP/1.1 request serialization
//!
//! The TLS client forwards stdin verbatim, so the request is written out
//! byte for byte here. `Connection: close` is always sent so the peer ends
//! the session and the client process exits after one exchange.

use crate::types::Request;
use crate::Result;

const CRLF: &str = "\r\n";

/// Serializes a `Request` into the bytes piped to the TLS client
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestBuilder;

impl RequestBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the raw request bytes
    ///
    /// Header values are written as given; `Request::validate` is the place
    /// that rejects embedded line breaks.
    pub fn build(&self, request: &Request) -> Result<Vec<u8>> {
        let host = request.host()?;

        let mut head = format!(
            "{} {} HTTP/1.1{CRLF}",
            request.method.to_uppercase(),
            request.request_target()
        );

        for (key, value) in &request.headers {
            head.push_str(&format!("{}: {}{CRLF}", key, value));
        }

        if let Some(body) = &request.body {
            if !request.has_header("Content-Length") {
                head.push_str(&format!("Content-Length: {}{CRLF}", body.len()));
            }
        }

        head.push_str(&format!("Host: {}{CRLF}Connection: close{CRLF}{CRLF}", host));

        let mut raw = head.into_bytes();
        if let Some(body) = &request.body {
            raw.extend_from_slice(body);
            raw.extend_from_slice(b"\r\n\r\n");
        }

        Ok(raw)
    }
}
