//! Core data types: the outgoing request, the TLS client's raw result and
//! the parsed response

use std::collections::HashMap;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use url::Url;
use crate::error::{Error, Result};

/// Client-side TLS material handed to the external process as file paths
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsCredentials {
    /// Client certificate (`-cert`)
    pub client_cert: Option<PathBuf>,
    /// Client private key (`-key`)
    pub client_key: Option<PathBuf>,
    /// CA bundle used to verify the server (`-CAfile`)
    pub ca_cert: Option<PathBuf>,
}

impl TlsCredentials {
    pub fn is_empty(&self) -> bool {
        self.client_cert.is_none() && self.client_key.is_none() && self.ca_cert.is_none()
    }

    /// Fill unset paths from `defaults`
    pub fn or(self, defaults: &TlsCredentials) -> Self {
        Self {
            client_cert: self.client_cert.or_else(|| defaults.client_cert.clone()),
            client_key: self.client_key.or_else(|| defaults.client_key.clone()),
            ca_cert: self.ca_cert.or_else(|| defaults.ca_cert.clone()),
        }
    }
}

/// A single HTTP request to be sent through the TLS client
#[derive(Debug, Clone)]
pub struct Request {
    pub method: String,
    pub url: Url,
    /// Headers in the order they are written to the wire
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub tls: TlsCredentials,
}

impl Request {
    pub fn new(method: impl Into<String>, url: Url) -> Self {
        Self {
            method: method.into(),
            url,
            headers: Vec::new(),
            body: None,
            tls: TlsCredentials::default(),
        }
    }

    /// Create a request from a URL string
    pub fn parse(method: impl Into<String>, url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| Error::invalid_request(format!("Invalid URL '{}': {}", url, e)))?;
        Ok(Self::new(method, url))
    }

    pub fn get(url: &str) -> Result<Self> {
        Self::parse("GET", url)
    }

    pub fn post(url: &str) -> Result<Self> {
        Self::parse("POST", url)
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_tls(mut self, tls: TlsCredentials) -> Self {
        self.tls = tls;
        self
    }

    /// Host name sent in the `Host` header and used for `-connect`
    pub fn host(&self) -> Result<&str> {
        self.url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::invalid_request(format!("URL '{}' has no host", self.url)))
    }

    /// Explicit port, or the scheme's default
    pub fn port(&self) -> Result<u16> {
        self.url
            .port_or_known_default()
            .ok_or_else(|| Error::invalid_request(format!("URL '{}' has no port", self.url)))
    }

    /// Path plus query string, as written in the request line
    pub fn request_target(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_string(),
        }
    }

    /// Whether the caller already set a header (ASCII case-insensitive)
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Reject requests that would produce a malformed or smuggled request line
    pub fn validate(&self) -> Result<()> {
        self.host()?;
        self.port()?;

        if self.method.is_empty() || self.method.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(Error::invalid_request(format!("Invalid method '{}'", self.method)));
        }

        for (key, value) in &self.headers {
            if key.is_empty() || key.contains(':') || has_line_break(key) {
                return Err(Error::invalid_request(format!("Invalid header name '{}'", key.escape_debug())));
            }
            if has_line_break(value) {
                return Err(Error::invalid_request(format!(
                    "Header '{}' contains a line break",
                    key
                )));
            }
        }

        Ok(())
    }
}

fn has_line_break(s: &str) -> bool {
    s.contains('\r') || s.contains('\n')
}

/// What the TLS client process produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResult {
    pub success: bool,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl ProcessResult {
    pub fn succeeded(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            success: true,
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code: Some(exit_code),
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }
}

/// Parsed HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    #[serde(with = "lossy_body")]
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header value by exact name, falling back to a case-insensitive match
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str).or_else(|| {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Bodies serialize as text so JSON output stays readable
mod lossy_body {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        Ok(String::deserialize(deserializer)?.into_bytes())
    }
}
