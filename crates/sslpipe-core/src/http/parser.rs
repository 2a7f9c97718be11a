//! Raw HTTP response parsing
//!
//! Only called when the TLS client exited successfully. The whole response
//! is buffered; chunked bodies are returned as-is.

use std::collections::HashMap;
use std::sync::OnceLock;
use regex::Regex;
use crate::error::Error;
use crate::types::Response;
use crate::Result;

static STATUS_CODE_REGEX: OnceLock<Regex> = OnceLock::new();

fn status_code_regex() -> &'static Regex {
    STATUS_CODE_REGEX.get_or_init(|| Regex::new(r"[0-9]{3}").expect("Valid regex pattern"))
}

/// Turns the TLS client's stdout into a `Response`
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, raw: &[u8]) -> Result<Response> {
        if raw.is_empty() {
            return Err(Error::parse("TLS client produced no output"));
        }

        let (status_line, rest) = split_once(raw, b"\r\n")
            .ok_or_else(|| Error::parse("Response has no status line terminator"))?;

        let (header_block, body) = if let Some(body) = rest.strip_prefix(b"\r\n") {
            // status line directly followed by the blank line
            (&rest[..0], body)
        } else {
            split_once(rest, b"\r\n\r\n")
                .ok_or_else(|| Error::parse("Response has no header/body boundary"))?
        };

        let status = parse_status(status_line)?;
        let headers = parse_headers(header_block);

        Ok(Response {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

fn split_once<'a>(haystack: &'a [u8], needle: &[u8]) -> Option<(&'a [u8], &'a [u8])> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| (&haystack[..pos], &haystack[pos + needle.len()..]))
}

fn parse_status(status_line: &[u8]) -> Result<u16> {
    let line = String::from_utf8_lossy(status_line);
    let status = status_code_regex()
        .find(&line)
        .and_then(|m| m.as_str().parse::<u16>().ok())
        .ok_or_else(|| Error::parse(format!("No status code in status line '{}'", line.trim())))?;

    if !(100..=599).contains(&status) {
        return Err(Error::parse(format!(
            "Status code {} out of range in status line '{}'",
            status,
            line.trim()
        )));
    }
    Ok(status)
}

fn parse_headers(block: &[u8]) -> HashMap<String, String> {
    let text = String::from_utf8_lossy(block);
    let mut headers = HashMap::new();

    for line in text.split("\r\n") {
        if line.trim().is_empty() {
            continue;
        }
        match line.split_once(':') {
            Some((key, value)) => {
                headers.insert(key.trim().to_string(), value.trim().to_string());
            }
            None => {
                tracing::debug!(line = %line, "Skipping header line without a colon");
            }
        }
    }

    headers
}
