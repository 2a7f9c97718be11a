//! Output formatting and writing utilities
//!
//! Responses are written either raw (human format: body bytes untouched,
//! optionally preceded by the status line and headers) or as one JSON
//! document.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use serde::Serialize;
use sslpipe_core::Response;
use std::collections::BTreeMap;
use std::io::{self, Write};
use tracing::debug;

/// Trait for formatting output
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Render a response; `include_head` adds the status line and headers
    fn format_response(&self, response: &Response, include_head: bool, use_color: bool) -> Result<Vec<u8>>;
}

/// JSON shape of a response with headers in stable order
#[derive(Serialize)]
struct ResponseDocument<'a> {
    status: u16,
    headers: BTreeMap<&'a str, &'a str>,
    body: String,
}

impl<'a> From<&'a Response> for ResponseDocument<'a> {
    fn from(response: &'a Response) -> Self {
        Self {
            status: response.status,
            headers: response
                .headers
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect(),
            body: response.text(),
        }
    }
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    fn format_response(&self, response: &Response, include_head: bool, use_color: bool) -> Result<Vec<u8>> {
        match self {
            OutputFormat::Json => {
                let mut rendered = serde_json::to_vec_pretty(&ResponseDocument::from(response))?;
                rendered.push(b'\n');
                Ok(rendered)
            }
            OutputFormat::Human => {
                let mut rendered = Vec::with_capacity(response.body.len() + 256);
                if include_head {
                    rendered.extend_from_slice(format_head_human(response, use_color).as_bytes());
                }
                rendered.extend_from_slice(&response.body);
                Ok(rendered)
            }
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool) -> Self {
        Self::with_writer(format, use_color, quiet, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(format: OutputFormat, use_color: bool, quiet: bool, writer: Box<dyn Write>) -> Self {
        Self {
            format,
            use_color,
            quiet,
            writer,
        }
    }

    /// Write raw bytes
    pub fn write_bytes(&mut self, content: &[u8]) -> Result<()> {
        self.writer.write_all(content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        self.write_bytes(content.as_bytes())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        self.writeln(&formatted)
    }

    /// Write a response in the configured format
    pub fn response(&mut self, response: &Response, include_head: bool) -> Result<()> {
        debug!(
            status = response.status,
            headers = response.headers.len(),
            bytes = response.body.len(),
            "Writing response"
        );
        let rendered = self.format.format_response(response, include_head, self.use_color)?;
        self.write_bytes(&rendered)
    }
}

/// Status line and headers, sorted by name, followed by a blank line
fn format_head_human(response: &Response, use_color: bool) -> String {
    let status = format!("HTTP {}", response.status);
    let mut head = if !use_color {
        status
    } else if response.is_success() {
        status.green().bold().to_string()
    } else if response.status >= 400 {
        status.red().bold().to_string()
    } else {
        status.yellow().bold().to_string()
    };
    head.push('\n');

    let mut headers: Vec<(&String, &String)> = response.headers.iter().collect();
    headers.sort();
    for (name, value) in headers {
        if use_color {
            head.push_str(&format!("{}: {}\n", name.cyan(), value));
        } else {
            head.push_str(&format!("{}: {}\n", name, value));
        }
    }
    head.push('\n');
    head
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Writer whose contents stay readable after being boxed
    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl SharedBuffer {
        fn contents(&self) -> Vec<u8> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn writer(format: OutputFormat, quiet: bool) -> (OutputWriter, SharedBuffer) {
        let buffer = SharedBuffer::default();
        let writer = OutputWriter::with_writer(format, false, quiet, Box::new(buffer.clone()));
        (writer, buffer)
    }

    fn response() -> Response {
        Response {
            status: 200,
            headers: HashMap::from([
                ("Server".to_string(), "nginx".to_string()),
                ("Content-Type".to_string(), "text/plain".to_string()),
            ]),
            body: b"hello".to_vec(),
        }
    }

    #[test]
    fn test_human_body_only() {
        let (mut out, buffer) = writer(OutputFormat::Human, false);
        out.response(&response(), false).unwrap();
        assert_eq!(buffer.contents(), b"hello".to_vec());
    }

    #[test]
    fn test_human_with_head() {
        let (mut out, buffer) = writer(OutputFormat::Human, false);
        out.response(&response(), true).unwrap();
        assert_eq!(
            String::from_utf8(buffer.contents()).unwrap(),
            "HTTP 200\nContent-Type: text/plain\nServer: nginx\n\nhello"
        );
    }

    #[test]
    fn test_human_keeps_binary_body() {
        let (mut out, buffer) = writer(OutputFormat::Human, false);
        let mut binary = response();
        binary.body = vec![0, 159, 146, 150, 255];
        out.response(&binary, false).unwrap();
        assert_eq!(buffer.contents(), vec![0, 159, 146, 150, 255]);
    }

    #[test]
    fn test_json_document() {
        let (mut out, buffer) = writer(OutputFormat::Json, false);
        out.response(&response(), false).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer.contents()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "status": 200,
                "headers": {"Content-Type": "text/plain", "Server": "nginx"},
                "body": "hello"
            })
        );
    }

    #[test]
    fn test_messages_respect_quiet_and_format() {
        let (mut out, buffer) = writer(OutputFormat::Human, true);
        out.success("saved").unwrap();
        out.warning("non-2xx").unwrap();
        assert_eq!(
            String::from_utf8(buffer.contents()).unwrap(),
            "WARNING: non-2xx\n"
        );

        let (mut out, buffer) = writer(OutputFormat::Json, false);
        out.success("saved").unwrap();
        out.warning("non-2xx").unwrap();
        assert!(buffer.contents().is_empty());
    }
}
