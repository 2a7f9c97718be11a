//! sslpipe Core - HTTPS through an external TLS client process
//!
//! Some cryptographic suites (GOST among them) are only available through an
//! OpenSSL build with the matching engine, not through the TLS stack linked
//! into the host. This crate hands the whole TLS session to
//! `openssl s_client`, writing a raw HTTP/1.1 request to its stdin and
//! reading the raw response back from stdout.
//!
//! # Main Components
//!
//! - **Request serialization**: `http::RequestBuilder`
//! - **Process invocation**: `http::ProcessInvoker` over a `ProcessRunner`
//! - **Response parsing**: `http::ResponseParser`
//! - **Failure classification**: `http::ErrorClassifier`
//! - **Client**: `HttpsClient` ties them together
//!
//! # Example
//!
//! ```no_run
//! use sslpipe_core::{ClientConfig, HttpsClient, Request, Result};
//!
//! async fn example() -> Result<()> {
//!     let client = HttpsClient::new(ClientConfig::default())?;
//!     let request = Request::get("https://example.com/status")?;
//!     let response = client.execute(&request).await?;
//!     println!("{} {}", response.status, response.text());
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod types;

pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use client::HttpsClient;
pub use config::ClientConfig;
pub use error::{Error, ErrorKind, Result};
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use types::{ProcessResult, Request, Response, TlsCredentials};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
