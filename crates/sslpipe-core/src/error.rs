//! Error types for the sslpipe core library
//!
//! Every failure of an exchange surfaces as one of the variants below. Raw
//! `std::io::Error`s from the process boundary are always wrapped, never
//! returned bare.

use std::fmt;
use std::io;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for sslpipe operations
#[derive(Error, Debug)]
pub enum Error {
    /// The remote end did not answer in time, or the configured process
    /// timeout elapsed
    #[error("Timeout: {message}")]
    Timeout { message: String },

    /// The TCP connection could not be established
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// The TLS layer failed (handshake, engine, credentials)
    #[error("SSL error: {message}")]
    Ssl { message: String },

    /// The TLS client failed for a reason that matched no known diagnostic
    #[error("Request failed: {message}")]
    Generic {
        message: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// The TLS client exited successfully but its output is not an HTTP response
    #[error("Malformed response: {message}")]
    Parse { message: String },

    /// The exchange was cancelled by the caller
    #[error("Request cancelled")]
    Cancelled,

    /// The TLS client could not be run, or its input pipe kept breaking
    #[error("Failed to run {program} (after {attempts} attempt(s)): {source}")]
    Invocation {
        program: String,
        attempts: u32,
        #[source]
        source: io::Error,
    },

    /// The request cannot be serialized safely
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Client configuration is unusable
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error category, used by the stderr classification table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Timeout,
    Connection,
    Ssl,
    Generic,
    Parse,
    Cancelled,
    Invocation,
    InvalidRequest,
    Configuration,
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::Connection { .. } => ErrorKind::Connection,
            Error::Ssl { .. } => ErrorKind::Ssl,
            Error::Generic { .. } => ErrorKind::Generic,
            Error::Parse { .. } => ErrorKind::Parse,
            Error::Cancelled => ErrorKind::Cancelled,
            Error::Invocation { .. } => ErrorKind::Invocation,
            Error::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Error::Configuration { .. } => ErrorKind::Configuration,
        }
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        Error::Parse {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_request(message: impl Into<String>) -> Self {
        Error::InvalidRequest {
            message: message.into(),
        }
    }

    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::Connection => write!(f, "connection"),
            ErrorKind::Ssl => write!(f, "ssl"),
            ErrorKind::Generic => write!(f, "generic"),
            ErrorKind::Parse => write!(f, "parse"),
            ErrorKind::Cancelled => write!(f, "cancelled"),
            ErrorKind::Invocation => write!(f, "invocation"),
            ErrorKind::InvalidRequest => write!(f, "invalid-request"),
            ErrorKind::Configuration => write!(f, "configuration"),
        }
    }
}
