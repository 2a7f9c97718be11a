//! Error types and handling for the CLI

use sslpipe_core::ErrorKind;
use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error from the exchange itself
    #[error("{0}")]
    Core(#[from] sslpipe_core::Error),

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument combination
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Failure with context attached at the call site
    #[error(transparent)]
    Context(#[from] anyhow::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_args(message: impl Into<String>) -> Self {
        Self::InvalidArgs(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) | Self::Context(_) => 1,
            Self::Core(err) => match err.kind() {
                ErrorKind::Generic => 2,
                ErrorKind::Configuration => 5,
                ErrorKind::InvalidRequest => 6,
                ErrorKind::Connection => 10,
                ErrorKind::Timeout => 11,
                ErrorKind::Ssl => 12,
                ErrorKind::Parse => 13,
                ErrorKind::Invocation => 14,
                ErrorKind::Cancelled => 130,
            },
            Self::FileNotFound { .. } => 3,
            Self::Config(_) => 5,
            Self::InvalidArgs(_) => 6,
            Self::Json(_) => 15,
            Self::Yaml(_) => 16,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::InvalidArgs(_))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    let mut message = error.to_string();

    // the raw diagnostics are only in the fatal log; repeat them for generic failures
    if let Error::Core(sslpipe_core::Error::Generic { stderr, .. }) = error {
        let stderr = stderr.trim_end();
        if !stderr.is_empty() {
            message.push_str("\n\n");
            message.push_str(stderr);
        }
    }

    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), message)
    } else {
        format!("Error: {}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_follow_core_kind() {
        let timeout: Error = sslpipe_core::Error::Timeout {
            message: "Remote server timeout".to_string(),
        }
        .into();
        assert_eq!(timeout.exit_code(), 11);

        let ssl: Error = sslpipe_core::Error::Ssl {
            message: "Probably your OpenSSL lacks GOST configuration".to_string(),
        }
        .into();
        assert_eq!(ssl.exit_code(), 12);

        assert_eq!(Error::from(sslpipe_core::Error::Cancelled).exit_code(), 130);
        assert_eq!(Error::invalid_args("x").exit_code(), 6);
    }

    #[test]
    fn test_format_error_plain() {
        let err: Error = sslpipe_core::Error::Connection {
            message: "Connection refused".to_string(),
        }
        .into();
        assert_eq!(
            format_error(&err, false),
            "Error: Connection error: Connection refused"
        );
    }

    #[test]
    fn test_format_error_includes_generic_stderr() {
        let err: Error = sslpipe_core::Error::Generic {
            message: "TLS client exited with code 1".to_string(),
            exit_code: Some(1),
            stderr: "engine not found\n".to_string(),
        }
        .into();

        let formatted = format_error(&err, false);
        assert!(formatted.starts_with("Error: Request failed: TLS client exited with code 1"));
        assert!(formatted.ends_with("\n\nengine not found"));
    }

    #[test]
    fn test_context_errors() {
        use anyhow::Context;

        let err: Error = std::fs::read("/definitely/not/here")
            .context("Failed to read request body")
            .unwrap_err()
            .into();
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "Failed to read request body");
        assert!(!err.should_show_help());
    }
}
