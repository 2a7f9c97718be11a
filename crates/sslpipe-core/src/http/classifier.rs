//! TLS client failure classification
//!
//! `openssl s_client` exits with status 1 for nearly every failure, so the
//! only usable signal is its stderr. Rules are tried top to bottom and the
//! first match decides the error.

use std::sync::OnceLock;
use regex::Regex;
use crate::error::{Error, ErrorKind};
use crate::http::command::TlsCommand;
use crate::logger::Logger;
use crate::types::ProcessResult;

/// One stderr pattern and the error it produces
#[derive(Debug)]
pub struct ClassifierRule {
    pub pattern: Regex,
    pub kind: ErrorKind,
    pub message: &'static str,
}

impl ClassifierRule {
    fn new(pattern: &str, kind: ErrorKind, message: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("Valid regex pattern"),
            kind,
            message,
        }
    }

    pub fn matches(&self, stderr: &str) -> bool {
        self.pattern.is_match(stderr)
    }

    fn to_error(&self) -> Error {
        let message = self.message.to_string();
        match self.kind {
            ErrorKind::Timeout => Error::Timeout { message },
            ErrorKind::Connection => Error::Connection { message },
            ErrorKind::Ssl => Error::Ssl { message },
            _ => Error::Generic {
                message,
                exit_code: None,
                stderr: String::new(),
            },
        }
    }
}

static RULES: OnceLock<Vec<ClassifierRule>> = OnceLock::new();

fn rules() -> &'static [ClassifierRule] {
    RULES.get_or_init(|| {
        vec![
            ClassifierRule::new(r"connect:errno=60", ErrorKind::Timeout, "Connection attempt timed out"),
            ClassifierRule::new(r"connect:errno=61", ErrorKind::Connection, "Connection refused"),
            ClassifierRule::new(r"connect:errno=2", ErrorKind::Connection, "Host name could not be resolved"),
            ClassifierRule::new(
                r"ssl handshake failure",
                ErrorKind::Ssl,
                "Seems like you are trying to connect to HTTP, not HTTPS",
            ),
            ClassifierRule::new(
                r"missing dsa signing cert",
                ErrorKind::Ssl,
                "Probably your OpenSSL lacks GOST configuration",
            ),
            ClassifierRule::new(
                r"unable to load certificate",
                ErrorKind::Ssl,
                "Can not load client certificate, check file path and access rights",
            ),
            ClassifierRule::new(
                r"unable to load .*? private key",
                ErrorKind::Ssl,
                "Can not load client certificate private key, check file path and access rights",
            ),
        ]
    })
}

/// Maps a failed `ProcessResult` to a typed error
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// The ordered rule table
    pub fn rules() -> &'static [ClassifierRule] {
        rules()
    }

    /// Classify stderr text alone
    pub fn classify_stderr(&self, stderr: &str) -> Option<&'static ClassifierRule> {
        rules().iter().find(|rule| rule.matches(stderr))
    }

    /// Log the failure and turn it into an error
    pub fn classify(&self, command: &TlsCommand, host: &str, result: &ProcessResult, logger: &dyn Logger) -> Error {
        let status = match result.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        };

        logger.fatal(&format!("While connecting to server {} with command: {}", host, command));
        logger.fatal(&format!("Command returned: {}", status));
        logger.fatal(&format!("STDERR is:\n{}", result.stderr));

        match self.classify_stderr(&result.stderr) {
            Some(rule) => rule.to_error(),
            None => Error::Generic {
                message: format!("TLS client failed with {}", status),
                exit_code: result.exit_code,
                stderr: result.stderr.clone(),
            },
        }
    }
}
