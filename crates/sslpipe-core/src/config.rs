//! Client configuration
//!
//! Controls which TLS client binary is run, which engine it loads and how
//! invocation failures are bounded.

use std::path::PathBuf;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{Error, Result};

/// Default number of attempts when the TLS client's stdin pipe breaks
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Configuration for `HttpsClient`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// TLS client executable
    pub program: PathBuf,
    /// Cryptographic engine passed as `-engine`
    pub engine: String,
    /// Total attempts when writing the request hits a broken pipe
    pub max_attempts: u32,
    /// Upper bound for a single process run. `None` waits for the process
    /// indefinitely, so a peer that never closes the connection blocks the
    /// caller forever.
    #[serde(with = "optional_secs")]
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("openssl"),
            engine: "gost".to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.program.as_os_str().is_empty() {
            return Err(Error::configuration("TLS client program cannot be empty"));
        }

        if self.engine.trim().is_empty() {
            return Err(Error::configuration("Engine name cannot be empty"));
        }

        if self.max_attempts == 0 {
            return Err(Error::configuration("max_attempts must be at least 1"));
        }

        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(Error::configuration("Timeout cannot be zero"));
            }
        }

        Ok(())
    }
}

/// `Option<Duration>` as fractional seconds
mod optional_secs {
    use std::time::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&d.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<f64>::deserialize(deserializer)?;
        secs.map(|s| {
            Duration::try_from_secs_f64(s)
                .map_err(|e| serde::de::Error::custom(format!("invalid timeout {}: {}", s, e)))
        })
        .transpose()
    }
}
