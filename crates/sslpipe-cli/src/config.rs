//! Configuration management for the CLI
//!
//! Settings come from, in increasing precedence:
//! - Default values
//! - A configuration file (YAML/JSON)
//! - Command-line arguments

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use sslpipe_core::{ClientConfig, TlsCredentials};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TLS client settings
    pub client: ClientConfig,

    /// Certificate paths used when none are given on the command line
    pub tls: TlsCredentials,

    /// Headers sent with every request unless overridden per request
    pub headers: BTreeMap<String, String>,
}

/// Per-invocation overrides taken from the command line
#[derive(Debug, Clone, Default)]
pub struct ClientOverrides {
    pub program: Option<PathBuf>,
    pub engine: Option<String>,
    pub timeout_secs: Option<f64>,
    pub max_attempts: Option<u32>,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)?;

        let config: Config = if is_yaml(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        tracing::debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    /// Location `config init` writes to by default
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sslpipe").join("config.yaml"))
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".sslpipe.yaml"),
            PathBuf::from(".sslpipe.yml"),
            PathBuf::from(".sslpipe.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let sslpipe_dir = config_dir.join("sslpipe");
            paths.push(sslpipe_dir.join("config.yaml"));
            paths.push(sslpipe_dir.join("config.json"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".sslpipe.yaml"));
            paths.push(home_dir.join(".sslpipe.json"));
        }

        paths
    }

    /// Reject settings the client would refuse at request time
    pub fn validate(&self) -> Result<()> {
        self.client
            .validate()
            .map_err(|e| Error::config(e.to_string()))?;

        for name in self.headers.keys() {
            if name.trim().is_empty() || name.contains(':') {
                return Err(Error::config(format!("invalid default header name '{}'", name)));
            }
        }

        Ok(())
    }

    /// Client configuration with command-line overrides applied
    pub fn client_config(&self, overrides: &ClientOverrides) -> Result<ClientConfig> {
        let mut client = self.client.clone();

        if let Some(program) = &overrides.program {
            client.program = program.clone();
        }
        if let Some(engine) = &overrides.engine {
            client.engine = engine.clone();
        }
        if let Some(attempts) = overrides.max_attempts {
            client.max_attempts = attempts;
        }
        if let Some(secs) = overrides.timeout_secs {
            let timeout = Duration::try_from_secs_f64(secs)
                .map_err(|_| Error::invalid_args(format!("invalid timeout: {}", secs)))?;
            client.timeout = Some(timeout);
        }

        client.validate()?;
        Ok(client)
    }

    /// Serialize to YAML or JSON, chosen by extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_yaml(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|s| s.to_str()),
        Some("yaml") | Some("yml")
    )
}
