//! Shared utilities for command handlers

use crate::cli::RequestArgs;
use crate::config::{ClientOverrides, Config};
use crate::error::{Error, Result};
use anyhow::Context;
use sslpipe_core::{Request, TlsCredentials};
use std::fs;

/// Assemble the request from command-line arguments and configured defaults
///
/// Configured default headers are sent first unless the command line sets
/// the same name (case-insensitively).
pub fn build_request(args: &RequestArgs, config: &Config) -> Result<Request> {
    let mut request = Request::parse(args.method.as_str(), &args.url)?;

    for (name, value) in &config.headers {
        let overridden = args
            .headers
            .iter()
            .any(|(given, _)| given.eq_ignore_ascii_case(name));
        if !overridden {
            request = request.with_header(name.as_str(), value.as_str());
        }
    }
    for (name, value) in &args.headers {
        request = request.with_header(name.as_str(), value.as_str());
    }

    if let Some(body) = load_body(args)? {
        request = request.with_body(body);
    }

    let tls = TlsCredentials {
        client_cert: args.cert.clone(),
        client_key: args.key.clone(),
        ca_cert: args.cafile.clone(),
    };
    Ok(request.with_tls(tls.or(&config.tls)))
}

/// Body from `--data` or `--data-file`
pub fn load_body(args: &RequestArgs) -> Result<Option<Vec<u8>>> {
    if let Some(data) = &args.data {
        return Ok(Some(data.clone().into_bytes()));
    }

    match &args.data_file {
        Some(path) if !path.exists() => Err(Error::FileNotFound { path: path.clone() }),
        Some(path) => {
            let body = fs::read(path)
                .with_context(|| format!("Failed to read request body from {}", path.display()))?;
            Ok(Some(body))
        }
        None => Ok(None),
    }
}

/// Client overrides named on the command line
pub fn client_overrides(args: &RequestArgs) -> ClientOverrides {
    ClientOverrides {
        program: args.openssl.clone(),
        engine: args.engine.clone(),
        timeout_secs: args.timeout,
        max_attempts: args.max_attempts,
    }
}
