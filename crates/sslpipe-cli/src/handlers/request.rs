//! Request command handler

use super::utils::{build_request, client_overrides};
use crate::cli::RequestArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::{current_request_id, redaction, timing::Timer, RedactingLogger};
use crate::output::OutputWriter;
use anyhow::Context;
use sslpipe_core::{cancel_pair, HttpsClient, TracingLogger};
use std::fs;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Handle the request command
///
/// Ctrl-C cancels the exchange and kills the TLS client process.
#[instrument(skip(args, config, output), fields(url = %args.url, method = %args.method))]
pub async fn handle_request(args: RequestArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::with_details("request_command", &args.url);

    let client_config = config.client_config(&client_overrides(&args))?;
    let request = build_request(&args, config)?;
    debug!(
        request_id = current_request_id().unwrap_or("unknown"),
        headers = ?redaction::redact_header_pairs(&request.headers),
        body_bytes = request.body.as_ref().map_or(0, Vec::len),
        program = %client_config.program.display(),
        engine = %client_config.engine,
        "Prepared request"
    );

    let client = HttpsClient::new(client_config)?
        .with_logger(Arc::new(RedactingLogger::new(TracingLogger)));

    let (handle, token) = cancel_pair();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling request");
            handle.cancel();
        }
    });
    let result = client.execute_with_cancel(&request, token).await;
    interrupt.abort();
    let response = result?;

    info!(
        status = response.status,
        bytes = response.body.len(),
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Response received"
    );
    if !response.is_success() {
        warn!(status = response.status, "Server answered with a non-success status");
    }

    match &args.save_to {
        Some(path) => {
            fs::write(path, &response.body)
                .with_context(|| format!("Failed to write response body to {}", path.display()))?;
            if args.include {
                let mut head_only = response.clone();
                head_only.body.clear();
                output.response(&head_only, true)?;
            }
            output.success(&format!(
                "✓ Saved {} bytes to {}",
                response.body.len(),
                path.display()
            ))?;
        }
        None => output.response(&response, args.include)?,
    }

    Ok(())
}
