//! TLS client invocation with bounded retry
//!
//! The request is piped to a fresh `s_client` process. The client sometimes
//! closes its stdin before the request has been written; that broken pipe is
//! retried inline, without backoff, up to `ClientConfig::max_attempts` total
//! attempts. Every other failure is returned immediately.

use std::io;
use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::http::command::TlsCommand;
use crate::http::runner::ProcessRunner;
use crate::logger::Logger;
use crate::types::ProcessResult;
use crate::Result;

/// Outcome of one attempt
enum Attempt {
    Finished(ProcessResult),
    Failed(io::Error),
}

/// Runs the TLS client for one exchange
#[derive(Debug)]
pub struct ProcessInvoker<'a, R> {
    runner: &'a R,
    config: &'a ClientConfig,
}

impl<'a, R: ProcessRunner> ProcessInvoker<'a, R> {
    pub fn new(runner: &'a R, config: &'a ClientConfig) -> Self {
        Self { runner, config }
    }

    /// Run `command` with `raw_request` on stdin until it completes, the pipe
    /// stops breaking, or attempts run out
    pub async fn invoke(
        &self,
        command: &TlsCommand,
        raw_request: &[u8],
        logger: &dyn Logger,
        cancel: Option<&CancelToken>,
    ) -> Result<ProcessResult> {
        logger.debug(&format!("Connecting to server with command: {}", command));
        logger.debug(&format!(
            "Sending request:\r\n{}",
            String::from_utf8_lossy(raw_request)
        ));

        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            match self.attempt(command, raw_request, cancel).await? {
                Attempt::Finished(result) => {
                    if result.success {
                        logger.debug(&format!(
                            "Received response:\r\n{}",
                            String::from_utf8_lossy(&result.stdout)
                        ));
                    }
                    return Ok(result);
                }
                Attempt::Failed(err) if err.kind() == io::ErrorKind::BrokenPipe && attempt < max_attempts => {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        program = %command.program.display(),
                        "TLS client closed its input early, retrying"
                    );
                }
                Attempt::Failed(err) => {
                    return Err(Error::Invocation {
                        program: command.program_name(),
                        attempts: attempt,
                        source: err,
                    });
                }
            }
        }
    }

    /// One process run, bounded by the configured timeout and the cancel token
    async fn attempt(
        &self,
        command: &TlsCommand,
        raw_request: &[u8],
        cancel: Option<&CancelToken>,
    ) -> Result<Attempt> {
        let run = async {
            let outcome = match self.config.timeout {
                Some(limit) => tokio::time::timeout(limit, self.runner.run(command, raw_request))
                    .await
                    .map_err(|_| Error::Timeout {
                        message: format!("TLS client did not finish within {:?}", limit),
                    })?,
                None => self.runner.run(command, raw_request).await,
            };
            Ok(match outcome {
                Ok(result) => Attempt::Finished(result),
                Err(err) => Attempt::Failed(err),
            })
        };

        match cancel {
            Some(token) => {
                let mut token = token.clone();
                if token.is_cancelled() {
                    return Err(Error::Cancelled);
                }
                tokio::select! {
                    outcome = run => outcome,
                    _ = token.cancelled() => Err(Error::Cancelled),
                }
            }
            None => run.await,
        }
    }
}
