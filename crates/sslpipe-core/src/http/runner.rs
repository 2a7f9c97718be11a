//! Process execution seam
//!
//! `ProcessRunner` runs one TLS client process to completion. The production
//! runner uses `tokio::process`; tests substitute scripted runners to drive
//! the retry, timeout and cancellation paths.

use std::future::Future;
use std::io;
use std::process::Stdio;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use crate::http::command::TlsCommand;
use crate::types::ProcessResult;

/// Runs a command with `input` on stdin and collects its output
pub trait ProcessRunner: Send + Sync {
    /// Returns `Err` only when the process could not be driven at all
    /// (spawn failure, broken stdin pipe). A process that runs and exits
    /// non-zero is an `Ok` with `success == false`.
    fn run(&self, command: &TlsCommand, input: &[u8]) -> impl Future<Output = io::Result<ProcessResult>> + Send;
}

/// Spawns a real child process
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl ProcessRunner for TokioProcessRunner {
    async fn run(&self, command: &TlsCommand, input: &[u8]) -> io::Result<ProcessResult> {
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "child stdin was not captured"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "child stdout was not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "child stderr was not captured"))?;

        // Feed stdin while draining both output pipes so neither side blocks
        // on a full pipe buffer.
        let write = async move {
            stdin.write_all(input).await?;
            stdin.shutdown().await?;
            drop(stdin);
            Ok::<_, io::Error>(())
        };
        let read_stdout = async move {
            let mut buf = Vec::new();
            stdout.read_to_end(&mut buf).await?;
            Ok::<_, io::Error>(buf)
        };
        let read_stderr = async move {
            let mut buf = Vec::new();
            stderr.read_to_end(&mut buf).await?;
            Ok::<_, io::Error>(buf)
        };

        let (written, out, err) = tokio::join!(write, read_stdout, read_stderr);
        let status = child.wait().await?;
        written?;

        Ok(ProcessResult {
            success: status.success(),
            exit_code: status.code(),
            stdout: out?,
            stderr: String::from_utf8_lossy(&err?).into_owned(),
        })
    }
}
