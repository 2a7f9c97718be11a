//! Logging collaborator
//!
//! The exchange reports at fixed points only: two debug events around a
//! successful run and fatal events when the TLS client fails. The sink is
//! injected so hosts decide where those lines go.

/// Sink for exchange log events
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);
    fn fatal(&self, message: &str);
}

/// Forwards events to `tracing` under the `sslpipe::exchange` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "sslpipe::exchange", "{}", message);
    }

    fn fatal(&self, message: &str) {
        tracing::error!(target: "sslpipe::exchange", "{}", message);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _message: &str) {}
    fn fatal(&self, _message: &str) {}
}
