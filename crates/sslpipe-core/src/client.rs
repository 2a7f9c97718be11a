//! HTTPS client orchestrating one exchange through the TLS client process
//!
//! build raw request → run `s_client` → parse stdout, or classify stderr

use std::sync::Arc;
use crate::cancel::CancelToken;
use crate::config::ClientConfig;
use crate::http::{ErrorClassifier, ProcessInvoker, ProcessRunner, RequestBuilder, ResponseParser, TlsCommand, TokioProcessRunner};
use crate::logger::{Logger, TracingLogger};
use crate::types::{Request, Response};
use crate::Result;

/// HTTPS client backed by an external TLS client binary
///
/// Stateless between calls: every `execute` spawns its own process, so one
/// client can be shared across tasks and threads.
pub struct HttpsClient<R = TokioProcessRunner> {
    config: ClientConfig,
    runner: R,
    logger: Arc<dyn Logger>,
    builder: RequestBuilder,
    parser: ResponseParser,
    classifier: ErrorClassifier,
}

impl HttpsClient {
    /// Create a client that spawns real processes and logs through `tracing`
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            runner: TokioProcessRunner,
            logger: Arc::new(TracingLogger),
            builder: RequestBuilder::new(),
            parser: ResponseParser::new(),
            classifier: ErrorClassifier::new(),
        })
    }

    /// Create with default configuration (`openssl`, engine `gost`)
    pub fn with_default_config() -> Self {
        Self {
            config: ClientConfig::default(),
            runner: TokioProcessRunner,
            logger: Arc::new(TracingLogger),
            builder: RequestBuilder::new(),
            parser: ResponseParser::new(),
            classifier: ErrorClassifier::new(),
        }
    }
}

impl<R: ProcessRunner> HttpsClient<R> {
    /// Swap the process runner
    pub fn with_runner<T: ProcessRunner>(self, runner: T) -> HttpsClient<T> {
        HttpsClient {
            config: self.config,
            runner,
            logger: self.logger,
            builder: self.builder,
            parser: self.parser,
            classifier: self.classifier,
        }
    }

    /// Replace the logging sink
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Perform one request/response exchange
    pub async fn execute(&self, request: &Request) -> Result<Response> {
        self.exchange(request, None).await
    }

    /// Like `execute`, but aborts (killing the process) when `cancel` fires
    pub async fn execute_with_cancel(&self, request: &Request, cancel: CancelToken) -> Result<Response> {
        self.exchange(request, Some(&cancel)).await
    }

    /// Blocking version of `execute`
    ///
    /// Drives the exchange on an internal current-thread runtime. Must not be
    /// called from inside an async runtime.
    #[cfg(feature = "blocking")]
    pub fn execute_blocking(&self, request: &Request) -> Result<Response> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(crate::Error::Configuration {
                message: "execute_blocking called from within an async runtime; use execute instead"
                    .to_string(),
            });
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: format!("Failed to create runtime: {}", e),
            })?;

        runtime.block_on(self.execute(request))
    }

    #[tracing::instrument(skip(self, request, cancel), fields(method = %request.method, url = %request.url))]
    async fn exchange(&self, request: &Request, cancel: Option<&CancelToken>) -> Result<Response> {
        request.validate()?;

        let raw_request = self.builder.build(request)?;
        let command = TlsCommand::for_request(&self.config, request)?;

        let result = ProcessInvoker::new(&self.runner, &self.config)
            .invoke(&command, &raw_request, self.logger.as_ref(), cancel)
            .await?;

        if result.success {
            let response = self.parser.parse(&result.stdout)?;
            tracing::debug!(status = response.status, bytes = response.body.len(), "Exchange completed");
            Ok(response)
        } else {
            Err(self
                .classifier
                .classify(&command, request.host()?, &result, self.logger.as_ref()))
        }
    }
}
