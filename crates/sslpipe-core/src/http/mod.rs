//! Raw HTTP over an external TLS client process
//!
//! This module provides the pieces of one exchange:
//! - Request serialization to raw HTTP/1.1 bytes
//! - TLS client command construction
//! - Process execution with bounded broken-pipe retry
//! - Response parsing
//! - Classification of TLS client failures from stderr

pub mod builder;
pub mod command;
pub mod runner;
pub mod invoker;
pub mod parser;
pub mod classifier;

pub use builder::RequestBuilder;
pub use command::TlsCommand;
pub use runner::{ProcessRunner, TokioProcessRunner};
pub use invoker::ProcessInvoker;
pub use parser::ResponseParser;
pub use classifier::{ClassifierRule, ErrorClassifier};
