//! Shared test support utilities for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use sslpipe_core::http::{ProcessRunner, TlsCommand};
use sslpipe_core::{Logger, ProcessResult, Response};

/// Serialize a response the way a server would put it on the wire
pub fn serialize_response(response: &Response, reason: &str) -> Vec<u8> {
    let mut raw = format!("HTTP/1.1 {} {}\r\n", response.status, reason).into_bytes();
    let mut keys: Vec<&String> = response.headers.keys().collect();
    keys.sort();
    for key in keys {
        raw.extend_from_slice(format!("{}: {}\r\n", key, response.headers[key]).as_bytes());
    }
    raw.extend_from_slice(b"\r\n");
    raw.extend_from_slice(&response.body);
    raw
}

/// A response with a few headers and a body
pub fn sample_response() -> Response {
    Response {
        status: 200,
        headers: HashMap::from([
            ("Content-Type".to_string(), "application/json; charset=utf-8".to_string()),
            ("Server".to_string(), "nginx".to_string()),
            ("X-Request-Id".to_string(), "4f0c2b".to_string()),
        ]),
        body: br#"{"status":"ok","items":[1,2,3]}"#.to_vec(),
    }
}

/// Replays scripted outcomes and records every invocation
#[derive(Default)]
pub struct ScriptedRunner {
    outcomes: Mutex<VecDeque<io::Result<ProcessResult>>>,
    inputs: Mutex<Vec<(TlsCommand, Vec<u8>)>>,
    calls: AtomicU32,
}

impl ScriptedRunner {
    pub fn new(outcomes: Vec<io::Result<ProcessResult>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<(TlsCommand, Vec<u8>)> {
        self.inputs.lock().unwrap().clone()
    }
}

impl ProcessRunner for ScriptedRunner {
    async fn run(&self, command: &TlsCommand, input: &[u8]) -> io::Result<ProcessResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push((command.clone(), input.to_vec()));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(io::Error::new(io::ErrorKind::Other, "no scripted outcome left")))
    }
}

pub fn broken_pipe() -> io::Result<ProcessResult> {
    Err(io::Error::from(io::ErrorKind::BrokenPipe))
}

/// Collects log lines by level
#[derive(Debug, Default)]
pub struct MemoryLogger {
    pub debug: Mutex<Vec<String>>,
    pub fatal: Mutex<Vec<String>>,
}

impl Logger for MemoryLogger {
    fn debug(&self, message: &str) {
        self.debug.lock().unwrap().push(message.to_string());
    }

    fn fatal(&self, message: &str) {
        self.fatal.lock().unwrap().push(message.to_string());
    }
}
