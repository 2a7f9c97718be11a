//! End-to-end exchanges through `HttpsClient` with scripted process runners

mod test_support;

use std::path::PathBuf;
use std::sync::Arc;
use pretty_assertions::assert_eq;
use sslpipe_core::http::{ErrorClassifier, ResponseParser};
use sslpipe_core::{
    ClientConfig, Error, ErrorKind, HttpsClient, ProcessResult, Request, TlsCredentials,
};
use test_support::{broken_pipe, sample_response, serialize_response, MemoryLogger, ScriptedRunner};

fn client(outcomes: Vec<std::io::Result<ProcessResult>>) -> HttpsClient<ScriptedRunner> {
    HttpsClient::new(ClientConfig::default())
        .unwrap()
        .with_runner(ScriptedRunner::new(outcomes))
}

#[test]
fn test_response_round_trip() {
    let fixture = sample_response();
    let raw = serialize_response(&fixture, "OK");

    let parsed = ResponseParser::new().parse(&raw).unwrap();
    assert_eq!(parsed, fixture);
}

#[tokio::test]
async fn test_post_exchange() {
    let reply = serialize_response(&sample_response(), "OK");
    let logger = Arc::new(MemoryLogger::default());
    let client = HttpsClient::new(ClientConfig::default().with_engine("gost2012"))
        .unwrap()
        .with_runner(ScriptedRunner::new(vec![Ok(ProcessResult::succeeded(reply))]))
        .with_logger(logger.clone());

    let request = Request::post("https://gis.example.ru:8443/api/v2/submit?async=0")
        .unwrap()
        .with_header("Content-Type", "text/xml; charset=utf-8")
        .with_header("SOAPAction", "urn:submit")
        .with_body("<Envelope/>")
        .with_tls(TlsCredentials {
            client_cert: Some(PathBuf::from("/etc/gost/client.crt")),
            client_key: Some(PathBuf::from("/etc/gost/client.key")),
            ca_cert: Some(PathBuf::from("/etc/gost/ca.pem")),
        });

    let response = client.execute(&request).await.unwrap();
    assert_eq!(response, sample_response());

    let inputs = client.runner().inputs();
    assert_eq!(inputs.len(), 1);
    let (command, stdin) = &inputs[0];
    let args: Vec<String> = command.args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
    assert_eq!(
        args,
        vec![
            "s_client", "-engine", "gost2012", "-connect", "gis.example.ru:8443", "-quiet",
            "-cert", "/etc/gost/client.crt", "-key", "/etc/gost/client.key",
            "-CAfile", "/etc/gost/ca.pem",
        ]
    );
    assert_eq!(
        String::from_utf8(stdin.clone()).unwrap(),
        "POST /api/v2/submit?async=0 HTTP/1.1\r\n\
         Content-Type: text/xml; charset=utf-8\r\n\
         SOAPAction: urn:submit\r\n\
         Content-Length: 11\r\n\
         Host: gis.example.ru\r\n\
         Connection: close\r\n\r\n\
         <Envelope/>\r\n\r\n"
    );

    let debug = logger.debug.lock().unwrap();
    assert_eq!(debug.len(), 3);
    assert!(logger.fatal.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_broken_pipe_once_then_success() {
    let reply = b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello".to_vec();
    let client = client(vec![broken_pipe(), Ok(ProcessResult::succeeded(reply))]);
    let request = Request::get("https://example.com/status").unwrap();

    let response = client.execute(&request).await.unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.text(), "hello");
    assert_eq!(client.runner().calls(), 2);

    // every attempt gets the identical request
    let inputs = client.runner().inputs();
    assert_eq!(inputs[0], inputs[1]);
}

#[tokio::test]
async fn test_broken_pipe_every_attempt() {
    let client = client(vec![broken_pipe(), broken_pipe(), broken_pipe()]);
    let request = Request::get("https://example.com/status").unwrap();

    let err = client.execute(&request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Invocation);
    assert!(matches!(err, Error::Invocation { attempts: 3, .. }));
    assert_eq!(client.runner().calls(), 3);
}

#[tokio::test]
async fn test_stderr_classification_through_client() {
    let cases = [
        ("connect:errno=60", ErrorKind::Timeout),
        ("connect:errno=61", ErrorKind::Connection),
        ("connect:errno=2", ErrorKind::Connection),
        ("140:error:ssl handshake failure:s3_pkt.c", ErrorKind::Ssl),
        ("missing dsa signing cert", ErrorKind::Ssl),
        ("unable to load certificate", ErrorKind::Ssl),
        ("unable to load GOST private key", ErrorKind::Ssl),
        ("Segmentation fault", ErrorKind::Generic),
    ];

    for (stderr, expected) in cases {
        let client = client(vec![Ok(ProcessResult::failed(1, stderr))]);
        let request = Request::get("https://example.com/").unwrap();
        let err = client.execute(&request).await.unwrap_err();
        assert_eq!(err.kind(), expected, "stderr {:?}", stderr);
    }
}

#[test]
fn test_rule_table_is_enumerable() {
    let rules = ErrorClassifier::rules();
    assert_eq!(rules.len(), 7);
    assert!(rules.iter().all(|r| !r.message.is_empty()));
}

#[tokio::test]
async fn test_failure_logs_fatal_events() {
    let logger = Arc::new(MemoryLogger::default());
    let client = client(vec![Ok(ProcessResult::failed(1, "unable to load certificate"))])
        .with_logger(logger.clone());
    let request = Request::get("https://example.com/").unwrap();

    let err = client.execute(&request).await.unwrap_err();
    match err {
        Error::Ssl { message } => assert!(message.contains("client certificate")),
        other => panic!("Expected SSL error, got {:?}", other),
    }

    let fatal = logger.fatal.lock().unwrap();
    assert_eq!(fatal.len(), 3);
    assert!(fatal[2].contains("unable to load certificate"));
}
