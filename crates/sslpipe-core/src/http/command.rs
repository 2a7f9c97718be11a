//! TLS client command line

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use crate::config::ClientConfig;
use crate::types::Request;
use crate::Result;

/// Program plus arguments for one `s_client` run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsCommand {
    pub program: PathBuf,
    pub args: Vec<OsString>,
}

impl TlsCommand {
    /// `s_client -engine <engine> -connect <host>:<port> -quiet [-cert ..] [-key ..] [-CAfile ..]`
    pub fn for_request(config: &ClientConfig, request: &Request) -> Result<Self> {
        let host = request.host()?;
        let port = request.port()?;

        let mut args: Vec<OsString> = vec![
            "s_client".into(),
            "-engine".into(),
            config.engine.clone().into(),
            "-connect".into(),
            connect_target(host, port).into(),
            "-quiet".into(),
        ];

        let tls = &request.tls;
        push_path(&mut args, "-cert", tls.client_cert.as_deref());
        push_path(&mut args, "-key", tls.client_key.as_deref());
        push_path(&mut args, "-CAfile", tls.ca_cert.as_deref());

        Ok(Self {
            program: config.program.clone(),
            args,
        })
    }

    /// Program name for error messages
    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

fn connect_target(host: &str, port: u16) -> String {
    // IPv6 literals already come bracketed from `Url::host_str`
    format!("{}:{}", host, port)
}

fn push_path(args: &mut Vec<OsString>, flag: &str, path: Option<&Path>) {
    if let Some(path) = path {
        args.push(flag.into());
        args.push(path.as_os_str().to_owned());
    }
}

/// Shell-style rendering used in log lines
impl fmt::Display for TlsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.starts_with('-') || arg == "s_client" {
                write!(f, " {}", arg)?;
            } else {
                write!(f, " '{}'", arg.replace('\'', r"'\''"))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TlsCredentials;

    fn args(command: &TlsCommand) -> Vec<String> {
        command.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_minimal_command() {
        let request = Request::get("https://example.com/status").unwrap();
        let command = TlsCommand::for_request(&ClientConfig::default(), &request).unwrap();

        assert_eq!(command.program, PathBuf::from("openssl"));
        assert_eq!(
            args(&command),
            vec!["s_client", "-engine", "gost", "-connect", "example.com:443", "-quiet"]
        );
    }

    #[test]
    fn test_credentials_are_appended_when_present() {
        let request = Request::get("https://bank.example:8443/")
            .unwrap()
            .with_tls(TlsCredentials {
                client_cert: Some(PathBuf::from("/keys/client.pem")),
                client_key: None,
                ca_cert: Some(PathBuf::from("/keys/ca bundle.pem")),
            });
        let command = TlsCommand::for_request(&ClientConfig::default(), &request).unwrap();

        assert_eq!(
            args(&command),
            vec![
                "s_client", "-engine", "gost", "-connect", "bank.example:8443", "-quiet",
                "-cert", "/keys/client.pem", "-CAfile", "/keys/ca bundle.pem",
            ]
        );
    }

    #[test]
    fn test_engine_follows_config_and_quiet_is_always_set() {
        let config = ClientConfig::default().with_engine("gost2012").with_program("/opt/ssl/openssl");
        let request = Request::get("https://example.com/").unwrap();
        let command = TlsCommand::for_request(&config, &request).unwrap();

        assert_eq!(command.program_name(), "/opt/ssl/openssl");
        assert!(args(&command).contains(&"gost2012".to_string()));
        assert_eq!(args(&command).last().map(String::as_str), Some("-quiet"));
    }

    #[test]
    fn test_display_quotes_values() {
        let request = Request::get("https://example.com/")
            .unwrap()
            .with_tls(TlsCredentials {
                client_key: Some(PathBuf::from("/keys/it's.key")),
                ..TlsCredentials::default()
            });
        let command = TlsCommand::for_request(&ClientConfig::default(), &request).unwrap();

        assert_eq!(
            command.to_string(),
            r"openssl s_client -engine 'gost' -connect 'example.com:443' -quiet -key '/keys/it'\''s.key'"
        );
    }
}
