//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// sslpipe - HTTPS requests through `openssl s_client`
///
/// Sends a single HTTP/1.1 request through an external OpenSSL binary with a
/// loadable crypto engine (GOST by default) and prints the response.
#[derive(Parser, Debug)]
#[command(
    name = "sslpipe",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SSLPIPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one request and print the response
    Request(RequestArgs),

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the request command
#[derive(Parser, Debug)]
pub struct RequestArgs {
    /// Target URL (https://host[:port]/path?query)
    #[arg(value_name = "URL")]
    pub url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    pub method: String,

    /// Request header as 'Name: value' (repeatable)
    #[arg(short = 'H', long = "header", value_name = "HEADER", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Request body
    #[arg(short = 'd', long, conflicts_with = "data_file")]
    pub data: Option<String>,

    /// Read the request body from a file
    #[arg(long, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Client certificate passed as -cert
    #[arg(long, value_name = "PATH")]
    pub cert: Option<PathBuf>,

    /// Client private key passed as -key
    #[arg(long, value_name = "PATH")]
    pub key: Option<PathBuf>,

    /// CA bundle passed as -CAfile
    #[arg(long, value_name = "PATH")]
    pub cafile: Option<PathBuf>,

    /// Crypto engine name (overrides configuration)
    #[arg(long)]
    pub engine: Option<String>,

    /// OpenSSL executable (overrides configuration)
    #[arg(long, value_name = "PATH")]
    pub openssl: Option<PathBuf>,

    /// Per-attempt timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<f64>,

    /// Attempts when the client closes its input early
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Print the status line and headers before the body
    #[arg(short, long)]
    pub include: bool,

    /// Write the response body to a file instead of stdout
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a configuration file with default values
    Init(ConfigInitArgs),

    /// Show the effective configuration
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to the user config directory)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// YAML format
    Yaml,
    /// JSON format
    Json,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw body (and optional head) for people and pipes
    Human,
    /// Status, headers and body as one JSON document
    Json,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

/// Parse a `Name: value` header argument
fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected 'Name: value', got '{}'", raw))?;
    let name = name.trim();
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(format!("invalid header name in '{}'", raw));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_request_args() {
        let cli = Cli::parse_from([
            "sslpipe", "-vv", "request", "https://example.com/api",
            "-X", "POST",
            "-H", "Content-Type: application/json",
            "-H", "X-Trace:abc",
            "-d", "{}",
            "--cert", "client.crt",
            "--timeout", "2.5",
            "-i",
        ]);
        assert_eq!(cli.verbosity_level(), 2);

        let Commands::Request(args) = cli.command else {
            panic!("Expected request command");
        };
        assert_eq!(args.method, "POST");
        assert_eq!(
            args.headers,
            vec![
                ("Content-Type".to_string(), "application/json".to_string()),
                ("X-Trace".to_string(), "abc".to_string()),
            ]
        );
        assert_eq!(args.data.as_deref(), Some("{}"));
        assert_eq!(args.cert, Some(PathBuf::from("client.crt")));
        assert_eq!(args.timeout, Some(2.5));
        assert!(args.include);
    }

    #[test]
    fn test_data_and_data_file_conflict() {
        let result = Cli::try_parse_from([
            "sslpipe", "request", "https://example.com/", "-d", "x", "--data-file", "body.bin",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_resets_verbosity() {
        let cli = Cli::parse_from(["sslpipe", "--quiet", "config", "show"]);
        assert!(cli.quiet);
        assert_eq!(cli.verbosity_level(), 0);
    }

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Accept:  */*  ").unwrap(),
            ("Accept".to_string(), "*/*".to_string())
        );
        assert_eq!(
            parse_header("X-Empty:").unwrap(),
            ("X-Empty".to_string(), String::new())
        );
        assert!(parse_header("no colon here").is_err());
        assert!(parse_header(": value").is_err());
        assert!(parse_header("Bad Name: value").is_err());
    }
}
