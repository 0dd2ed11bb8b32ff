//! Command-line argument parsing for the chatsync CLI.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use std::path::PathBuf;

use crate::config::ClientConfig;

/// Usage text printed by `--help`
pub const USAGE: &str = "\
Usage: chatsync send --conversation <id> [options] <message...>

Sends one message to a conversation and prints the assistant reply.

Options:
  -c, --conversation <id>   Conversation to send to (required)
      --stream              Stream the reply token by token
      --no-stream           Wait for the complete reply
      --base-url <url>      Server origin (default: http://localhost:5000)
      --config <path>       Config file (default: $CONFIG_DIR/chatsync/config.json)
  -h, --help                Show this help
  -V, --version             Show version

Environment:
  CHATSYNC_BASE_URL, CHATSYNC_API_BASE, CHATSYNC_STREAM,
  CHATSYNC_IDLE_TIMEOUT_SECS, RUST_LOG";

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Send a message
    Send(SendArgs),
    /// The arguments could not be understood
    Invalid(String),
}

/// Arguments of the `send` command
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SendArgs {
    pub conversation: String,
    pub message: String,
    /// `Some(true)` for `--stream`, `Some(false)` for `--no-stream`
    pub stream: Option<bool>,
    pub base_url: Option<String>,
    pub config: Option<PathBuf>,
}

impl SendArgs {
    /// Apply the flags on top of a loaded config. Flags win.
    pub fn apply_to(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        if let Some(stream) = self.stream {
            config = config.with_streaming(stream);
        }
        config
    }
}

/// Parse command-line arguments and return the appropriate command.
///
/// `--version` and `--help` win wherever they appear.
///
/// # Examples
///
/// ```
/// use chatsync::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["chatsync".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    for arg in &args {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            _ => {}
        }
    }

    let mut rest = args.into_iter();
    match rest.next().as_deref() {
        None => CliCommand::Help,
        Some("send") => parse_send(rest),
        Some(other) => CliCommand::Invalid(format!("unknown command '{}'", other)),
    }
}

fn parse_send<I>(mut args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut send = SendArgs::default();
    let mut words = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--conversation" | "-c" => match args.next() {
                Some(id) => send.conversation = id,
                None => return CliCommand::Invalid("--conversation needs a value".to_string()),
            },
            "--base-url" => match args.next() {
                Some(url) => send.base_url = Some(url),
                None => return CliCommand::Invalid("--base-url needs a value".to_string()),
            },
            "--config" => match args.next() {
                Some(path) => send.config = Some(PathBuf::from(path)),
                None => return CliCommand::Invalid("--config needs a value".to_string()),
            },
            "--stream" => send.stream = Some(true),
            "--no-stream" => send.stream = Some(false),
            "--" => {
                words.extend(args.by_ref());
            }
            flag if flag.starts_with("--") => {
                return CliCommand::Invalid(format!("unknown option '{}'", flag));
            }
            _ => words.push(arg),
        }
    }

    if send.conversation.is_empty() {
        return CliCommand::Invalid("missing --conversation".to_string());
    }

    send.message = words.join(" ");
    if send.message.trim().is_empty() {
        return CliCommand::Invalid("missing message".to_string());
    }

    CliCommand::Send(send)
}
