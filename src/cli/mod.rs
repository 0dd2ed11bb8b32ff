//! CLI module for chatsync.
//!
//! - Argument parsing
//! - Version display
//! - The `send` command, which streams a reply to stdout
//!
//! # Usage
//!
//! ```ignore
//! use chatsync::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command).await?;
//! ```

pub mod args;
pub mod render;
pub mod send;
pub mod version;

pub use args::{parse_args, CliCommand, SendArgs, USAGE};
pub use render::ReplyPrinter;
pub use send::run_send;
pub use version::{version_line, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;

/// Run a parsed CLI command.
pub async fn run_cli_command(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Invalid(reason) => {
            eprintln!("{}", USAGE);
            Err(eyre!(reason))
        }
        CliCommand::Send(args) => run_send(args).await,
    }
}
