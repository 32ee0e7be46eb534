//! cli::commands
//!
//! Command handlers. Each handler owns one subcommand and returns
//! `anyhow::Result` so failures surface through the process exit status.

pub mod inspect;
pub mod publish;

use anyhow::Result;

use super::args::Command;
use crate::ui::output::Verbosity;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, verbosity: Verbosity) -> Result<()> {
    match command {
        Command::Publish(args) => publish::publish(&args, verbosity),
        Command::Inspect(args) => inspect::inspect(&args, verbosity),
    }
}
