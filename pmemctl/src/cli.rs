//! Command-line surface, shared by the shell entry point and the dump
//! engine.
//!
//! The dump engine replays its catalog lines through [`parse_line`], i.e.
//! through the exact grammar the shell uses, so a transcript section is
//! always headed by a command a user could have typed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    name = "pmemctl",
    version,
    about = "Persistent-memory module management CLI"
)]
pub struct Cli {
    /// Render structured listings as text or JSON.
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    pub output: OutputMode,

    /// Read the platform snapshot from a TOML file instead of the built-in
    /// sample.
    #[arg(long, global = true, value_name = "FILE")]
    pub platform: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the tool version.
    Version,
    /// Report modules, resources, sensors, and events.
    #[command(subcommand)]
    Show(ShowCommand),
    /// Start a maintenance action.
    #[command(subcommand)]
    Start(StartCommand),
    /// Capture a snapshot of the system state for support purposes.
    Dump(DumpArgs),
}

#[derive(Debug, Subcommand)]
pub enum ShowCommand {
    /// Capacity allocation across provisioning modes.
    MemoryResources,
    /// Installed module inventory.
    Dimms {
        /// Print every attribute of each module.
        #[arg(short, long)]
        all: bool,
    },
    /// Platform capability summary.
    System {
        /// Print every capability attribute.
        #[arg(short, long)]
        all: bool,
    },
    /// Physical placement of installed modules.
    Topology {
        /// Print every placement attribute of each module.
        #[arg(short, long)]
        all: bool,
    },
    /// Current sensor readings.
    Sensors {
        /// Print every sensor type, not just health.
        #[arg(short, long)]
        all: bool,
    },
    /// Stored platform event log.
    Events,
}

#[derive(Debug, Subcommand)]
pub enum StartCommand {
    /// Run the diagnostic battery against installed modules.
    Diagnostic,
}

#[derive(Debug, Clone, Args)]
pub struct DumpArgs {
    /// File that receives the support transcript. Checked by the dump
    /// engine rather than marked required here, so a missing value is
    /// reported as an invalid argument instead of a usage error.
    #[arg(short, long, value_name = "PATH")]
    pub destination: Option<String>,

    /// Dump target; only the support transcript is defined.
    #[arg(value_parser = ["support"])]
    pub target: String,
}

/// Parse one literal command line through the full CLI grammar.
pub fn parse_line(line: &str) -> Result<Command> {
    let argv = std::iter::once("pmemctl").chain(line.split_whitespace());
    let cli = Cli::try_parse_from(argv).with_context(|| format!("parse command line {line:?}"))?;
    Ok(cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_show_with_flag() {
        let command = parse_line("show dimms --all").expect("line parses");
        assert!(matches!(
            command,
            Command::Show(ShowCommand::Dimms { all: true })
        ));
    }

    #[test]
    fn parses_start_diagnostic() {
        let command = parse_line("start diagnostic").expect("line parses");
        assert!(matches!(command, Command::Start(StartCommand::Diagnostic)));
    }

    #[test]
    fn rejects_unknown_verb() {
        let err = parse_line("frob --hard").expect_err("unknown verb");
        assert!(err.to_string().contains("parse command line"));
    }

    #[test]
    fn dump_destination_is_optional_at_parse_time() {
        let cli = Cli::parse_from(["pmemctl", "dump", "support"]);
        match cli.command {
            Command::Dump(args) => {
                assert!(args.destination.is_none());
                assert_eq!(args.target, "support");
            }
            other => panic!("expected dump, got {other:?}"),
        }
    }

    #[test]
    fn dump_rejects_unknown_target() {
        let result = Cli::try_parse_from(["pmemctl", "dump", "-d", "report.txt", "firmware"]);
        assert!(result.is_err());
    }

    #[test]
    fn output_mode_is_global() {
        let cli = Cli::parse_from(["pmemctl", "show", "dimms", "-o", "json"]);
        assert_eq!(cli.output, OutputMode::Json);
    }
}
