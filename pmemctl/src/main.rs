use anyhow::Result;
use clap::Parser;

use pmemctl::cli::{Cli, Command};
use pmemctl::commands::{self, RegistryDispatcher, support};
use pmemctl::context::CommandContext;
use pmemctl::platform::SystemSnapshot;
use pmemctl::{exit_codes, logging};

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let snapshot = SystemSnapshot::resolve(cli.platform.as_deref())?;
    let ctx = CommandContext::new(snapshot, cli.output);

    match &cli.command {
        // handled here rather than through dispatch so the dump status
        // maps onto the process exit code
        Command::Dump(args) => {
            let result = support::run_dump(&ctx, &RegistryDispatcher, args.destination.as_deref());
            support::report(&ctx, &result)?;
            Ok(result.status.exit_code())
        }
        command => {
            commands::dispatch(&ctx, command)?;
            Ok(exit_codes::OK)
        }
    }
}
