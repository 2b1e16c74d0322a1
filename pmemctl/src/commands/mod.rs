//! Command handlers and the dispatch seam between parsed commands and
//! their implementations.
//!
//! The [`Dispatcher`] trait decouples the dump engine from the real
//! handlers. Tests use scripted dispatchers that fail chosen steps
//! without touching any handler.

pub mod show;
pub mod start;
pub mod support;
pub mod version;

use anyhow::{Result, anyhow};

use crate::cli::{Command, ShowCommand, StartCommand};
use crate::context::CommandContext;

/// Abstraction over command execution backends.
pub trait Dispatcher {
    /// Execute one parsed command, writing its output through the
    /// context's output channel.
    fn dispatch(&self, ctx: &CommandContext, command: &Command) -> Result<()>;
}

/// Production dispatcher routing parsed commands to their handlers.
pub struct RegistryDispatcher;

impl Dispatcher for RegistryDispatcher {
    fn dispatch(&self, ctx: &CommandContext, command: &Command) -> Result<()> {
        dispatch(ctx, command)
    }
}

/// Route a parsed command to its handler.
pub fn dispatch(ctx: &CommandContext, command: &Command) -> Result<()> {
    match command {
        Command::Version => version::run(ctx),
        Command::Show(show) => match show {
            ShowCommand::MemoryResources => show::memory_resources(ctx),
            ShowCommand::Dimms { all } => show::dimms(ctx, *all),
            ShowCommand::System { all } => show::system(ctx, *all),
            ShowCommand::Topology { all } => show::topology(ctx, *all),
            ShowCommand::Sensors { all } => show::sensors(ctx, *all),
            ShowCommand::Events => show::events(ctx),
        },
        Command::Start(StartCommand::Diagnostic) => start::diagnostic(ctx),
        Command::Dump(args) => {
            let result = support::run_dump(ctx, &RegistryDispatcher, args.destination.as_deref());
            support::report(ctx, &result)?;
            if result.status.is_success() {
                Ok(())
            } else {
                Err(anyhow!("support dump failed: {}", result.message))
            }
        }
    }
}
