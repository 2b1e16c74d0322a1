//! Shared state handed to every command handler.
//!
//! Handlers never write to `stdout` directly; all product output goes
//! through the context's output channel. That indirection is what lets
//! the dump engine point the channel at a destination file for the span
//! of a support dump and restore it afterwards.

use std::cell::{RefCell, RefMut};
use std::io::{self, Write};

use crate::cli::OutputMode;
use crate::platform::SystemSnapshot;

pub struct CommandContext {
    snapshot: SystemSnapshot,
    output: OutputMode,
    sink: RefCell<Box<dyn Write>>,
}

impl CommandContext {
    /// Context writing to the process stdout.
    pub fn new(snapshot: SystemSnapshot, output: OutputMode) -> Self {
        Self::with_sink(snapshot, output, Box::new(io::stdout()))
    }

    /// Context writing to an injected sink; used by tests to observe the
    /// default channel.
    pub fn with_sink(snapshot: SystemSnapshot, output: OutputMode, sink: Box<dyn Write>) -> Self {
        Self {
            snapshot,
            output,
            sink: RefCell::new(sink),
        }
    }

    pub fn snapshot(&self) -> &SystemSnapshot {
        &self.snapshot
    }

    pub fn output(&self) -> OutputMode {
        self.output
    }

    /// Borrow the current output channel.
    ///
    /// The borrow must not be held across a nested dispatch; handlers
    /// take it per write or per rendering block.
    pub fn out(&self) -> RefMut<'_, Box<dyn Write>> {
        self.sink.borrow_mut()
    }

    /// Swap the output channel, returning the previous one.
    pub(crate) fn swap_sink(&self, sink: Box<dyn Write>) -> Box<dyn Write> {
        self.sink.replace(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SharedSink;
    use std::io::Write as _;

    #[test]
    fn writes_reach_injected_sink() {
        let sink = SharedSink::new();
        let ctx = CommandContext::with_sink(
            SystemSnapshot::sample(),
            OutputMode::Text,
            Box::new(sink.clone()),
        );

        writeln!(ctx.out(), "probe").expect("write");
        assert_eq!(sink.contents(), "probe\n");
    }

    #[test]
    fn swap_returns_previous_sink() {
        let first = SharedSink::new();
        let second = SharedSink::new();
        let ctx = CommandContext::with_sink(
            SystemSnapshot::sample(),
            OutputMode::Text,
            Box::new(first.clone()),
        );

        let mut prior = ctx.swap_sink(Box::new(second.clone()));
        writeln!(prior, "old channel").expect("write prior");
        writeln!(ctx.out(), "new channel").expect("write new");

        assert_eq!(first.contents(), "old channel\n");
        assert_eq!(second.contents(), "new channel\n");
    }
}
