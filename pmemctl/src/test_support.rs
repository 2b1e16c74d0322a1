//! Test-only helpers: capturable output sinks and pre-wired contexts.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::cli::OutputMode;
use crate::context::CommandContext;
use crate::platform::SystemSnapshot;

/// Output sink whose contents stay readable after the context takes
/// ownership of a clone.
#[derive(Clone, Default)]
pub struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let buf = self.0.lock().expect("sink lock");
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("sink lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Text-mode context over the sample snapshot, writing into `sink`.
pub fn context_with_sink(sink: &SharedSink) -> CommandContext {
    context_with_snapshot(SystemSnapshot::sample(), sink)
}

/// JSON-mode context over the sample snapshot, writing into `sink`.
pub fn json_context_with_sink(sink: &SharedSink) -> CommandContext {
    CommandContext::with_sink(
        SystemSnapshot::sample(),
        OutputMode::Json,
        Box::new(sink.clone()),
    )
}

/// Text-mode context over an explicit snapshot, writing into `sink`.
pub fn context_with_snapshot(snapshot: SystemSnapshot, sink: &SharedSink) -> CommandContext {
    CommandContext::with_sink(snapshot, OutputMode::Text, Box::new(sink.clone()))
}
