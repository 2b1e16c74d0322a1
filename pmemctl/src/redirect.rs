//! Redirection of the context output channel into a dump destination.
//!
//! [`begin`] swaps the channel for a freshly truncated file and hands
//! back a guard; dropping the guard flushes the file and restores the
//! previous channel on every exit path.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use crate::context::CommandContext;

/// Active redirection of a context's output channel.
///
/// Restoration happens exactly once, when the guard drops. While the
/// guard lives, everything any handler writes through the context lands
/// in the destination file.
pub struct Redirection<'a> {
    ctx: &'a CommandContext,
    prior: Option<Box<dyn Write>>,
}

/// Open `destination` for writing (truncating existing content) and point
/// the context's output channel at it.
pub fn begin<'a>(ctx: &'a CommandContext, destination: &Path) -> Result<Redirection<'a>> {
    if destination.as_os_str().is_empty() {
        bail!("destination must be a non-empty path");
    }
    let file = File::create(destination)
        .with_context(|| format!("open destination {}", destination.display()))?;
    let prior = ctx.swap_sink(Box::new(file));
    debug!(destination = %destination.display(), "output channel redirected");
    Ok(Redirection {
        ctx,
        prior: Some(prior),
    })
}

impl std::fmt::Debug for Redirection<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Redirection")
            .field("active", &self.prior.is_some())
            .finish()
    }
}

impl Drop for Redirection<'_> {
    fn drop(&mut self) {
        let Some(prior) = self.prior.take() else {
            return;
        };
        let mut file = self.ctx.swap_sink(prior);
        if let Err(err) = file.flush() {
            warn!(err = %err, "flush dump destination failed");
        }
        debug!("output channel restored");
        // dropping `file` closes the destination
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputMode;
    use crate::platform::SystemSnapshot;
    use crate::test_support::SharedSink;
    use std::fs;

    fn context(sink: &SharedSink) -> CommandContext {
        CommandContext::with_sink(
            SystemSnapshot::sample(),
            OutputMode::Text,
            Box::new(sink.clone()),
        )
    }

    #[test]
    fn writes_land_in_destination_while_active() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dest = temp.path().join("out.txt");
        let sink = SharedSink::new();
        let ctx = context(&sink);

        let guard = begin(&ctx, &dest).expect("begin");
        writeln!(ctx.out(), "captured").expect("write");
        drop(guard);
        writeln!(ctx.out(), "restored").expect("write");

        assert_eq!(fs::read_to_string(&dest).expect("read"), "captured\n");
        assert_eq!(sink.contents(), "restored\n");
    }

    #[test]
    fn begin_truncates_existing_content() {
        let temp = tempfile::tempdir().expect("tempdir");
        let dest = temp.path().join("out.txt");
        fs::write(&dest, "stale content").expect("seed");
        let sink = SharedSink::new();
        let ctx = context(&sink);

        let guard = begin(&ctx, &dest).expect("begin");
        writeln!(ctx.out(), "fresh").expect("write");
        drop(guard);

        assert_eq!(fs::read_to_string(&dest).expect("read"), "fresh\n");
    }

    #[test]
    fn begin_rejects_empty_path() {
        let sink = SharedSink::new();
        let ctx = context(&sink);
        let err = begin(&ctx, Path::new("")).expect_err("empty path");
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn begin_failure_leaves_channel_untouched() {
        let temp = tempfile::tempdir().expect("tempdir");
        // a directory cannot be opened for writing
        let sink = SharedSink::new();
        let ctx = context(&sink);
        begin(&ctx, temp.path()).expect_err("directory destination");

        writeln!(ctx.out(), "still here").expect("write");
        assert_eq!(sink.contents(), "still here\n");
    }
}
