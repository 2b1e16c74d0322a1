//! End-to-end properties of the support-dump engine.
//!
//! Covers transcript ordering, overwrite semantics, channel restoration,
//! and the continue-on-failure contract, all at the library level with an
//! observable default channel.

use std::cell::Cell;
use std::fs;
use std::io::Write;

use anyhow::{Result, bail};
use pmemctl::catalog::SUPPORT_CATALOG;
use pmemctl::cli::Command;
use pmemctl::commands::support::run_dump;
use pmemctl::commands::{Dispatcher, RegistryDispatcher};
use pmemctl::context::CommandContext;
use pmemctl::status::CmdStatus;
use pmemctl::test_support::{SharedSink, context_with_sink};

fn header(line: &str) -> String {
    format!("/*\n* {line}\n*/\n")
}

#[test]
fn transcript_sections_follow_catalog_order() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dest = temp.path().join("report.txt");
    let sink = SharedSink::new();
    let ctx = context_with_sink(&sink);

    let result = run_dump(&ctx, &RegistryDispatcher, dest.to_str());
    assert_eq!(result.status, CmdStatus::Success);
    assert!(result.message.contains("report.txt"));

    let transcript = fs::read_to_string(&dest).expect("read transcript");
    let mut cursor = 0;
    for line in SUPPORT_CATALOG {
        let section = header(line);
        let offset = transcript[cursor..]
            .find(&section)
            .unwrap_or_else(|| panic!("section for {line:?} missing or out of order"));
        cursor += offset + section.len();
    }
    // nothing from the dump leaked onto the default channel
    assert!(sink.contents().is_empty());
}

#[test]
fn rerun_overwrites_previous_transcript() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dest = temp.path().join("report.txt");
    let sink = SharedSink::new();
    let ctx = context_with_sink(&sink);

    run_dump(&ctx, &RegistryDispatcher, dest.to_str());
    run_dump(&ctx, &RegistryDispatcher, dest.to_str());

    let transcript = fs::read_to_string(&dest).expect("read transcript");
    assert_eq!(
        transcript.matches(&header("version")).count(),
        1,
        "second run must truncate, not append"
    );
}

#[test]
fn default_channel_is_restored_after_the_dump() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dest = temp.path().join("report.txt");
    let sink = SharedSink::new();
    let ctx = context_with_sink(&sink);

    run_dump(&ctx, &RegistryDispatcher, dest.to_str());
    writeln!(ctx.out(), "probe after dump").expect("probe write");

    assert_eq!(sink.contents(), "probe after dump\n");
    let transcript = fs::read_to_string(&dest).expect("read transcript");
    assert!(!transcript.contains("probe after dump"));
}

#[test]
fn default_channel_is_restored_after_a_setup_failure() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dest = temp.path().join("missing-dir").join("report.txt");
    let sink = SharedSink::new();
    let ctx = context_with_sink(&sink);

    let result = run_dump(&ctx, &RegistryDispatcher, dest.to_str());
    assert_eq!(result.status, CmdStatus::ResourceError);

    writeln!(ctx.out(), "probe after failure").expect("probe write");
    assert_eq!(sink.contents(), "probe after failure\n");
}

/// Dispatcher that fails exactly one step and counts invocations.
struct FailingStep {
    fail_index: usize,
    calls: Cell<usize>,
}

impl Dispatcher for FailingStep {
    fn dispatch(&self, ctx: &CommandContext, _command: &Command) -> Result<()> {
        let index = self.calls.get();
        self.calls.set(index + 1);
        writeln!(ctx.out(), "output of step {index}")?;
        if index == self.fail_index {
            bail!("step {index} is broken");
        }
        Ok(())
    }
}

#[test]
fn entries_after_a_failing_step_still_execute() {
    let temp = tempfile::tempdir().expect("tempdir");
    let dest = temp.path().join("report.txt");
    let sink = SharedSink::new();
    let ctx = context_with_sink(&sink);
    let dispatcher = FailingStep {
        fail_index: 2,
        calls: Cell::new(0),
    };

    let result = run_dump(&ctx, &dispatcher, dest.to_str());
    assert_eq!(dispatcher.calls.get(), SUPPORT_CATALOG.len());
    assert_eq!(result.status, CmdStatus::Success);

    let transcript = fs::read_to_string(&dest).expect("read transcript");
    for line in SUPPORT_CATALOG {
        assert!(transcript.contains(&header(line)));
    }
    let last_index = SUPPORT_CATALOG.len() - 1;
    assert!(transcript.contains(&format!("output of step {last_index}")));
}

#[test]
fn empty_destination_creates_no_file() {
    let temp = tempfile::tempdir().expect("tempdir");
    let sink = SharedSink::new();
    let ctx = context_with_sink(&sink);

    let result = run_dump(&ctx, &RegistryDispatcher, Some(""));
    assert_eq!(result.status, CmdStatus::InvalidArgument);
    assert_eq!(
        fs::read_dir(temp.path()).expect("read dir").count(),
        0,
        "no file may be created for an empty destination"
    );
}
