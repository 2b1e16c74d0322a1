//! Diagnostic battery over installed modules.
//!
//! Three tests run in a fixed order: Quick (module health), Config
//! (capacity provisioning), Security (lock-state consistency). Each test
//! prints its state and, when not Ok, one message per finding.

use std::io::Write;

use anyhow::Result;

use crate::context::CommandContext;
use crate::platform::{SystemSnapshot, fmt_gib};

#[derive(Debug, PartialEq, Eq)]
enum TestState {
    Ok,
    Warning,
    Failed,
}

impl TestState {
    fn label(&self) -> &'static str {
        match self {
            TestState::Ok => "Ok",
            TestState::Warning => "Warning",
            TestState::Failed => "Failed",
        }
    }
}

struct TestResult {
    name: &'static str,
    state: TestState,
    messages: Vec<String>,
}

pub fn diagnostic(ctx: &CommandContext) -> Result<()> {
    let snapshot = ctx.snapshot();
    let results = [
        quick_test(snapshot),
        config_test(snapshot),
        security_test(snapshot),
    ];

    let mut out = ctx.out();
    for result in results {
        writeln!(out, "TestName={}", result.name)?;
        writeln!(out, "State={}", result.state.label())?;
        for message in &result.messages {
            writeln!(out, "Message={message}")?;
        }
    }
    Ok(())
}

fn quick_test(snapshot: &SystemSnapshot) -> TestResult {
    let mut messages = Vec::new();
    for dimm in &snapshot.dimms {
        if !dimm.health.is_healthy() {
            messages.push(format!(
                "DimmID={} HealthState={}",
                dimm.dimm_id, dimm.health
            ));
        }
    }
    TestResult {
        name: "Quick",
        state: if messages.is_empty() {
            TestState::Ok
        } else {
            TestState::Failed
        },
        messages,
    }
}

fn config_test(snapshot: &SystemSnapshot) -> TestResult {
    let unconfigured = snapshot.memory_resources.unconfigured_gib;
    let mut messages = Vec::new();
    if unconfigured > 0.0 {
        messages.push(format!(
            "UnconfiguredCapacity={} is not mapped into any mode",
            fmt_gib(unconfigured)
        ));
    }
    TestResult {
        name: "Config",
        state: if messages.is_empty() {
            TestState::Ok
        } else {
            TestState::Warning
        },
        messages,
    }
}

fn security_test(snapshot: &SystemSnapshot) -> TestResult {
    let consistent = snapshot
        .dimms
        .windows(2)
        .all(|pair| pair[0].lock_state == pair[1].lock_state);
    TestResult {
        name: "Security",
        state: if consistent {
            TestState::Ok
        } else {
            TestState::Warning
        },
        messages: if consistent {
            Vec::new()
        } else {
            vec!["LockState differs across modules".to_string()]
        },
    }
}
