//! Persistent-memory module management CLI.
//!
//! The centerpiece is the support-dump engine ([`commands::support`]): it
//! replays a fixed catalog of the tool's own diagnostic commands with the
//! context output channel redirected into a single transcript file, then
//! reports one aggregate status. Every handler writes through
//! [`context::CommandContext`], which is what makes the redirection an
//! injected dependency instead of process-global state.

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod context;
pub mod exit_codes;
pub mod logging;
pub mod platform;
pub mod redirect;
pub mod status;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
