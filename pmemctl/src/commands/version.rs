//! Tool version report.

use std::io::Write;

use anyhow::Result;

use crate::context::CommandContext;

pub fn run(ctx: &CommandContext) -> Result<()> {
    writeln!(
        ctx.out(),
        "pmemctl persistent-memory command line interface"
    )?;
    writeln!(ctx.out(), "Version {}", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{SharedSink, context_with_sink};

    #[test]
    fn prints_name_and_version() {
        let sink = SharedSink::new();
        let ctx = context_with_sink(&sink);
        run(&ctx).expect("version");
        let output = sink.contents();
        assert!(output.contains("pmemctl"));
        assert!(output.contains(env!("CARGO_PKG_VERSION")));
    }
}
