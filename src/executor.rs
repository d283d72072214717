//! Execution of the caller-supplied work command.

use std::process::Command;

use anyhow::{bail, Context, Result};
use tracing::info;

/// Runs the command given after `--` on the invocation line. The child
/// inherits stdio, so its output interleaves with the tool's own logging.
#[derive(Debug, Clone)]
pub struct CommandRunner {
    command: Vec<String>,
}

impl CommandRunner {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    /// Runs the command to completion. An empty command is a no-op, for
    /// invocations whose only purpose is the notification itself. Launch
    /// failures and non-zero exits both surface as errors.
    pub fn run(&self) -> Result<()> {
        let Some((program, args)) = self.command.split_first() else {
            return Ok(());
        };

        info!(command = %self.command.join(" "), "running work command");
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to launch `{}`", program))?;

        if !status.success() {
            bail!("`{}` exited with {}", program, status);
        }
        Ok(())
    }
}
