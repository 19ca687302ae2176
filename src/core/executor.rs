use crate::core::{CommandExecutor, CommandSpec, PreparedCommand, ProcessOutput};
use crate::utils::error::{GenieError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Marker Genie writes to stderr on some failures while still exiting 0.
pub const ERROR_MARKER: &str = "ERROR";

/// Executes commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, command: &CommandSpec) -> Result<ProcessOutput> {
        tracing::debug!("Spawning: {}", command);

        let output = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| GenieError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Turns captured output into the caller's result.
///
/// A zero exit status is not enough: Genie sometimes reports a failure only
/// on stderr. Any stderr containing [`ERROR_MARKER`] therefore fails the
/// call. This is a plain substring match, so benign output that happens to
/// contain the word is also treated as a failure.
pub fn check_output(tool: &str, output: ProcessOutput) -> Result<String> {
    if !output.success {
        tracing::error!("[{}] Error: {}", tool, output.stderr);
        return Err(GenieError::ProcessFailed {
            tool: tool.to_string(),
            exit_code: output.exit_code,
            marker_only: false,
            stderr: output.stderr,
        });
    }

    if output.stderr.contains(ERROR_MARKER) {
        tracing::error!("[{}] Error (exit status 0): {}", tool, output.stderr);
        return Err(GenieError::ProcessFailed {
            tool: tool.to_string(),
            exit_code: None,
            marker_only: true,
            stderr: output.stderr,
        });
    }

    tracing::info!("[{}] Output: {}", tool, output.stdout.trim_end());
    Ok(output.stdout)
}

/// Creates the output directory, runs the command and applies
/// [`check_output`].
pub async fn run_prepared<E: CommandExecutor + ?Sized>(
    executor: &E,
    tool: &str,
    prepared: &PreparedCommand,
) -> Result<String> {
    if let Some(dir) = &prepared.output_dir {
        tokio::fs::create_dir_all(dir).await?;
    }

    tracing::info!("[{}] Running: {}", tool, prepared.command);
    let output = executor.execute(&prepared.command).await?;
    check_output(tool, output)
}
