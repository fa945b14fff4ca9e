use std::io::ErrorKind;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Run an external program to completion and return its captured output
///
/// A missing binary maps to `CommandMissing`, a non-zero exit to
/// `CommandFailed`. With a timeout, the child is killed once it elapses.
pub async fn run_command(
    program: &str,
    args: &[String],
    timeout: Option<Duration>,
) -> PipelineResult<Output> {
    let rendered = format!("{} {}", program, args.join(" "));
    debug!(command = %rendered, "Spawning subprocess");

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = command.spawn().map_err(|e| match e.kind() {
        ErrorKind::NotFound => PipelineError::CommandMissing {
            command: program.to_string(),
        },
        _ => PipelineError::Io(e),
    })?;

    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(output) => output?,
            // Dropping the future drops the child, which kills it
            Err(_) => {
                return Err(PipelineError::CommandTimedOut {
                    command: rendered,
                    timeout_secs: limit.as_secs(),
                });
            }
        },
        None => child.wait_with_output().await?,
    };

    validate_command_output(rendered, output)
}

fn validate_command_output(rendered: String, output: Output) -> PipelineResult<Output> {
    if output.status.success() {
        return Ok(output);
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(PipelineError::from_command_failure(
        rendered,
        output.status.code().unwrap_or(-1),
        &stderr,
    ))
}
