//! Running external tools.
//!
//! Tools inherit the orchestrator's environment and working directory, so
//! relative paths in the configuration mean the same thing to them.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::execute::types::{CommandLine, ExecError, OutputMode, ToolOutput};

/// Locate `program` on `PATH` (or check it directly when it contains a path separator).
pub fn find_tool(program: &str) -> Result<PathBuf, ExecError> {
  let path = which::which(program).map_err(|e| ExecError::ToolNotFound {
    program: program.to_string(),
    source: e,
  })?;
  debug!(program, path = %path.display(), "located tool");
  Ok(path)
}

/// Run `cmd` to completion and capture its output.
///
/// A non-zero exit is not an error here; callers decide what it means via
/// [`ToolOutput::check`]. A process still running after `timeout` is killed
/// and reported as [`ExecError::Timeout`].
pub async fn run_tool(cmd: &CommandLine, timeout: Duration) -> Result<ToolOutput, ExecError> {
  run_tool_with(cmd, timeout, OutputMode::Capture).await
}

/// Like [`run_tool`], with the tool's output routed according to `mode`.
pub async fn run_tool_with(cmd: &CommandLine, timeout: Duration, mode: OutputMode) -> Result<ToolOutput, ExecError> {
  info!(cmd = %cmd, "executing command");

  let program = cmd.program.display().to_string();
  let child = Command::new(&cmd.program)
    .args(&cmd.args)
    .stdin(Stdio::null())
    .stdout(mode.stdio())
    .stderr(mode.stdio())
    .kill_on_drop(true)
    .spawn()
    .map_err(|e| ExecError::Spawn {
      program: program.clone(),
      source: e,
    })?;

  // Dropping the wait future on timeout drops the child, which kills it.
  let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
    Ok(result) => result.map_err(|e| ExecError::Wait { program, source: e })?,
    Err(_) => {
      warn!(cmd = %cmd, timeout = %humantime::format_duration(timeout), "command timed out, killed");
      return Err(ExecError::Timeout {
        cmd: cmd.to_string(),
        timeout,
      });
    }
  };

  let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
  let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
  let code = output.status.code();

  if !stdout.is_empty() {
    debug!(stdout = %stdout.trim_end(), "command stdout");
  }
  if output.status.success() {
    if !stderr.is_empty() {
      debug!(stderr = %stderr.trim_end(), "command stderr");
    }
  } else {
    warn!(cmd = %cmd, code = ?code, stderr = %stderr.trim_end(), "command exited unsuccessfully");
  }

  Ok(ToolOutput {
    cmd: cmd.clone(),
    code,
    stdout,
    stderr,
  })
}
