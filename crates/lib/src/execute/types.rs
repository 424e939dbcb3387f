//! Types for external tool invocation.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors that can occur while running an external tool.
#[derive(Debug, Error)]
pub enum ExecError {
  /// The program could not be located.
  #[error("tool not found: {program}: {source}")]
  ToolNotFound { program: String, source: which::Error },

  /// The process could not be started.
  #[error("failed to spawn {program}: {source}")]
  Spawn { program: String, source: io::Error },

  /// Waiting on the process failed.
  #[error("failed to wait for {program}: {source}")]
  Wait { program: String, source: io::Error },

  /// The process exited unsuccessfully.
  #[error("command failed with exit code {code:?}: {cmd}")]
  Failed {
    cmd: String,
    code: Option<i32>,
    stderr: String,
  },

  /// The process outlived its time budget and was killed.
  #[error("command timed out after {}: {cmd}", humantime::format_duration(*timeout))]
  Timeout { cmd: String, timeout: Duration },
}

/// A fully assembled invocation: program plus ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
  pub program: PathBuf,
  pub args: Vec<OsString>,
}

impl CommandLine {
  pub fn new(program: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
    }
  }

  pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
    self.args.push(arg.as_ref().to_os_string());
    self
  }

  pub fn args<I, S>(mut self, args: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
  {
    self.args.extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
    self
  }

  /// Arguments as lossy strings, for display and assertions.
  pub fn argv(&self) -> Vec<String> {
    self.args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
  }

  /// Count of arguments equal to `flag`.
  pub fn flag_count(&self, flag: &str) -> usize {
    self.args.iter().filter(|a| *a == flag).count()
  }

  /// Values following each occurrence of `flag` (e.g. every path after `-s`).
  pub fn flag_values(&self, flag: &str) -> Vec<String> {
    self
      .args
      .windows(2)
      .filter(|pair| pair[0] == flag)
      .map(|pair| pair[1].to_string_lossy().into_owned())
      .collect()
  }
}

impl fmt::Display for CommandLine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program.display())?;
    for arg in &self.args {
      write!(f, " {}", arg.to_string_lossy())?;
    }
    Ok(())
  }
}

impl Serialize for CommandLine {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut argv = vec![self.program.to_string_lossy().into_owned()];
    argv.extend(self.argv());
    argv.serialize(serializer)
  }
}

/// Where a tool's stdout and stderr go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
  /// Collected into [`ToolOutput`].
  #[default]
  Capture,
  /// Streamed straight to our own stdout and stderr; [`ToolOutput`] only carries the exit code.
  Inherit,
}

impl OutputMode {
  pub(crate) fn stdio(self) -> std::process::Stdio {
    match self {
      Self::Capture => std::process::Stdio::piped(),
      Self::Inherit => std::process::Stdio::inherit(),
    }
  }
}

/// Exit status and captured output of a finished tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolOutput {
  pub cmd: CommandLine,
  /// `None` when the process was terminated by a signal.
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

impl ToolOutput {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }

  /// Turn an unsuccessful exit into [`ExecError::Failed`].
  pub fn check(self) -> Result<ToolOutput, ExecError> {
    if self.success() {
      return Ok(self);
    }
    Err(ExecError::Failed {
      cmd: self.cmd.to_string(),
      code: self.code,
      stderr: self.stderr,
    })
  }
}
