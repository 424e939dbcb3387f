//! The single compiler/linker invocation that ends a run.

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

use crate::config::BuildConfig;
use crate::execute::{CommandLine, ExecError, OutputMode, ToolOutput, run_tool_with};
use crate::naming::ArtifactId;
use crate::staging::StagingTree;

/// Assemble the compiler command line.
///
/// Order: configured compiler flags, `-I <dir>` per include directory,
/// `-s <object>` per artifact, `-o <staging>/<output>`, then the sources.
pub fn compiler_command(
  config: &BuildConfig,
  staging: &StagingTree,
  compiler: impl Into<PathBuf>,
  artifacts: &[ArtifactId],
) -> CommandLine {
  let mut cmd = CommandLine::new(compiler).args(&config.tools.compiler_flags);

  for dir in &config.include_dirs {
    cmd = cmd.arg("-I").arg(dir);
  }
  for id in artifacts {
    cmd = cmd.arg("-s").arg(staging.object_path(id));
  }

  cmd
    .arg("-o")
    .arg(staging.output_path(&config.output))
    .args(&config.sources)
}

/// Run the compiler once. Any unsuccessful exit is returned as an error.
///
/// With [`OutputMode::Inherit`] diagnostics reach the terminal while the
/// compiler runs instead of after it exits.
pub async fn compile(cmd: &CommandLine, timeout: Duration, mode: OutputMode) -> Result<ToolOutput, ExecError> {
  let output = run_tool_with(cmd, timeout, mode).await?.check()?;
  info!(cmd = %cmd.program.display(), "compiler finished");
  Ok(output)
}
