//! Implementation of the `apebuild build` command.
//!
//! Runs the whole pipeline once: reset the staging directory, package every
//! declared resource for both architectures, then compile and link.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use apebuild_lib::execute::{ExecError, OutputMode};
use apebuild_lib::pipeline::{self, BuildError};

use crate::output::{OutputFormat, format_duration, print_info, print_json, print_stat, print_success, print_warning};

pub fn cmd_build(config_path: &Path, format: OutputFormat) -> Result<()> {
  let config = super::load_config(config_path)?;
  let started = Instant::now();

  // JSON keeps stdout for the report, so the compiler's output is captured into it.
  let compiler_output = if format.is_json() {
    OutputMode::Capture
  } else {
    OutputMode::Inherit
  };

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = match rt.block_on(pipeline::build(&config, compiler_output)) {
    Ok(report) => report,
    Err(err) => {
      if let BuildError::Compile(ExecError::Failed { stderr, .. }) = &err
        && !stderr.is_empty()
      {
        eprint!("{}", stderr);
      }
      return Err(err).context("Build failed");
    }
  };

  if format.is_json() {
    if !report.compiler.stderr.is_empty() {
      eprint!("{}", report.compiler.stderr);
    }
    return print_json(&report);
  }

  let skipped: Vec<_> = report.skipped().collect();
  for resource in &skipped {
    print_warning(&format!(
      "Skipped {} (packager exit code {:?})",
      resource.resource.display(),
      resource.code
    ));
  }

  print_success(&format!("Built {}", report.output.display()));
  print_stat("Artifacts", &report.artifact_ids().len().to_string());
  if !skipped.is_empty() {
    print_stat("Skipped", &skipped.len().to_string());
  }
  print_stat("Staging", &report.staging_dir.display().to_string());
  print_stat("Elapsed", &format_duration(started.elapsed()));

  if report.artifact_ids().is_empty() {
    print_info("No resources were embedded");
  }

  Ok(())
}
