//! Implementation of the `apebuild plan` command.
//!
//! Resolves the configured resources and prints what a build would package
//! and run. Nothing is written and no tool is executed.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use apebuild_lib::pipeline;
use apebuild_lib::platform::Arch;

use crate::output::{OutputFormat, print_json, print_stat, print_warning, symbols};

pub fn cmd_plan(config_path: &Path, format: OutputFormat, verbose: bool) -> Result<()> {
  let config = super::load_config(config_path)?;
  let plan = pipeline::plan(&config).context("Failed to resolve resources")?;

  if format.is_json() {
    return print_json(&plan);
  }

  println!("Plan: {}", config_path.display());
  print_stat("Staging", &plan.staging_dir.display().to_string());
  print_stat("Architectures", &format!("{} + {}", Arch::PRIMARY, plan.secondary_arch));
  if let Some(host) = Arch::current() {
    print_stat("Host", host.as_str());
  }
  print_stat("Resources", &plan.resource_count().to_string());

  for tool in [&plan.packager, &plan.compiler] {
    match &tool.path {
      Some(path) => print_stat(&tool.program, &path.display().to_string()),
      None => print_warning(&format!("{} not found on PATH", tool.program)),
    }
  }

  println!();
  for spec in &plan.specs {
    println!("{}", spec.spec.if_supports_color(Stream::Stdout, |s| s.bold()));
    if spec.resources.is_empty() {
      println!("  {} (empty)", symbols::INFO);
    }
    for resource in &spec.resources {
      println!(
        "  {} {}",
        symbols::PLUS.if_supports_color(Stream::Stdout, |s| s.green()),
        resource.source.display()
      );
      if verbose || resource.secondary_source != resource.source {
        println!(
          "      {} {} {}",
          symbols::ARROW,
          plan.secondary_arch,
          resource.secondary_source.display()
        );
      }
    }
  }

  println!();
  println!("Compiler:");
  println!("  {}", plan.compiler_command);

  Ok(())
}
