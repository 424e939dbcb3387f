mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use apebuild_lib::consts::DEFAULT_CONFIG_FILE;

use crate::output::OutputFormat;

/// apebuild - package resources and link a multi-architecture executable
#[derive(Parser)]
#[command(name = "apebuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Path to the build configuration
  #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
  config: PathBuf,

  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Output format
  #[arg(short, long, global = true, value_enum, default_value_t)]
  output: OutputFormat,

  #[command(subcommand)]
  command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
  /// Reset the staging directory, package all resources and run the compiler (default)
  Build,

  /// Show what a build would package and run, without side effects
  Plan,

  /// Remove the staging directory
  Clean,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "info" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command.unwrap_or(Commands::Build) {
    Commands::Build => cmd::cmd_build(&cli.config, cli.output),
    Commands::Plan => cmd::cmd_plan(&cli.config, cli.output, cli.verbose),
    Commands::Clean => cmd::cmd_clean(&cli.config),
  }
}
