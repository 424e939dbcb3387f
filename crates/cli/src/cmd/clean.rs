//! Implementation of the `apebuild clean` command.

use std::path::Path;

use anyhow::{Context, Result};

use apebuild_lib::pipeline;

use crate::output::{print_info, print_success};

pub fn cmd_clean(config_path: &Path) -> Result<()> {
  let config = super::load_config(config_path)?;

  if pipeline::clean(&config).context("Failed to remove staging directory")? {
    print_success(&format!("Removed {}", config.staging_dir.display()));
  } else {
    print_info(&format!("Nothing to clean at {}", config.staging_dir.display()));
  }

  Ok(())
}
