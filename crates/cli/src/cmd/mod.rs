mod build;
mod clean;
mod plan;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use apebuild_lib::config::BuildConfig;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use plan::cmd_plan;

fn load_config(path: &Path) -> Result<BuildConfig> {
  debug!(path = %path.display(), "loading config");
  BuildConfig::load(path).with_context(|| format!("Failed to load config: {}", path.display()))
}
