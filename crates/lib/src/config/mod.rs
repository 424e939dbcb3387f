//! Build configuration.
//!
//! Everything a run needs is read once from `apebuild.toml` and then passed
//! by reference to each stage; nothing reads ambient state afterwards.
//!
//! ```toml
//! staging_dir = "build_dir"
//! output = "sdltest.exe"
//! include_dirs = ["include", "/usr/include/SDL2"]
//! sources = ["sources/application.cpp"]
//! resources = ["libs/*", "resources/icon.ico"]
//!
//! [tools]
//! packager = "zipobj"
//! compiler = "cosmoc++"
//! compiler_flags = ["-std=c++20"]
//! timeout = "10m"
//!
//! [packaging]
//! secondary_arch = "aarch64"
//! on_failure = "abort"
//! ```

mod duration;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{COMPILER_ENV, DEFAULT_COMPILER, DEFAULT_PACKAGER, DEFAULT_STAGING_DIR, PACKAGER_ENV};
use crate::platform::Arch;
use crate::resource::ResourceSpec;
use crate::staging::StagingTree;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to parse config {}: {source}", path.display())]
  Parse { path: PathBuf, source: toml::de::Error },

  #[error("invalid config: {0}")]
  Invalid(String),
}

/// What to do when the packaging tool exits unsuccessfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
  /// Stop the run with an error.
  #[default]
  Abort,
  /// Leave the resource out of the link and keep going.
  Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
  #[serde(default = "default_staging_dir")]
  pub staging_dir: PathBuf,

  /// File name of the linked executable, placed inside `staging_dir`.
  pub output: String,

  #[serde(default)]
  pub include_dirs: Vec<PathBuf>,

  pub sources: Vec<PathBuf>,

  #[serde(default)]
  pub resources: Vec<ResourceSpec>,

  #[serde(default)]
  pub tools: ToolConfig,

  #[serde(default)]
  pub packaging: PackagingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
  pub packager: String,
  pub compiler: String,
  /// Passed to the compiler ahead of every generated flag.
  pub compiler_flags: Vec<String>,
  /// Upper bound on any single tool invocation.
  #[serde(with = "duration")]
  pub timeout: Duration,
}

impl Default for ToolConfig {
  fn default() -> Self {
    Self {
      packager: DEFAULT_PACKAGER.to_string(),
      compiler: DEFAULT_COMPILER.to_string(),
      compiler_flags: vec!["-std=c++20".to_string()],
      timeout: Duration::from_secs(600),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackagingConfig {
  /// Architecture of the override objects.
  pub secondary_arch: Arch,
  pub on_failure: FailurePolicy,
}

impl Default for PackagingConfig {
  fn default() -> Self {
    Self {
      secondary_arch: Arch::Aarch64,
      on_failure: FailurePolicy::Abort,
    }
  }
}

fn default_staging_dir() -> PathBuf {
  PathBuf::from(DEFAULT_STAGING_DIR)
}

impl BuildConfig {
  /// Read, parse and validate `path`, then apply environment overrides.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
      path: path.to_path_buf(),
      source: e,
    })?;
    let mut config: BuildConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
      path: path.to_path_buf(),
      source: e,
    })?;
    config.apply_env_overrides();
    config.validate()?;
    debug!(path = %path.display(), resources = config.resources.len(), sources = config.sources.len(), "loaded config");
    Ok(config)
  }

  /// Replace tool programs from `APEBUILD_PACKAGER` / `APEBUILD_COMPILER` when set.
  pub fn apply_env_overrides(&mut self) {
    if let Ok(packager) = std::env::var(PACKAGER_ENV)
      && !packager.is_empty()
    {
      debug!(packager = %packager, "packager overridden from environment");
      self.tools.packager = packager;
    }
    if let Ok(compiler) = std::env::var(COMPILER_ENV)
      && !compiler.is_empty()
    {
      debug!(compiler = %compiler, "compiler overridden from environment");
      self.tools.compiler = compiler;
    }
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    let output = Path::new(&self.output);
    if self.output.is_empty() || output.file_name() != Some(output.as_os_str()) {
      return Err(ConfigError::Invalid(format!(
        "output must be a plain file name, got {:?}",
        self.output
      )));
    }
    if self.sources.is_empty() {
      return Err(ConfigError::Invalid("at least one source file is required".to_string()));
    }
    if self.staging_dir.as_os_str().is_empty() {
      return Err(ConfigError::Invalid("staging_dir must not be empty".to_string()));
    }
    if self.packaging.secondary_arch == Arch::PRIMARY {
      return Err(ConfigError::Invalid(format!(
        "secondary_arch must differ from the primary architecture ({})",
        Arch::PRIMARY
      )));
    }
    if self.tools.timeout.is_zero() {
      return Err(ConfigError::Invalid("tools.timeout must be greater than zero".to_string()));
    }
    Ok(())
  }

  pub fn staging(&self) -> StagingTree {
    StagingTree::new(&self.staging_dir, self.packaging.secondary_arch)
  }
}
