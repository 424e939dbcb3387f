//! Types for pipeline runs.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::execute::{CommandLine, ExecError, ToolOutput};
use crate::naming::ArtifactId;
use crate::package::{PackageError, PackageOutcome, PackagedArtifact, SkippedResource};
use crate::platform::Arch;
use crate::resource::ResolveError;
use crate::staging::StagingError;

/// Errors that end a build run.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Resolve(#[from] ResolveError),

  #[error(transparent)]
  Staging(#[from] StagingError),

  #[error(transparent)]
  Package(#[from] PackageError),

  /// A packager or compiler program could not be located.
  #[error(transparent)]
  Tool(ExecError),

  /// The compiler ran and failed, or could not be run.
  #[error("compiler failed: {0}")]
  Compile(ExecError),
}

/// Packaging results for one declared spec.
#[derive(Debug, Clone, Serialize)]
pub struct SpecReport {
  pub spec: String,
  pub outcomes: Vec<PackageOutcome>,
}

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
  pub staging_dir: PathBuf,
  pub output: PathBuf,
  pub specs: Vec<SpecReport>,
  pub compiler: ToolOutput,
}

impl BuildReport {
  pub fn artifacts(&self) -> impl Iterator<Item = &PackagedArtifact> {
    self.specs.iter().flat_map(|s| &s.outcomes).filter_map(|o| match o {
      PackageOutcome::Packaged(artifact) => Some(artifact),
      PackageOutcome::Skipped(_) => None,
    })
  }

  pub fn skipped(&self) -> impl Iterator<Item = &SkippedResource> {
    self.specs.iter().flat_map(|s| &s.outcomes).filter_map(|o| match o {
      PackageOutcome::Skipped(skipped) => Some(skipped),
      PackageOutcome::Packaged(_) => None,
    })
  }

  /// Identifiers handed to the compiler, in link order.
  pub fn artifact_ids(&self) -> Vec<ArtifactId> {
    self.artifacts().map(|a| a.id.clone()).collect()
  }
}

/// One file a spec expands to, with the file used for the secondary architecture.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedResource {
  pub source: PathBuf,
  pub secondary_source: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedSpec {
  pub spec: String,
  pub resources: Vec<PlannedResource>,
}

/// Where a configured tool resolves to, if anywhere.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedTool {
  pub program: String,
  pub path: Option<PathBuf>,
}

/// What a run would do, computed without side effects.
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
  pub staging_dir: PathBuf,
  pub secondary_arch: Arch,
  pub packager: PlannedTool,
  pub compiler: PlannedTool,
  pub specs: Vec<PlannedSpec>,
  /// Compiler invocation with `######` standing in for the allocated tokens.
  pub compiler_command: CommandLine,
}

impl Plan {
  pub fn resource_count(&self) -> usize {
    self.specs.iter().map(|s| s.resources.len()).sum()
  }
}
