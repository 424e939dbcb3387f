//! Resource packaging.
//!
//! Each resolved resource is packaged twice with the same identifier: once
//! for the primary architecture into the staging root and once for the
//! secondary architecture into the override subtree. The two objects are
//! interchangeable at link time.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::FailurePolicy;
use crate::execute::{CommandLine, ExecError, ToolOutput, run_tool};
use crate::naming::{ArtifactId, NameAllocator, NamingError};
use crate::platform::Arch;
use crate::resource::{ResolvedResource, select_secondary};
use crate::staging::{StagingError, StagingTree};

#[derive(Debug, Error)]
pub enum PackageError {
  #[error(transparent)]
  Staging(#[from] StagingError),

  #[error(transparent)]
  Naming(#[from] NamingError),

  #[error("packaging failed: {0}")]
  Exec(#[from] ExecError),
}

/// The primary architecture object of one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackagedArtifact {
  pub id: ArtifactId,
  pub source: PathBuf,
  pub object: PathBuf,
  pub secondary: SecondaryArtifact,
}

/// The override-subtree counterpart of a [`PackagedArtifact`], same identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryArtifact {
  pub arch: Arch,
  pub source: PathBuf,
  pub object: PathBuf,
}

/// A resource left out of the link because its packaging failed under
/// [`FailurePolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedResource {
  pub resource: PathBuf,
  pub cmd: String,
  pub code: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum PackageOutcome {
  Packaged(PackagedArtifact),
  Skipped(SkippedResource),
}

/// Drives the packaging tool for one run.
pub struct Packager<'a> {
  staging: &'a StagingTree,
  program: PathBuf,
  timeout: Duration,
  policy: FailurePolicy,
  names: NameAllocator,
}

impl<'a> Packager<'a> {
  pub fn new(staging: &'a StagingTree, program: impl Into<PathBuf>, names: NameAllocator) -> Self {
    Self {
      staging,
      program: program.into(),
      timeout: Duration::from_secs(600),
      policy: FailurePolicy::default(),
      names,
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
    self.policy = policy;
    self
  }

  /// Command for the primary architecture object.
  pub fn primary_command(&self, id: &ArtifactId, source: &Path) -> CommandLine {
    CommandLine::new(&self.program)
      .arg("-o")
      .arg(self.staging.object_path(id))
      .arg(source)
  }

  /// Command for the secondary architecture object.
  pub fn secondary_command(&self, id: &ArtifactId, source: &Path) -> CommandLine {
    CommandLine::new(&self.program)
      .arg("-a")
      .arg(self.staging.arch().as_str())
      .arg("-o")
      .arg(self.staging.override_object_path(id))
      .arg(source)
  }

  /// Package `resource` for both architectures.
  pub async fn package(&mut self, resource: &ResolvedResource) -> Result<PackageOutcome, PackageError> {
    self.staging.ensure_override_subtree()?;

    let id = self.names.allocate(&resource.base_name())?;

    let primary = run_tool(&self.primary_command(&id, &resource.path), self.timeout).await?;
    // A skipped resource leaves nothing behind for either architecture.
    if let Some(skipped) = self.settle(resource, primary)? {
      self.staging.discard_objects(&id)?;
      return Ok(PackageOutcome::Skipped(skipped));
    }

    let secondary_source = select_secondary(resource, self.staging.arch());
    let secondary = run_tool(&self.secondary_command(&id, &secondary_source), self.timeout).await?;
    if let Some(skipped) = self.settle(resource, secondary)? {
      self.staging.discard_objects(&id)?;
      return Ok(PackageOutcome::Skipped(skipped));
    }

    info!(id = %id, resource = %resource.path.display(), "packaged resource");

    Ok(PackageOutcome::Packaged(PackagedArtifact {
      object: self.staging.object_path(&id),
      source: resource.path.clone(),
      secondary: SecondaryArtifact {
        arch: self.staging.arch(),
        source: secondary_source,
        object: self.staging.override_object_path(&id),
      },
      id,
    }))
  }

  /// Apply the failure policy to a finished invocation.
  ///
  /// Returns `Some` when the resource should be skipped.
  fn settle(&self, resource: &ResolvedResource, output: ToolOutput) -> Result<Option<SkippedResource>, ExecError> {
    if output.success() {
      return Ok(None);
    }

    match self.policy {
      FailurePolicy::Abort => output.check().map(|_| None),
      FailurePolicy::Skip => {
        warn!(
          resource = %resource.path.display(),
          cmd = %output.cmd,
          code = ?output.code,
          "packaging failed, skipping resource"
        );
        Ok(Some(SkippedResource {
          resource: resource.path.clone(),
          cmd: output.cmd.to_string(),
          code: output.code,
        }))
      }
    }
  }
}
