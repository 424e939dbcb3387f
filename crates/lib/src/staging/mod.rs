//! The staging directory: a disposable tree recreated on every run.
//!
//! ```text
//! <staging>/
//!   <id>.zip.o            default architecture objects
//!   <output>              the linked executable
//!   .aarch64/
//!     <id>.zip.o          secondary architecture counterparts
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::naming::ArtifactId;
use crate::platform::Arch;

#[derive(Debug, Error)]
pub enum StagingError {
  #[error("path {} exists already, but is not a folder", path.display())]
  Conflict { path: PathBuf },

  #[error("failed to remove {}: {source}", path.display())]
  Remove { path: PathBuf, source: io::Error },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: io::Error },
}

/// Layout of the staging directory for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingTree {
  root: PathBuf,
  arch: Arch,
}

impl StagingTree {
  pub fn new(root: impl Into<PathBuf>, arch: Arch) -> Self {
    Self { root: root.into(), arch }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  pub fn arch(&self) -> Arch {
    self.arch
  }

  pub fn override_dir(&self) -> PathBuf {
    self.root.join(self.arch.override_dir_name())
  }

  pub fn object_path(&self, id: &ArtifactId) -> PathBuf {
    self.root.join(id.object_file_name())
  }

  pub fn override_object_path(&self, id: &ArtifactId) -> PathBuf {
    self.override_dir().join(id.object_file_name())
  }

  pub fn output_path(&self, output: &str) -> PathBuf {
    self.root.join(output)
  }

  /// Delete both objects of `id`, whichever exist.
  pub fn discard_objects(&self, id: &ArtifactId) -> Result<(), StagingError> {
    for path in [self.object_path(id), self.override_object_path(id)] {
      match fs::remove_file(&path) {
        Ok(()) => debug!(path = %path.display(), "discarded object"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(StagingError::Remove { path, source: e }),
      }
    }
    Ok(())
  }

  /// Destroy and recreate the staging root. See [`reset`].
  pub fn reset(&self) -> Result<(), StagingError> {
    reset(&self.root)
  }

  /// Make sure the override subtree exists. See [`ensure_override_subtree`].
  pub fn ensure_override_subtree(&self) -> Result<PathBuf, StagingError> {
    ensure_override_subtree(&self.root, self.arch)
  }
}

/// Remove `staging` recursively if present, then create it empty.
pub fn reset(staging: &Path) -> Result<(), StagingError> {
  remove(staging)?;
  fs::create_dir_all(staging).map_err(|e| StagingError::CreateDir {
    path: staging.to_path_buf(),
    source: e,
  })?;
  info!(path = %staging.display(), "staging directory reset");
  Ok(())
}

/// Remove `staging` if it exists. Returns whether anything was removed.
pub fn remove(staging: &Path) -> Result<bool, StagingError> {
  let result = match fs::symlink_metadata(staging) {
    Ok(meta) if meta.is_dir() => fs::remove_dir_all(staging),
    Ok(_) => fs::remove_file(staging),
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
    Err(e) => Err(e),
  };

  result.map_err(|e| StagingError::Remove {
    path: staging.to_path_buf(),
    source: e,
  })?;
  debug!(path = %staging.display(), "removed previous staging tree");
  Ok(true)
}

/// Create `<staging>/.<arch>` if absent.
///
/// Anything other than a directory at that path is a conflict the build
/// cannot safely work around.
pub fn ensure_override_subtree(staging: &Path, arch: Arch) -> Result<PathBuf, StagingError> {
  let dir = staging.join(arch.override_dir_name());

  match fs::metadata(&dir) {
    Ok(meta) if meta.is_dir() => Ok(dir),
    Ok(_) => Err(StagingError::Conflict { path: dir }),
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      fs::create_dir(&dir).map_err(|e| StagingError::CreateDir {
        path: dir.clone(),
        source: e,
      })?;
      debug!(path = %dir.display(), "created override subtree");
      Ok(dir)
    }
    Err(e) => Err(StagingError::CreateDir { path: dir, source: e }),
  }
}
