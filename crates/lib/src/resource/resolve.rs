use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};

use super::{ResolvedResource, ResourceSpec};
use crate::platform::Arch;

/// Errors raised while expanding resource specs.
#[derive(Debug, Error)]
pub enum ResolveError {
  #[error("wildcard directory does not exist: {}", dir.display())]
  MissingDirectory { dir: PathBuf },

  #[error("wildcard path is not a directory: {}", dir.display())]
  NotADirectory { dir: PathBuf },

  #[error("failed to list {}: {source}", dir.display())]
  ReadDir { dir: PathBuf, source: io::Error },
}

/// Expand a single spec.
///
/// A file spec yields itself without touching the filesystem. A wildcard
/// yields one resource per immediate entry of its directory, in listing
/// order. Nested directories are returned as entries, not descended into.
/// Architecture override directories (`.aarch64`, `.x86_64`) hold alternate
/// copies of sibling resources and are never yielded themselves.
pub fn resolve(spec: &ResourceSpec) -> Result<Vec<ResolvedResource>, ResolveError> {
  match spec {
    ResourceSpec::File(path) => Ok(vec![ResolvedResource::new(path.clone())]),
    ResourceSpec::Wildcard { dir } => list_dir(dir),
  }
}

/// Expand every spec in declaration order.
///
/// Fails on the first spec that cannot be expanded, before the caller has
/// packaged anything.
pub fn resolve_all(specs: &[ResourceSpec]) -> Result<Vec<(ResourceSpec, Vec<ResolvedResource>)>, ResolveError> {
  specs
    .iter()
    .map(|spec| {
      let resolved = resolve(spec)?;
      debug!(spec = %spec, count = resolved.len(), "resolved resource spec");
      Ok((spec.clone(), resolved))
    })
    .collect()
}

fn list_dir(dir: &Path) -> Result<Vec<ResolvedResource>, ResolveError> {
  let entries = fs::read_dir(dir).map_err(|e| match e.kind() {
    io::ErrorKind::NotFound => ResolveError::MissingDirectory { dir: dir.to_path_buf() },
    io::ErrorKind::NotADirectory => ResolveError::NotADirectory { dir: dir.to_path_buf() },
    _ => ResolveError::ReadDir {
      dir: dir.to_path_buf(),
      source: e,
    },
  })?;

  let mut resolved = Vec::new();
  for entry in entries {
    let entry = entry.map_err(|e| ResolveError::ReadDir {
      dir: dir.to_path_buf(),
      source: e,
    })?;
    let path = dir.join(entry.file_name());

    if is_override_dir(&entry) {
      trace!(path = %path.display(), "skipping architecture override directory");
      continue;
    }

    resolved.push(ResolvedResource::new(path));
  }

  Ok(resolved)
}

fn is_override_dir(entry: &fs::DirEntry) -> bool {
  let name = entry.file_name();
  let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
  is_dir && [Arch::X86_64, Arch::Aarch64].iter().any(|a| name == a.override_dir_name().as_str())
}
