//! Declarative resource specs and their expansion into concrete files.
//!
//! A spec is written as a plain path (`resources/icon.png`) or as a
//! directory wildcard (`libs/*`). Expansion happens once per run, before
//! any packaging, so a missing directory aborts the build early.

mod resolve;
mod select;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use resolve::{ResolveError, resolve, resolve_all};
pub use select::select_secondary;

/// Marker that turns the last path component into "every entry of this directory".
pub const WILDCARD: &str = "*";

/// A resource as declared in the configuration, before expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceSpec {
  /// A single file, used as-is.
  File(PathBuf),
  /// Every immediate entry of `dir`.
  Wildcard { dir: PathBuf },
}

impl ResourceSpec {
  pub fn parse(spec: &str) -> Self {
    let path = Path::new(spec);
    match path.file_name() {
      Some(name) if name == WILDCARD => {
        let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        Self::Wildcard { dir: dir.to_path_buf() }
      }
      _ => Self::File(path.to_path_buf()),
    }
  }
}

impl From<String> for ResourceSpec {
  fn from(value: String) -> Self {
    Self::parse(&value)
  }
}

impl From<ResourceSpec> for String {
  fn from(value: ResourceSpec) -> Self {
    value.to_string()
  }
}

impl fmt::Display for ResourceSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::File(path) => write!(f, "{}", path.display()),
      Self::Wildcard { dir } => write!(f, "{}", dir.join(WILDCARD).display()),
    }
  }
}

/// A concrete file produced by expanding a [`ResourceSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedResource {
  pub path: PathBuf,
}

impl ResolvedResource {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// Final path component, used to name the packaged artifact.
  pub fn base_name(&self) -> String {
    self
      .path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default()
  }

  /// Directory containing the resource (`.` for bare file names).
  pub fn parent_dir(&self) -> &Path {
    self
      .path
      .parent()
      .filter(|p| !p.as_os_str().is_empty())
      .unwrap_or(Path::new("."))
  }
}
