use std::path::PathBuf;

use tracing::debug;

use super::ResolvedResource;
use crate::platform::Arch;

/// Pick the file to package for `arch`.
///
/// Resources are architecture-agnostic unless a sibling override directory
/// (`<dir>/.aarch64/`) holds a file with the same name, in which case that
/// file is used instead.
pub fn select_secondary(resource: &ResolvedResource, arch: Arch) -> PathBuf {
  let override_dir = resource.parent_dir().join(arch.override_dir_name());
  let candidate = override_dir.join(resource.base_name());

  if override_dir.is_dir() && candidate.is_file() {
    debug!(resource = %resource.path.display(), replacement = %candidate.display(), %arch, "using architecture override");
    return candidate;
  }

  resource.path.clone()
}
