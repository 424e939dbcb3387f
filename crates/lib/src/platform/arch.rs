use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// CPU architectures an artifact can be packaged for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Arch {
  X86_64,
  Aarch64,
}

impl Arch {
  /// Architecture of the objects written to the top of the staging directory
  pub const PRIMARY: Arch = Arch::X86_64;

  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86_64" => Some(Self::X86_64),
      "aarch64" => Some(Self::Aarch64),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::Aarch64 => "aarch64",
    }
  }

  /// Name of the hidden directory holding files for this architecture,
  /// both next to resources and inside the staging directory (e.g. `.aarch64`).
  pub fn override_dir_name(&self) -> String {
    format!(".{}", self.as_str())
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported architecture: {0} (expected x86_64 or aarch64)")]
pub struct UnknownArch(pub String);

impl FromStr for Arch {
  type Err = UnknownArch;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "x86_64" | "amd64" => Ok(Self::X86_64),
      "aarch64" | "arm64" => Ok(Self::Aarch64),
      other => Err(UnknownArch(other.to_string())),
    }
  }
}

impl TryFrom<String> for Arch {
  type Error = UnknownArch;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    value.parse()
  }
}
