//! Unique artifact identifiers.
//!
//! An identifier is a zero-padded six digit token followed by the
//! resource's file name, e.g. `004217icon.png`. The packaged object for it
//! is `<id>.zip.o`. Two resources must never share a token within one run,
//! otherwise the second object would silently overwrite the first in the
//! staging directory.

mod token;

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::trace;

use crate::consts::{ARTIFACT_SUFFIX, TOKEN_SPACE, TOKEN_WIDTH};

pub use token::{RandomTokens, TokenSource};

/// Consecutive colliding draws tolerated before probing for a free token.
const MAX_REDRAWS: usize = 64;

#[derive(Debug, Error)]
pub enum NamingError {
  #[error("every artifact token is already in use")]
  Exhausted,
}

/// Identifier shared by the default and secondary architecture objects of one resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ArtifactId(pub String);

impl ArtifactId {
  /// File name of the packaged object (`<id>.zip.o`).
  pub fn object_file_name(&self) -> String {
    format!("{}{}", self.0, ARTIFACT_SUFFIX)
  }
}

impl fmt::Display for ArtifactId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Issues identifiers for one build run.
pub struct NameAllocator {
  source: Box<dyn TokenSource + Send>,
  issued: HashSet<u32>,
}

impl NameAllocator {
  pub fn new(source: impl TokenSource + Send + 'static) -> Self {
    Self {
      source: Box::new(source),
      issued: HashSet::new(),
    }
  }

  /// Allocator backed by [`RandomTokens::from_entropy`].
  pub fn from_entropy() -> Self {
    Self::new(RandomTokens::from_entropy())
  }

  /// Number of identifiers issued so far.
  pub fn issued(&self) -> usize {
    self.issued.len()
  }

  pub fn allocate(&mut self, base_name: &str) -> Result<ArtifactId, NamingError> {
    let token = self.next_token()?;
    self.issued.insert(token);
    Ok(ArtifactId(format!("{token:0width$}{base_name}", width = TOKEN_WIDTH)))
  }

  fn next_token(&mut self) -> Result<u32, NamingError> {
    if self.issued.len() >= TOKEN_SPACE as usize {
      return Err(NamingError::Exhausted);
    }

    let mut last = 0;
    for attempt in 0..MAX_REDRAWS {
      let token = self.source.draw() % TOKEN_SPACE;
      if !self.issued.contains(&token) {
        return Ok(token);
      }
      trace!(token, attempt, "token already issued, drawing again");
      last = token;
    }

    // The source keeps colliding; walk forward from its last answer.
    (1..TOKEN_SPACE)
      .map(|offset| (last + offset) % TOKEN_SPACE)
      .find(|token| !self.issued.contains(token))
      .ok_or(NamingError::Exhausted)
  }
}
