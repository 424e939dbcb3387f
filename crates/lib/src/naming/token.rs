//! Sources of candidate artifact tokens.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::consts::TOKEN_SPACE;

/// Supplies candidate tokens to the [`NameAllocator`](super::NameAllocator).
///
/// Implementations only need to be roughly uniform over `0..TOKEN_SPACE`;
/// uniqueness is enforced by the allocator, not the source.
pub trait TokenSource {
  fn draw(&mut self) -> u32;
}

/// Uniform random tokens from a seedable generator.
#[derive(Debug, Clone)]
pub struct RandomTokens {
  rng: StdRng,
}

impl RandomTokens {
  /// Reproducible sequence for a fixed seed.
  pub fn seeded(seed: u64) -> Self {
    Self {
      rng: StdRng::seed_from_u64(seed),
    }
  }

  pub fn from_entropy() -> Self {
    Self {
      rng: StdRng::from_entropy(),
    }
  }
}

impl TokenSource for RandomTokens {
  fn draw(&mut self) -> u32 {
    self.rng.gen_range(0..TOKEN_SPACE)
  }
}
