//! The probabilistic membership filter (`spec.md` §6): "treated as a
//! black-box with add/test/size operations." Mutated and read only by the
//! hasher stage (`spec.md` §5) — the [`MembershipFilter`] trait exists so
//! tests can substitute a mock that always or never reports a hit
//! (`spec.md` §8's false-positive-robustness scenario) without pulling in a
//! real Bloom filter.

mod bloom;
mod mock;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("filter capacity must be at least 1, got {0}")]
    InvalidCapacity(u64),
    #[error("false-positive probability must be in (0, 1), got {0}")]
    InvalidProbability(f64),
}

/// add/test/size, exactly as `spec.md` §6 describes the external filter.
pub trait MembershipFilter {
    fn insert(&mut self, key: &[u8]);
    fn contains(&self, key: &[u8]) -> bool;
    /// Approximate memory footprint, in bytes — used for the startup status
    /// line (`spec.md` §6).
    fn approx_size_bytes(&self) -> u64;
}

pub use bloom::BloomMembershipFilter;
pub use mock::{AlwaysHitFilter, NeverHitFilter};
