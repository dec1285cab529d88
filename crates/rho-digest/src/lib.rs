//! `f(x) = truncate_k(H(x))`, fed exactly `k` bits of `x` (`spec.md` §4.2
//! step 1, and the "bit-oriented digest" design note in §9).
//!
//! `sha2` only exposes a byte-oriented [`sha2::Digest::update`]. Feeding it
//! a whole partial byte when `k` is not a multiple of 8 would normally risk
//! mixing in whatever garbage sits past bit `k`, silently changing `f`. We
//! sidestep that without a hand-rolled bit-level hasher: every [`Hash`] that
//! reaches this crate was produced by [`Hash::truncate`], which guarantees
//! the bits past position `k` in the last meaningful byte are already zero.
//! So hashing the `trim_len(k)`-byte prefix *is* hashing exactly `k` bits —
//! the trailing padding bits are a fixed, known zero rather than unspecified
//! bytes, which is all "exactly k bits" needs to mean for a byte-oriented
//! digest API.

use rho_core::{HASH_BYTES, Hash, TruncationWidth};
use sha2::{Digest, Sha256};

/// One iteration of `f`: `prev` must already be truncated to `width`
/// (true of every value produced by this module or by [`seed_x0`]).
pub fn step(prev: &Hash, width: TruncationWidth) -> Hash {
    digest_prefix(prev.prefix(width), width)
}

/// `x0 = truncate_k(H(seed))`, where `seed` is the raw (untruncated) seed
/// byte string supplied on the command line (`spec.md` §4.4).
pub fn seed_x0(seed: &[u8], width: TruncationWidth) -> Hash {
    digest_prefix(seed, width)
}

fn digest_prefix(input: &[u8], width: TruncationWidth) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(input);
    let digest = hasher.finalize();
    let mut bytes = [0u8; HASH_BYTES];
    bytes.copy_from_slice(&digest);
    Hash::from_bytes(bytes).truncate(width)
}
