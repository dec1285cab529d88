//! The 32-byte `Hash` type and the truncation operation (`spec.md` §3).

use std::fmt;

use crate::width::TruncationWidth;

/// Native width of the underlying digest, in bytes.
pub const HASH_BYTES: usize = 32;

/// A fixed 32-byte digest value. Storage is always the full digest width;
/// only the "effective prefix" under some [`TruncationWidth`] is meaningful
/// after [`Hash::truncate`] — everything past it is guaranteed zero.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash([u8; HASH_BYTES]);

impl Hash {
    pub const ZERO: Hash = Hash([0u8; HASH_BYTES]);

    pub fn from_bytes(bytes: [u8; HASH_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_BYTES] {
        &self.0
    }

    /// The first `trim_len(k)` bytes — the storage key/value representation.
    pub fn prefix(&self, width: TruncationWidth) -> &[u8] {
        &self.0[..width.trim_len()]
    }

    /// `truncate_k(h)`: zero every bit beyond position `k`, in place.
    ///
    /// Bytes before the partial byte are left untouched; the partial byte
    /// (if any) is masked to its top `k mod 8` bits; everything after is
    /// zeroed.
    pub fn truncate(mut self, width: TruncationWidth) -> Self {
        let len = width.trim_len();
        if len < HASH_BYTES {
            self.0[len - 1] &= width.last_byte_mask();
            for b in &mut self.0[len..] {
                *b = 0;
            }
        } else {
            // len == HASH_BYTES (k == 256): last_byte_mask is 0xFF, nothing
            // to clear past the end.
            self.0[len - 1] &= width.last_byte_mask();
        }
        self
    }

    /// Build a `Hash` from a raw key/value slice of length `trim_len(k)`,
    /// zero-padding the remainder. Used when reconstructing a `Hash` from a
    /// store lookup, whose values are stored in truncated form.
    pub fn from_prefix(prefix: &[u8], width: TruncationWidth) -> Self {
        debug_assert_eq!(prefix.len(), width.trim_len());
        let mut bytes = [0u8; HASH_BYTES];
        bytes[..prefix.len()].copy_from_slice(prefix);
        Self(bytes)
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
