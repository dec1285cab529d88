//! The confirmed collision result (`spec.md` §3, §4.4) and its
//! cycle-vs-collision classification.

use crate::hash::Hash;

/// Published by the DB stage exactly once, after an authoritative `get`
/// confirmed a filter hit (`spec.md` §4.3 step 2b).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionResult {
    /// The preimage already durable in the store under the common image.
    pub stored_preimage: Hash,
    /// The preimage the hasher had just computed when the filter hit.
    pub probed_preimage: Hash,
    /// The image both preimages map to.
    pub image: Hash,
    /// Number of DB read-queries executed up to and including this one.
    pub confirming_reads: u64,
}

/// What the driver reports: a cycle (self-match) or a genuine collision
/// between two distinct inputs (`spec.md` GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// `stored_preimage == probed_preimage`: the iteration re-entered a
    /// previously visited point without ever producing two distinct
    /// preimages with the same image.
    Cycle { point: Hash, confirming_reads: u64 },
    /// Two distinct preimages share a common image.
    Collision {
        first: Hash,
        second: Hash,
        image: Hash,
        confirming_reads: u64,
    },
}

impl CollisionResult {
    /// Invariant 5 (`spec.md` §8): cycle iff the two preimages are
    /// bitwise equal.
    pub fn classify(self) -> Outcome {
        if self.stored_preimage == self.probed_preimage {
            Outcome::Cycle {
                point: self.stored_preimage,
                confirming_reads: self.confirming_reads,
            }
        } else {
            Outcome::Collision {
                first: self.stored_preimage,
                second: self.probed_preimage,
                image: self.image,
                confirming_reads: self.confirming_reads,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_preimages_classify_as_cycle() {
        let p = Hash::from_bytes([7u8; 32]);
        let img = Hash::from_bytes([9u8; 32]);
        let r = CollisionResult {
            stored_preimage: p,
            probed_preimage: p,
            image: img,
            confirming_reads: 3,
        };
        assert_eq!(
            r.classify(),
            Outcome::Cycle { point: p, confirming_reads: 3 }
        );
    }

    #[test]
    fn distinct_preimages_classify_as_collision() {
        let a = Hash::from_bytes([1u8; 32]);
        let b = Hash::from_bytes([2u8; 32]);
        let img = Hash::from_bytes([9u8; 32]);
        let r = CollisionResult {
            stored_preimage: a,
            probed_preimage: b,
            image: img,
            confirming_reads: 1,
        };
        assert_eq!(
            r.classify(),
            Outcome::Collision { first: a, second: b, image: img, confirming_reads: 1 }
        );
    }
}
