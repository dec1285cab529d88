use crate::MembershipFilter;

/// Always reports a hit — used to drive the `spec.md` §8 scenario "every
/// iteration emits a READ; the DB stage still only reports a true collision
/// (via the authoritative store), proving false-positive robustness."
#[derive(Debug, Default)]
pub struct AlwaysHitFilter {
    inserted: usize,
}

impl MembershipFilter for AlwaysHitFilter {
    fn insert(&mut self, _key: &[u8]) {
        self.inserted += 1;
    }

    fn contains(&self, _key: &[u8]) -> bool {
        true
    }

    fn approx_size_bytes(&self) -> u64 {
        0
    }
}

/// Never reports a hit — used to drive the `spec.md` §8 scenario where the
/// DB stage never sees a READ and therefore never publishes a result.
#[derive(Debug, Default)]
pub struct NeverHitFilter {
    inserted: usize,
}

impl MembershipFilter for NeverHitFilter {
    fn insert(&mut self, _key: &[u8]) {
        self.inserted += 1;
    }

    fn contains(&self, _key: &[u8]) -> bool {
        false
    }

    fn approx_size_bytes(&self) -> u64 {
        0
    }
}
