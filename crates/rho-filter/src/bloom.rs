use bloomfilter::Bloom;

use crate::{FilterError, MembershipFilter};

/// Thin wrapper around the `bloomfilter` crate's `Bloom<Vec<u8>>`, sized for
/// a target capacity and false-positive probability (`--bloom-size`,
/// `--bloom-prob`).
pub struct BloomMembershipFilter {
    inner: Bloom<Vec<u8>>,
}

impl BloomMembershipFilter {
    pub fn new(capacity: u64, false_positive_rate: f64) -> Result<Self, FilterError> {
        if capacity == 0 {
            return Err(FilterError::InvalidCapacity(capacity));
        }
        if !(false_positive_rate > 0.0 && false_positive_rate < 1.0) {
            return Err(FilterError::InvalidProbability(false_positive_rate));
        }
        let inner = Bloom::new_for_fp_rate(capacity as usize, false_positive_rate);
        Ok(Self { inner })
    }
}

impl MembershipFilter for BloomMembershipFilter {
    fn insert(&mut self, key: &[u8]) {
        self.inner.set(&key.to_vec());
    }

    fn contains(&self, key: &[u8]) -> bool {
        self.inner.check(&key.to_vec())
    }

    fn approx_size_bytes(&self) -> u64 {
        self.inner.number_of_bits() / 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_capacity() {
        assert_eq!(
            BloomMembershipFilter::new(0, 0.01).unwrap_err(),
            FilterError::InvalidCapacity(0)
        );
    }

    #[test]
    fn rejects_out_of_range_probability() {
        assert_eq!(
            BloomMembershipFilter::new(100, 1.5).unwrap_err(),
            FilterError::InvalidProbability(1.5)
        );
        assert_eq!(
            BloomMembershipFilter::new(100, 0.0).unwrap_err(),
            FilterError::InvalidProbability(0.0)
        );
    }

    #[test]
    fn insert_then_contains_reports_present() {
        let mut filter = BloomMembershipFilter::new(1_000, 0.01).unwrap();
        let key = [1u8, 2, 3, 4];
        assert!(!filter.contains(&key));
        filter.insert(&key);
        assert!(filter.contains(&key));
    }

    #[test]
    fn size_estimate_is_nonzero() {
        let filter = BloomMembershipFilter::new(1_000, 0.01).unwrap();
        assert!(filter.approx_size_bytes() > 0);
    }
}
