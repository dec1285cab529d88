//! Status-line rendering (`spec.md` §6, `SPEC_FULL.md` §C). Kept as pure
//! string-building functions, separate from the `println!` call sites, so
//! the exact wording is unit-testable without capturing stdout.

use rho_core::Outcome;

/// What the driver collected by the time the DB stage terminated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: Outcome,
    pub hashes_processed: u64,
}

/// The filter footprint line, printed once at startup before either stage
/// runs. Pins the original's MiB-and-bits-per-element convention
/// (`SPEC_FULL.md` §C).
pub fn render_filter_footprint(capacity: u64, footprint_bytes: u64) -> String {
    let mib = footprint_bytes as f64 / (1024.0 * 1024.0);
    let bits_per_element = (footprint_bytes as f64 * 8.0) / capacity as f64;
    format!(
        "Bloom filter: {:.2}M element capacity, {mib:.2} MiB ({bits_per_element:.2} bits/element)",
        capacity as f64 / 1_000_000.0
    )
}

/// The seed's truncated x0 line.
pub fn render_seed_point(x0: &rho_core::Hash) -> String {
    format!("x0 = {x0}")
}

/// The discovery report: a cycle or a confirmed collision, plus the
/// confirming DB-query count (`spec.md` §6).
pub fn render_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Cycle { point, confirming_reads } => format!(
            "Cycle detected: the iteration re-entered {point} without a collision.\n\
             Confirming DB queries: {confirming_reads}\n\
             Perhaps try a different seed."
        ),
        Outcome::Collision { first, second, image, confirming_reads } => format!(
            "Collision found!\n  preimage 1: {first}\n  preimage 2: {second}\n  common image: {image}\n\
             Confirming DB queries: {confirming_reads}"
        ),
    }
}

/// The final hash-count line (`spec.md` §6 "total hashes processed").
pub fn render_hash_count(count: u64) -> String {
    format!("Total hashes processed: {count}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rho_core::Hash;

    #[test]
    fn filter_footprint_reports_mib_and_bits_per_element() {
        let line = render_filter_footprint(10_000_000, 14_340_000);
        assert!(line.contains("10.00M element capacity"));
        assert!(line.contains("MiB"));
        assert!(line.contains("bits/element"));
    }

    #[test]
    fn cycle_outcome_includes_the_seed_nudge() {
        let outcome = Outcome::Cycle { point: Hash::ZERO, confirming_reads: 3 };
        let line = render_outcome(&outcome);
        assert!(line.contains("Cycle detected"));
        assert!(line.ends_with("Perhaps try a different seed."));
    }

    #[test]
    fn collision_outcome_names_both_preimages() {
        let outcome = Outcome::Collision {
            first: Hash::from_bytes([1; 32]),
            second: Hash::from_bytes([2; 32]),
            image: Hash::from_bytes([3; 32]),
            confirming_reads: 5,
        };
        let line = render_outcome(&outcome);
        assert!(line.contains("Collision found!"));
        assert!(line.contains("Confirming DB queries: 5"));
    }
}
