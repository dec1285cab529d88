use std::path::PathBuf;

use clap::Parser;

/// Empirical search for collisions in a truncated cryptographic hash
/// (`spec.md` §6). All options are optional and have defaults; `--help`
/// exits 1 rather than clap's usual 0 — `spec.md` §6 reserves exit 0 for a
/// confirmed discovery.
#[derive(Debug, Parser)]
#[command(name = "rho-collide", about = "Search for a truncated-hash collision")]
pub struct Cli {
    /// Initial bytes fed to the digest to derive x0.
    #[arg(long, default_value = "the quick brown fox jumps over the lazy dog")]
    pub seed: String,

    /// Truncation width k, 1 <= k <= 256.
    #[arg(long, default_value_t = 32)]
    pub bitlen: u16,

    /// Capacity of the hasher-to-DB request queue.
    #[arg(long = "batch-size", default_value_t = 10_000)]
    pub batch_size: usize,

    /// Target capacity of the probabilistic membership filter.
    #[arg(long = "bloom-size", default_value_t = 10_000_000)]
    pub bloom_size: u64,

    /// Target false-positive probability of the membership filter.
    #[arg(long = "bloom-prob", default_value_t = 0.0001)]
    pub bloom_prob: f64,

    /// Where to create the persistent store. Defaults to a path under the
    /// OS temp directory that is unique to this process
    /// (`SPEC_FULL.md` §C).
    #[arg(long = "db-path")]
    pub db_path: Option<PathBuf>,
}
