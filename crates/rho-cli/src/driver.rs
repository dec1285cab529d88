//! Wires the externals together and runs one search to completion
//! (`spec.md` §4.4). Split out from `main` so it returns a `Result` rather
//! than calling `std::process::exit` itself.

use std::path::PathBuf;

use rho_core::{TruncationWidth, WidthError};
use rho_db::{DbError, DbOutcome, DbStage};
use rho_filter::{BloomMembershipFilter, FilterError};
use rho_hasher::HasherStage;
use rho_store::{SledStore, StoreError};
use rho_transport::CancelToken;
use thiserror::Error;

use crate::cli::Cli;
use crate::report::{SearchReport, render_filter_footprint, render_hash_count, render_outcome, render_seed_point};

/// The top-level error taxonomy the binary matches on to pick an exit code
/// (`spec.md` §7, `SPEC_FULL.md` §E). A confirmed discovery is the only
/// path to `Ok`; everything else maps to exit 1.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("invalid option: {0}")]
    Option(String),
    #[error("filter initialization failed: {0}")]
    FilterInit(#[from] FilterError),
    #[error("store open failed: {0}")]
    StoreOpen(#[from] StoreError),
    #[error("search stage failed: {0}")]
    Stage(#[from] DbError),
}

impl From<WidthError> for DriverError {
    fn from(e: WidthError) -> Self {
        DriverError::Option(e.to_string())
    }
}

/// Runs one collision search to completion, per `spec.md` §4.4: open the
/// store exclusive, initialize the filter, compute x0, spawn the DB stage
/// then the hasher stage, block on the DB stage, interrupt and join the
/// hasher, then tear everything down.
pub fn run_search(cli: &Cli) -> Result<SearchReport, DriverError> {
    if cli.batch_size == 0 {
        return Err(DriverError::Option("batch-size must be at least 1".to_string()));
    }

    let width = TruncationWidth::new(cli.bitlen)?;

    println!(
        "Configuring Bloom filter for {:.2}M elements (target fp rate {})",
        cli.bloom_size as f64 / 1_000_000.0,
        cli.bloom_prob
    );
    let filter = BloomMembershipFilter::new(cli.bloom_size, cli.bloom_prob)?;
    println!("{}", render_filter_footprint(cli.bloom_size, filter.approx_size_bytes()));

    let db_path = cli.db_path.clone().unwrap_or_else(default_db_path);
    let store = SledStore::open_exclusive(&db_path)?;

    let x0 = rho_digest::seed_x0(cli.seed.as_bytes(), width);
    println!("{}", render_seed_point(&x0));

    let (req_p, req_c) = rho_transport::spsc_channel(cli.batch_size);
    let (hash_count_p, hash_count_c) = rho_transport::spsc_channel(1);
    let (db_result_p, db_result_c) = rho_transport::spsc_channel(1);
    let cancel = CancelToken::new();

    let db_stage = DbStage::new(width, req_c, store, db_result_p, cancel.clone());
    let db_handle = std::thread::spawn(move || db_stage.run());

    let hasher_stage = HasherStage::new(width, filter, req_p, hash_count_p, cancel.clone());
    let hasher_handle = std::thread::spawn(move || hasher_stage.run(x0));

    // Driver: blocking join on DB stage termination, then pop its result
    // (`spec.md` §4.4, §5). The join also hands back the store — the
    // result queue alone can't carry it, since it only ever transports
    // `DbOutcome`.
    let (outcome_from_join, store) = db_handle.join().expect("DB stage thread panicked");
    let db_outcome = if outcome_from_join == DbOutcome::Cancelled {
        outcome_from_join
    } else {
        let popped = db_result_c
            .pop()
            .expect("DB stage always publishes a result before its thread exits");
        debug_assert_eq!(popped, outcome_from_join);
        popped
    };

    // Then interrupt the hasher and join it (`spec.md` §4.4).
    cancel.cancel();
    let hashes_processed = hasher_handle.join().expect("hasher stage thread panicked");
    let _ = hash_count_c.pop();

    let destroy_result = store.destroy();

    let result = match db_outcome {
        DbOutcome::Collision(result) => result,
        DbOutcome::Failed(err) => {
            if let Err(e) = destroy_result {
                eprintln!("warning: failed to destroy store after a stage error: {e}");
            }
            return Err(DriverError::Stage(err));
        }
        DbOutcome::Cancelled => {
            unreachable!("the driver never interrupts the DB stage before it has a result")
        }
    };

    if let Err(e) = destroy_result {
        eprintln!("warning: failed to destroy store after a confirmed discovery: {e}");
    }

    let outcome = result.classify();
    println!("{}", render_outcome(&outcome));
    println!("{}", render_hash_count(hashes_processed));

    Ok(SearchReport { outcome, hashes_processed })
}

/// A path under the OS temp directory unique to this process
/// (`SPEC_FULL.md` §C) — the original hardcodes a shared `/tmp/shadb`,
/// which two concurrent runs would collide on; this doesn't.
fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(format!("rho-collide-{}", std::process::id()))
}
