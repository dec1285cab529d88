//! The driver (`spec.md` §4.4): wires the externals together, spawns the
//! two stages, and renders the final report. Kept separate from `main` so
//! it's callable from tests without touching `std::process::exit`.

mod cli;
mod driver;
mod report;

pub use cli::Cli;
pub use driver::{DriverError, run_search};
pub use report::SearchReport;
