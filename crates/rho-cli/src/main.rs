//! Thin entrypoint: parse options, run the search, map the result to an
//! exit code (`spec.md` §6, §7). All real work lives in [`rho_cli::run_search`].

use clap::Parser;
use rho_cli::{Cli, run_search};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap formats both `--help` output and parse-error messages
            // the same way; either way this process exits 1, since exit 0
            // is reserved for a confirmed discovery (`spec.md` §6).
            print!("{err}");
            std::process::exit(1);
        }
    };

    match run_search(&cli) {
        Ok(_report) => std::process::exit(0),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
