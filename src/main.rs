//! Inventory ledger CLI
//!
//! Command-line interface over a directory of JSON collections.
//!
//! # Usage
//!
//! ```bash
//! inventory-ledger product add --name Mouse --category Perifericos --code MS-01 --stock 15 --min-stock 5
//! inventory-ledger move saida PROD_P123456_MOUSE 3
//! inventory-ledger scan --saida 1
//! inventory-ledger import movements.csv
//! inventory-ledger report > stock.csv
//! inventory-ledger --data-dir /srv/inventory stats
//! ```
//!
//! Reports and command results are written to stdout, logs to stderr
//! (`RUST_LOG` controls the level).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unreadable data directory, rejected movement, invalid product, etc.)

use inventory_ledger::{cli, logging};
use std::process;

fn main() {
    logging::init();

    let args = cli::parse_args();

    let mut output = std::io::stdout();
    if let Err(e) = cli::run(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
