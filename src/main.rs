//! Ledger Transfer Engine CLI
//!
//! Command-line interface for applying account openings and transfers from a
//! CSV file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > balances.csv
//! cargo run -- --strategy sync commands.csv > balances.csv
//! cargo run -- --strategy async --batch-size 2000 --workers 8 commands.csv > balances.csv
//! RUST_LOG=ledger_transfer_engine=debug cargo run -- commands.csv
//! ```
//!
//! Final balances are written to stdout as `account,balance`, sorted by
//! account id. Logs, including rejected commands, go to stderr.
//!
//! # Processing Strategies
//!
//! - **sync**: commands applied one at a time in input order
//! - **async**: batches with concurrent transfer lanes (default)
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use ledger_transfer_engine::cli;
use ledger_transfer_engine::logging;
use ledger_transfer_engine::strategy;
use std::process;

fn main() {
    let args = cli::parse_args();

    logging::init_tracing(&args.log_level);

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}
