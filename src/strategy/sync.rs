//! Synchronous processing strategy
//!
//! Single-threaded implementation of the ProcessingStrategy trait. Commands
//! are applied strictly in input order, so outcomes are deterministic.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Command application to `Ledger`
//! - CSV output to `csv_format::write_balances_csv`
//!
//! Rows are streamed one at a time; memory use is O(accounts).

use crate::core::{Ledger, LoggingNotifier};
use crate::io::csv_format::write_balances_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use ledger_transfer_engine::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy;
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("commands.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError> {
        let ledger = Ledger::new(Arc::new(LoggingNotifier));

        let reader = SyncReader::new(input_path)?;

        for result in reader {
            match result {
                Ok(command) => {
                    if let Err(e) = ledger.process(&command) {
                        tracing::warn!("Command rejected: {}", e);
                    }
                }
                Err(e) => tracing::warn!("Skipping row: {}", e),
            }
        }

        write_balances_csv(&ledger.balances(), output)?;

        Ok(())
    }
}
