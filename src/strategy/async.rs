//! Asynchronous batch processing strategy
//!
//! Multi-threaded implementation of the ProcessingStrategy trait. Commands are
//! read in batches; within a batch, account openings are applied first and
//! transfers then run concurrently across worker lanes.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, workers)
//!     ├── AsyncReader (batch CSV reading)
//!     └── BatchProcessor (opens first, then parallel transfer lanes)
//!         └── Ledger
//!             ├── AccountStore (DashMap of per-account locks)
//!             └── TransferEngine (lock-ordered two-account transfers)
//! ```
//!
//! # Ordering
//!
//! Batches run one after another, so every command of batch N completes
//! before batch N+1 starts. Inside a batch, transfers interleave freely:
//! outcomes that depend on the relative order of two transfers touching the
//! same account are not reproducible, but conservation and the
//! no-overdraft rule always hold.

use crate::core::{BatchProcessor, Ledger, LoggingNotifier};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_balances_csv;
use crate::io::sync_reader::open_input;
use crate::strategy::ProcessingStrategy;
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Configuration for batch processing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Number of runtime worker threads and transfer lanes per batch
    pub workers: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            workers: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// A zero value falls back to its default with a warning.
    pub fn new(batch_size: usize, workers: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let workers = if workers == 0 {
            tracing::warn!(
                "Invalid workers ({}), using default ({})",
                workers,
                default.workers
            );
            default.workers
        } else {
            workers
        };

        Self {
            batch_size,
            workers,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the specified configuration
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process commands from input file and write balances to output
    ///
    /// 1. Builds a multi-threaded tokio runtime with `workers` threads
    /// 2. Reads commands in batches of `batch_size` using AsyncReader
    /// 3. Hands each batch to the BatchProcessor and waits for it
    /// 4. Writes the final balances using the csv_format module
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError> {
        // Fail fast with the same error as the sync strategy.
        drop(open_input(input_path)?);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.workers)
            .build()
            .map_err(|e| LedgerError::Runtime {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let ledger = Arc::new(Ledger::new(Arc::new(LoggingNotifier)));
            let processor = BatchProcessor::new(Arc::clone(&ledger), self.config.workers);

            let file = tokio::fs::File::open(input_path).await?;

            // csv-async reads futures::io::AsyncRead
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);

            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;

                for e in reader.take_skipped() {
                    tracing::warn!("Skipping row: {}", e);
                }

                if batch.is_empty() {
                    break;
                }

                for result in processor.process_batch(batch).await {
                    if let Err(e) = result.result {
                        tracing::warn!("Command rejected: {}", e);
                    }
                }
            }

            write_balances_csv(&ledger.balances(), output)?;

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[rstest]
    #[case::both_zero(0, 0, BatchConfig::default())]
    #[case::zero_batch(0, 3, BatchConfig { batch_size: 1000, workers: 3 })]
    #[case::zero_workers(50, 0, BatchConfig { batch_size: 50, ..BatchConfig::default() })]
    #[case::custom(50, 3, BatchConfig { batch_size: 50, workers: 3 })]
    fn test_batch_config_new(
        #[case] batch_size: usize,
        #[case] workers: usize,
        #[case] expected: BatchConfig,
    ) {
        assert_eq!(BatchConfig::new(batch_size, workers), expected);
    }

    #[test]
    fn test_async_strategy_applies_opens_and_transfers() {
        let file = create_temp_csv(
            "type,account,counterparty,amount\n\
             open,A,,1000.00\n\
             open,B,,0\n\
             transfer,A,B,200.00\n",
        );

        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());
        let mut output = Vec::new();

        strategy.process(file.path(), &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account,balance\nA,800.00\nB,200.00\n"
        );
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);
        assert!(matches!(result, Err(LedgerError::FileNotFound { .. })));
    }

    #[test]
    fn test_async_strategy_batches_run_in_sequence() {
        // With batch_size 2, the opens of the first batch are visible to the
        // transfers of later batches, and the drain of A to zero in batch two
        // completes before the overdraft attempt in batch three.
        let file = create_temp_csv(
            "type,account,counterparty,amount\n\
             open,A,,100\n\
             open,B,,0\n\
             transfer,A,B,60\n\
             transfer,A,B,40\n\
             transfer,A,B,1\n",
        );

        let strategy = AsyncProcessingStrategy::new(BatchConfig::new(2, 4));
        let mut output = Vec::new();

        strategy.process(file.path(), &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account,balance\nA,0\nB,100\n"
        );
    }

    #[test]
    fn test_async_strategy_conserves_total_under_contention() {
        let mut csv_content = String::from("type,account,counterparty,amount\n");
        for id in ["A", "B", "C", "D"] {
            csv_content.push_str(&format!("open,{},,100\n", id));
        }
        let ids = ["A", "B", "C", "D"];
        for i in 0..400 {
            let from = ids[i % 4];
            let to = ids[(i * 7 + 1) % 4];
            csv_content.push_str(&format!("transfer,{},{},{}\n", from, to, i % 30));
        }
        let file = create_temp_csv(&csv_content);

        let strategy = AsyncProcessingStrategy::new(BatchConfig::new(64, 4));
        let mut output = Vec::new();

        strategy.process(file.path(), &mut output).unwrap();

        let output_str = String::from_utf8(output).unwrap();
        let balances: Vec<rust_decimal::Decimal> = output_str
            .lines()
            .skip(1)
            .map(|line| line.split(',').nth(1).unwrap().parse().unwrap())
            .collect();

        assert_eq!(balances.len(), 4);
        assert!(balances.iter().all(|b| *b >= rust_decimal::Decimal::ZERO));
        assert_eq!(
            balances.iter().sum::<rust_decimal::Decimal>(),
            rust_decimal::Decimal::new(400, 0)
        );
    }
}
