//! Processing strategy module for ledger command files
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! encompassing both CSV parsing and ledger processing. This allows different
//! implementations (synchronous, asynchronous batch) to be selected at runtime.

use crate::cli::StrategyType;
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete command-file pipelines
///
/// Each strategy reads ledger commands from a CSV file, applies them to a
/// fresh ledger, and writes the final balances to output.
pub trait ProcessingStrategy: Send + Sync {
    /// Process commands from input file and write balances to output
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened (file not found, permission denied)
    /// - The async runtime cannot be started
    /// - Output cannot be written
    ///
    /// Rejected commands and malformed rows are logged and skipped; they never
    /// cause this method to return an error.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `config` only applies to the async strategy; `None` means defaults.
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[rstest]
    fn test_strategies_agree_on_sequential_input(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy_type: StrategyType,
    ) {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"type,account,counterparty,amount\n\
              open,A,,1000.00\n\
              open,B,,0\n\
              transfer,A,B,250.50\n",
        )
        .unwrap();
        file.flush().unwrap();

        let strategy = create_strategy(strategy_type, Some(BatchConfig::new(10, 2)));
        let mut output = Vec::new();
        strategy.process(file.path(), &mut output).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "account,balance\nA,749.50\nB,250.50\n"
        );
    }
}
