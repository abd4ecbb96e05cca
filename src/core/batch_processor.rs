//! Concurrent batch processing of ledger commands
//!
//! This module provides the `BatchProcessor` struct, which applies a batch of
//! commands with transfers running in parallel across tokio tasks.
//!
//! # Design
//!
//! A batch is split in two phases:
//!
//! 1. `open` commands are applied sequentially in input order, so every
//!    account opened in the batch exists before any of the batch's transfers run
//! 2. transfers are dealt round-robin into one lane per worker and each lane
//!    runs on its own task; lanes contend only through the engine's account locks
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     ├── Arc<Ledger>   (shared store + engine)
//!     └── workers       (number of concurrent transfer lanes)
//! ```

use std::sync::Arc;

use super::Ledger;
use crate::types::{LedgerCommand, LedgerError};

/// Result of processing a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was processed
    pub command: LedgerCommand,

    /// The result of processing (success or error)
    pub result: Result<(), LedgerError>,
}

/// Batch processor with parallel transfer lanes
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    /// Shared ledger
    ledger: Arc<Ledger>,

    /// Number of transfer lanes per batch (at least one)
    workers: usize,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// A `workers` value of zero is treated as one.
    pub fn new(ledger: Arc<Ledger>, workers: usize) -> Self {
        Self {
            ledger,
            workers: workers.max(1),
        }
    }

    /// Split a batch into account openings and transfer lanes
    ///
    /// # Returns
    ///
    /// `(opens, lanes)` where `opens` keeps input order and `lanes` holds at
    /// most `workers` non-empty vectors of transfers.
    ///
    /// # Guarantees
    ///
    /// - Each command appears exactly once
    /// - Within a lane, transfers keep their relative input order
    pub fn partition_commands(
        &self,
        batch: Vec<LedgerCommand>,
    ) -> (Vec<LedgerCommand>, Vec<Vec<LedgerCommand>>) {
        let mut opens = Vec::new();
        let mut lanes: Vec<Vec<LedgerCommand>> = vec![Vec::new(); self.workers];
        let mut next_lane = 0;

        for command in batch {
            match command {
                LedgerCommand::Open { .. } => opens.push(command),
                LedgerCommand::Transfer(_) => {
                    lanes[next_lane].push(command);
                    next_lane = (next_lane + 1) % self.workers;
                }
            }
        }

        lanes.retain(|lane| !lane.is_empty());
        (opens, lanes)
    }

    /// Apply commands one after another, in order
    pub async fn process_commands(&self, commands: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let mut results = Vec::with_capacity(commands.len());

        for command in commands {
            let result = self.ledger.process(&command);
            results.push(ProcessingResult { command, result });
        }

        results
    }

    /// Process a batch: openings first, then transfer lanes concurrently
    ///
    /// # Returns
    ///
    /// One `ProcessingResult` per command. Openings come first; transfer
    /// results follow in lane order. If a lane task panics, every command of
    /// that lane is reported as a `Runtime` error; commands it ran before the
    /// panic may still have been applied.
    pub async fn process_batch(&self, batch: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let (opens, lanes) = self.partition_commands(batch);

        let mut results = self.process_commands(opens).await;

        let mut tasks = Vec::with_capacity(lanes.len());
        for lane in lanes {
            let processor = self.clone();
            let commands = lane.clone();
            tasks.push((
                commands,
                tokio::spawn(async move { processor.process_commands(lane).await }),
            ));
        }

        for (commands, task) in tasks {
            match task.await {
                Ok(lane_results) => results.extend(lane_results),
                Err(e) => {
                    tracing::error!(
                        "Transfer lane aborted, {} command(s) with unknown outcome: {}",
                        commands.len(),
                        e
                    );
                    let error = LedgerError::Runtime {
                        message: format!("transfer lane aborted: {}", e),
                    };
                    results.extend(commands.into_iter().map(|command| ProcessingResult {
                        command,
                        result: Err(error.clone()),
                    }));
                }
            }
        }

        results
    }
}
