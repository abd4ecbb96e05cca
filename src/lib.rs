//! Ledger Transfer Engine Library
//! # Overview
//!
//! An in-memory ledger of named accounts with a concurrent transfer engine.
//! Many transfers may run at once; each one is all-or-nothing, the sum of all
//! balances never changes, and no balance ever goes below zero.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, TransferRequest, errors)
//! - [`core`] - Business logic components:
//!   - [`core::account_store`] - Concurrent id-to-account map
//!   - [`core::engine`] - Lock-ordered, deadlock-free transfers
//!   - [`core::validator`] - Transfer rule checks
//!   - [`core::ledger`] - Store + engine facade applying commands
//!   - [`core::batch_processor`] - Parallel batch execution
//! - [`io`] - CSV command input and balance output
//! - [`strategy`] - Sync and async file processing pipelines
//! - [`cli`] - CLI arguments parsing
//! - [`logging`] - Tracing subscriber setup
//!
//! # Transfer Rules
//!
//! A transfer is rejected, leaving every balance untouched, when (checked in
//! this order):
//!
//! 1. either account does not exist
//! 2. source and destination are the same account
//! 3. the amount is negative
//! 4. the source balance is smaller than the amount
//!
//! Zero-amount transfers succeed and change nothing. On success both account
//! holders are notified of their new balance.
//!
//! # Example
//!
//! ```
//! use ledger_transfer_engine::{Ledger, LoggingNotifier};
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let ledger = Ledger::new(Arc::new(LoggingNotifier));
//! ledger.store().open_account("Id-1", Decimal::new(1000, 0)).unwrap();
//! ledger.store().open_account("Id-2", Decimal::ZERO).unwrap();
//!
//! let receipt = ledger.engine().transfer("Id-1", "Id-2", Decimal::new(200, 0)).unwrap();
//! assert_eq!(receipt.from_balance, Decimal::new(800, 0));
//! assert_eq!(receipt.to_balance, Decimal::new(200, 0));
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{AccountStore, Ledger, LoggingNotifier, Notifier, RecordingNotifier, TransferEngine};
pub use io::write_balances_csv;
pub use types::{
    Account, AccountId, AccountSnapshot, LedgerCommand, LedgerError, TransferError,
    TransferReceipt, TransferRequest,
};
