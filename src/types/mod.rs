//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: the lockable account entity and its snapshot
//! - `transfer`: transfer requests, receipts and batch commands
//! - `error`: error types for the ledger

pub mod account;
pub mod error;
pub mod transfer;

pub use account::{Account, AccountId, AccountSnapshot};
pub use error::{LedgerError, TransferError};
pub use transfer::{CommandType, LedgerCommand, TransferReceipt, TransferRequest};
