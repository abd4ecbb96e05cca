//! Error types for the ledger
//!
//! This module defines the two error families of the crate:
//!
//! - [`TransferError`] - the closed set of outcomes a transfer can fail with
//! - [`LedgerError`] - everything around the engine: account opening, CSV input,
//!   runtime setup, plus a wrapped [`TransferError`]
//!
//! Errors are designed to be descriptive and user-friendly for CLI output.

use rust_decimal::Decimal;
use thiserror::Error;

use super::account::AccountId;

/// Reasons a transfer can fail
///
/// The first four variants are rejections of a bad request: they are caller
/// visible, never retried, and leave every balance untouched. The last two are
/// faults that are fatal for the transfer in which they occur; they are raised
/// before any balance is written, so nothing is ever partially applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    /// One or both account ids did not resolve to an account
    #[error("Nonexistent account in transfer from '{from_account_id}' to '{to_account_id}'")]
    NonexistentAccount {
        /// Requested source id
        from_account_id: AccountId,
        /// Requested destination id
        to_account_id: AccountId,
    },

    /// Source and destination are the same account
    #[error("Source and destination are the same account '{account_id}'")]
    SameAccount {
        /// The account named on both sides
        account_id: AccountId,
    },

    /// The requested amount is below zero
    #[error("Transfer amount must not be negative, got {amount}")]
    NegativeAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Debiting the source would overdraw it
    #[error("Transfer of {amount} would overdraw account '{account_id}' (balance {balance})")]
    NegativeBalance {
        /// Source account id
        account_id: AccountId,
        /// Source balance observed under lock
        balance: Decimal,
        /// Requested amount
        amount: Decimal,
    },

    /// Crediting the destination would exceed the representable decimal range
    #[error("Balance overflow crediting account '{account_id}'")]
    BalanceOverflow {
        /// Destination account id
        account_id: AccountId,
    },

    /// The lock guarding an account balance is poisoned
    #[error("Lock on account '{account_id}' is poisoned")]
    LockPoisoned {
        /// Account whose lock failed
        account_id: AccountId,
    },
}

impl TransferError {
    /// Create a NonexistentAccount error
    pub fn nonexistent_account(from_account_id: &str, to_account_id: &str) -> Self {
        TransferError::NonexistentAccount {
            from_account_id: from_account_id.to_string(),
            to_account_id: to_account_id.to_string(),
        }
    }

    /// Create a SameAccount error
    pub fn same_account(account_id: &str) -> Self {
        TransferError::SameAccount {
            account_id: account_id.to_string(),
        }
    }

    /// Create a NegativeAmount error
    pub fn negative_amount(amount: Decimal) -> Self {
        TransferError::NegativeAmount { amount }
    }

    /// Create a NegativeBalance error
    pub fn negative_balance(account_id: &str, balance: Decimal, amount: Decimal) -> Self {
        TransferError::NegativeBalance {
            account_id: account_id.to_string(),
            balance,
            amount,
        }
    }

    /// Create a BalanceOverflow error
    pub fn balance_overflow(account_id: &str) -> Self {
        TransferError::BalanceOverflow {
            account_id: account_id.to_string(),
        }
    }

    /// Create a LockPoisoned error
    pub fn lock_poisoned(account_id: &str) -> Self {
        TransferError::LockPoisoned {
            account_id: account_id.to_string(),
        }
    }

    /// Whether this error is a rejection of the request rather than a fault
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TransferError::NonexistentAccount { .. }
                | TransferError::SameAccount { .. }
                | TransferError::NegativeAmount { .. }
                | TransferError::NegativeBalance { .. }
        )
    }
}

/// Main error type for ledger operations outside the transfer engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// An account with this id already exists
    #[error("Account '{account_id}' already exists")]
    DuplicateAccount {
        /// The duplicated id
        account_id: AccountId,
    },

    /// Account ids must contain at least one non-whitespace character
    #[error("Account id must not be empty")]
    EmptyAccountId,

    /// Accounts cannot be opened in overdraft
    #[error("Opening balance for account '{account_id}' must not be negative, got {balance}")]
    NegativeOpeningBalance {
        /// Account being opened
        account_id: AccountId,
        /// Rejected opening balance
        balance: Decimal,
    },

    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// CSV parsing error occurred
    ///
    /// Recoverable: the malformed row is skipped.
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// Unknown command type in the input
    #[error("Invalid command type '{command_type}'")]
    InvalidCommandType {
        /// The unrecognised type string
        command_type: String,
    },

    /// A column required by the command is empty
    #[error("{command_type} command is missing {field}")]
    MissingField {
        /// Command type being parsed
        command_type: String,
        /// Name of the missing column
        field: String,
    },

    /// Amount column could not be parsed as a decimal
    #[error("Invalid amount '{amount}'")]
    InvalidAmount {
        /// The raw amount text
        amount: String,
    },

    /// The async runtime could not be started
    #[error("Runtime error: {message}")]
    Runtime {
        /// Description of the failure
        message: String,
    },

    /// A transfer command was rejected or faulted
    #[error(transparent)]
    Transfer(#[from] TransferError),
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl LedgerError {
    /// Create a DuplicateAccount error
    pub fn duplicate_account(account_id: &str) -> Self {
        LedgerError::DuplicateAccount {
            account_id: account_id.to_string(),
        }
    }

    /// Create a NegativeOpeningBalance error
    pub fn negative_opening_balance(account_id: &str, balance: Decimal) -> Self {
        LedgerError::NegativeOpeningBalance {
            account_id: account_id.to_string(),
            balance,
        }
    }

    /// Create an InvalidCommandType error
    pub fn invalid_command_type(command_type: &str) -> Self {
        LedgerError::InvalidCommandType {
            command_type: command_type.to_string(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(command_type: &str, field: &str) -> Self {
        LedgerError::MissingField {
            command_type: command_type.to_string(),
            field: field.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Prefix a record-level error with the line it came from
    pub fn at_line(self, line: u64) -> Self {
        match self {
            LedgerError::ParseError { message, .. } => LedgerError::ParseError {
                line: Some(line),
                message,
            },
            other => LedgerError::ParseError {
                line: Some(line),
                message: other.to_string(),
            },
        }
    }
}
