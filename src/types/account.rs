//! Account-related types for the ledger
//!
//! This module defines the shared [`Account`] entity, which embeds the lock
//! guarding its balance, and the plain [`AccountSnapshot`] value used for
//! notifications and output.

use super::error::{LedgerError, TransferError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard};

/// Account identifier
///
/// Any non-empty string. Ids are compared lexicographically when the transfer
/// engine orders its locks.
pub type AccountId = String;

/// A ledger account
///
/// The id is immutable. The balance lives behind a per-account mutex, which is
/// the unit of locking for transfers. Accounts are owned by the
/// [`AccountStore`](crate::core::AccountStore) and handed out as `Arc<Account>`.
#[derive(Debug)]
pub struct Account {
    id: AccountId,
    balance: Mutex<Decimal>,
}

impl Account {
    /// Create an account after checking the opening values
    ///
    /// # Errors
    ///
    /// - [`LedgerError::EmptyAccountId`] if the id is empty or only whitespace
    /// - [`LedgerError::NegativeOpeningBalance`] if `balance` is below zero
    pub fn open(id: impl Into<AccountId>, balance: Decimal) -> Result<Self, LedgerError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(LedgerError::EmptyAccountId);
        }
        if balance < Decimal::ZERO {
            return Err(LedgerError::negative_opening_balance(&id, balance));
        }

        Ok(Account {
            id,
            balance: Mutex::new(balance),
        })
    }

    /// The account id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current balance
    ///
    /// Takes the account lock for the duration of the read, so the value is
    /// never torn by a concurrent transfer. A poisoned lock still yields the
    /// last written balance: the engine writes a balance only after every check
    /// has passed, so a panic can never leave a half-applied value behind.
    pub fn balance(&self) -> Decimal {
        match self.balance.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Consistent `(id, balance)` copy of this account
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            account_id: self.id.clone(),
            balance: self.balance(),
        }
    }

    /// Acquire the exclusive balance lock for a transfer
    pub(crate) fn lock_balance(&self) -> Result<MutexGuard<'_, Decimal>, TransferError> {
        self.balance
            .lock()
            .map_err(|_| TransferError::lock_poisoned(&self.id))
    }
}

/// Point-in-time view of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSnapshot {
    /// The account id
    pub account_id: AccountId,

    /// Balance at the time the snapshot was taken
    pub balance: Decimal,
}
