//! Thread-safe account store
//!
//! This module provides the `AccountStore` struct, the single source of truth
//! for the id-to-account mapping.
//!
//! # Design
//!
//! The store uses `DashMap` (a sharded concurrent HashMap) for the id map and
//! hands out `Arc<Account>` handles. Map shard guards are dropped before a
//! handle is returned, so a lookup never waits on a transfer: transfers lock
//! the per-account balance mutex, never the map.
//!
//! # Thread Safety
//!
//! Creation and lookup are safe to call concurrently from any number of
//! threads. Concurrent creation of the same id admits exactly one winner.

use crate::types::{Account, AccountId, AccountSnapshot, LedgerError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;

/// Owns every account in the ledger
#[derive(Debug, Default)]
pub struct AccountStore {
    /// Accounts keyed by id
    accounts: DashMap<AccountId, Arc<Account>>,
}

impl AccountStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Insert a new account
    ///
    /// # Returns
    ///
    /// The shared handle of the inserted account.
    ///
    /// # Errors
    ///
    /// [`LedgerError::DuplicateAccount`] if the id is already taken. The
    /// existing account is left untouched.
    pub fn create_account(&self, account: Account) -> Result<Arc<Account>, LedgerError> {
        match self.accounts.entry(account.id().to_string()) {
            Entry::Occupied(_) => Err(LedgerError::duplicate_account(account.id())),
            Entry::Vacant(slot) => {
                let account = Arc::new(account);
                slot.insert(Arc::clone(&account));
                tracing::debug!(account_id = %account.id(), "account created");
                Ok(account)
            }
        }
    }

    /// Validate the opening values and insert the account
    ///
    /// # Errors
    ///
    /// Any error of [`Account::open`] or [`AccountStore::create_account`].
    pub fn open_account(
        &self,
        account_id: impl Into<AccountId>,
        balance: Decimal,
    ) -> Result<Arc<Account>, LedgerError> {
        let account = Account::open(account_id, balance)?;
        self.create_account(account)
    }

    /// Look up an account by id
    pub fn get_account(&self, account_id: &str) -> Option<Arc<Account>> {
        self.accounts
            .get(account_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Snapshot of every account, sorted by id
    ///
    /// Each balance is read under its own lock. While transfers are running the
    /// result is not a single consistent cut across accounts.
    pub fn snapshots(&self) -> Vec<AccountSnapshot> {
        let handles: Vec<Arc<Account>> = self
            .accounts
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut snapshots: Vec<AccountSnapshot> =
            handles.iter().map(|account| account.snapshot()).collect();
        snapshots.sort_by(|a, b| a.account_id.cmp(&b.account_id));
        snapshots
    }

    /// Sum of all balances
    pub fn total_balance(&self) -> Decimal {
        self.snapshots()
            .iter()
            .map(|snapshot| snapshot.balance)
            .sum()
    }

    /// Number of accounts
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
