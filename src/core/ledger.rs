//! Ledger facade
//!
//! Bundles the shared [`AccountStore`] with a [`TransferEngine`] and applies
//! [`LedgerCommand`]s. Account creation goes to the store; transfers go to the
//! engine, which never creates accounts itself.

use std::sync::Arc;

use super::traits::Notifier;
use super::{AccountStore, TransferEngine};
use crate::types::{AccountSnapshot, LedgerCommand, LedgerError};

/// Account store plus transfer engine
#[derive(Debug, Clone)]
pub struct Ledger {
    store: Arc<AccountStore>,
    engine: TransferEngine,
}

impl Ledger {
    /// Create an empty ledger reporting transfers to `notifier`
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        let store = Arc::new(AccountStore::new());
        let engine = TransferEngine::new(Arc::clone(&store), notifier);
        Self { store, engine }
    }

    /// The account store
    pub fn store(&self) -> &Arc<AccountStore> {
        &self.store
    }

    /// The transfer engine
    pub fn engine(&self) -> &TransferEngine {
        &self.engine
    }

    /// Apply a single command
    ///
    /// # Errors
    ///
    /// - Opening: `EmptyAccountId`, `NegativeOpeningBalance`, `DuplicateAccount`
    /// - Transfers: any [`TransferError`](crate::types::TransferError), wrapped
    pub fn process(&self, command: &LedgerCommand) -> Result<(), LedgerError> {
        match command {
            LedgerCommand::Open {
                account_id,
                balance,
            } => {
                self.store.open_account(account_id.as_str(), *balance)?;
            }
            LedgerCommand::Transfer(request) => {
                self.engine.execute(request)?;
            }
        }
        Ok(())
    }

    /// Every account's balance, sorted by id
    pub fn balances(&self) -> Vec<AccountSnapshot> {
        self.store.snapshots()
    }
}
