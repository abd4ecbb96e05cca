//! Concurrent transfer engine
//!
//! This module provides the `TransferEngine` struct, which moves funds between
//! two accounts of a shared [`AccountStore`] while any number of other
//! transfers run concurrently.
//!
//! # Locking protocol
//!
//! ```text
//! Resolving -> Validating (pre-lock) -> Locking -> Validating (locked)
//!           -> Mutating -> Notifying -> Done
//! ```
//!
//! 1. Both ids are resolved through the store. A missing account fails the
//!    transfer before any lock is taken.
//! 2. Same-account and sign rules are checked without locks.
//! 3. The two accounts are ordered by id and locked lowest first. Every
//!    transfer uses the same global order, so no cycle of waiting transfers
//!    can form. An account is never locked twice by one transfer.
//! 4. Under both locks the rules are checked again against current balances;
//!    this check is authoritative.
//! 5. Both new balances are computed, then both are written.
//! 6. Guards drop on every exit path. Notifications are sent only after the
//!    locks are released.
//!
//! Transfers that share an account are serialized by that account's lock.
//! Transfers over disjoint pairs run fully in parallel.

use std::fmt;
use std::sync::Arc;

use rust_decimal::Decimal;

use super::traits::Notifier;
use super::validator::{self, LockedCheck};
use super::AccountStore;
use crate::types::{Account, AccountSnapshot, TransferError, TransferReceipt, TransferRequest};

/// Executes transfers against a shared account store
///
/// Cloning is cheap: clones share the store and the notifier.
#[derive(Clone)]
pub struct TransferEngine {
    /// Shared account store; the engine only borrows accounts from it
    store: Arc<AccountStore>,

    /// Receiver of post-transfer notifications
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for TransferEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferEngine")
            .field("accounts", &self.store.len())
            .field("notifier", &self.notifier)
            .finish()
    }
}

impl TransferEngine {
    /// Create an engine over `store` that reports to `notifier`
    pub fn new(store: Arc<AccountStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// The store this engine operates on
    pub fn store(&self) -> &Arc<AccountStore> {
        &self.store
    }

    /// Move `amount` from `from_account_id` to `to_account_id`
    ///
    /// # Returns
    ///
    /// * `Ok(TransferReceipt)` - both balances were updated and both owners notified
    /// * `Err(TransferError)` - nothing was changed and nobody was notified
    ///
    /// # Errors
    ///
    /// In precedence order: `NonexistentAccount`, `SameAccount`,
    /// `NegativeAmount`, `NegativeBalance`. `BalanceOverflow` and
    /// `LockPoisoned` are faults, also raised before any write.
    pub fn transfer(
        &self,
        from_account_id: &str,
        to_account_id: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, TransferError> {
        let result = self.try_transfer(from_account_id, to_account_id, amount);

        match &result {
            Ok(receipt) => {
                tracing::debug!(
                    from = %receipt.from_account_id,
                    to = %receipt.to_account_id,
                    amount = %receipt.amount,
                    "transfer applied"
                );
                self.notify(receipt);
            }
            Err(e) if e.is_rejection() => {
                tracing::debug!(from = from_account_id, to = to_account_id, %amount, "transfer rejected: {}", e);
            }
            Err(e) => {
                tracing::error!(from = from_account_id, to = to_account_id, %amount, "transfer failed: {}", e);
            }
        }

        result
    }

    /// Run a [`TransferRequest`]
    pub fn execute(&self, request: &TransferRequest) -> Result<TransferReceipt, TransferError> {
        self.transfer(
            &request.from_account_id,
            &request.to_account_id,
            request.amount,
        )
    }

    fn try_transfer(
        &self,
        from_account_id: &str,
        to_account_id: &str,
        amount: Decimal,
    ) -> Result<TransferReceipt, TransferError> {
        let (from, to) = validator::resolve(
            from_account_id,
            to_account_id,
            self.store.get_account(from_account_id),
            self.store.get_account(to_account_id),
        )?;

        validator::validate_request(&from, &to, amount)?;

        apply(&from, &to, amount)
    }

    fn notify(&self, receipt: &TransferReceipt) {
        let source = AccountSnapshot {
            account_id: receipt.from_account_id.clone(),
            balance: receipt.from_balance,
        };
        let destination = AccountSnapshot {
            account_id: receipt.to_account_id.clone(),
            balance: receipt.to_balance,
        };

        self.notifier.notify(&source, &receipt.source_message());
        self.notifier
            .notify(&destination, &receipt.destination_message());
    }
}

/// Lock both accounts in id order, re-validate, and write both balances
///
/// All guards are released when this function returns.
fn apply(
    from: &Arc<Account>,
    to: &Arc<Account>,
    amount: Decimal,
) -> Result<TransferReceipt, TransferError> {
    let same_account = Arc::ptr_eq(from, to);
    let from_first = from.id() <= to.id();
    let (first, second) = if from_first { (from, to) } else { (to, from) };

    let first_guard = first.lock_balance()?;
    let second_guard = if same_account {
        None
    } else {
        Some(second.lock_balance()?)
    };

    let (mut source, destination) = match second_guard {
        Some(second_guard) if !from_first => (second_guard, Some(first_guard)),
        second_guard => (first_guard, second_guard),
    };

    let new_source_balance = validator::validate_locked(&LockedCheck {
        from_account_id: from.id(),
        same_account,
        amount,
        source_balance: *source,
    })?;

    // validate_locked rejects same_account, the only case without a second guard.
    let Some(mut destination) = destination else {
        return Err(TransferError::same_account(from.id()));
    };

    let new_destination_balance = destination
        .checked_add(amount)
        .ok_or_else(|| TransferError::balance_overflow(to.id()))?;

    *source = new_source_balance;
    *destination = new_destination_balance;

    Ok(TransferReceipt {
        from_account_id: from.id().to_string(),
        to_account_id: to.id().to_string(),
        amount,
        from_balance: new_source_balance,
        to_balance: new_destination_balance,
    })
}
