//! Transfer request validation
//!
//! Pure rule checks with no side effects. The rules are evaluated in a fixed
//! precedence and the first failing rule decides the error:
//!
//! 1. `NonexistentAccount` - either side did not resolve
//! 2. `SameAccount` - both sides are the same account
//! 3. `NegativeAmount` - the amount is below zero
//! 4. `NegativeBalance` - the source balance minus the amount is below zero
//!
//! Rule 1 runs before any lock is taken. Rules 2-4 run again while the engine
//! holds both account locks, against the balances current at that point.

use crate::types::{Account, TransferError};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Inputs of the balance-dependent checks, captured under lock
#[derive(Debug, Clone, Copy)]
pub struct LockedCheck<'a> {
    /// Source account id, for error context
    pub from_account_id: &'a str,

    /// Whether source and destination are the same account
    pub same_account: bool,

    /// Requested amount
    pub amount: Decimal,

    /// Source balance as currently held
    pub source_balance: Decimal,
}

/// Rule 1: both accounts must exist
pub fn resolve(
    from_account_id: &str,
    to_account_id: &str,
    from: Option<Arc<Account>>,
    to: Option<Arc<Account>>,
) -> Result<(Arc<Account>, Arc<Account>), TransferError> {
    match (from, to) {
        (Some(from), Some(to)) => Ok((from, to)),
        _ => Err(TransferError::nonexistent_account(
            from_account_id,
            to_account_id,
        )),
    }
}

/// Rule 2: identity is decided by the account handle, not by the requested ids
pub fn check_distinct(from: &Arc<Account>, to: &Arc<Account>) -> Result<(), TransferError> {
    if Arc::ptr_eq(from, to) {
        return Err(TransferError::same_account(from.id()));
    }
    Ok(())
}

/// Rule 3: zero is a valid no-op amount
pub fn check_amount(amount: Decimal) -> Result<(), TransferError> {
    if amount < Decimal::ZERO {
        return Err(TransferError::negative_amount(amount));
    }
    Ok(())
}

/// Rule 4: returns the source balance after the debit
pub fn check_overdraft(
    from_account_id: &str,
    source_balance: Decimal,
    amount: Decimal,
) -> Result<Decimal, TransferError> {
    let remaining = source_balance
        .checked_sub(amount)
        .ok_or_else(|| TransferError::negative_balance(from_account_id, source_balance, amount))?;

    if remaining < Decimal::ZERO {
        return Err(TransferError::negative_balance(
            from_account_id,
            source_balance,
            amount,
        ));
    }
    Ok(remaining)
}

/// Rules 2 and 3, which do not depend on balances
pub fn validate_request(
    from: &Arc<Account>,
    to: &Arc<Account>,
    amount: Decimal,
) -> Result<(), TransferError> {
    check_distinct(from, to)?;
    check_amount(amount)
}

/// Rules 2-4 against locked state
///
/// Returns the new source balance when every rule passes.
pub fn validate_locked(check: &LockedCheck<'_>) -> Result<Decimal, TransferError> {
    if check.same_account {
        return Err(TransferError::same_account(check.from_account_id));
    }
    check_amount(check.amount)?;
    check_overdraft(check.from_account_id, check.source_balance, check.amount)
}
