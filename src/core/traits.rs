//! Core traits for the collaborators of the transfer engine
//!
//! The engine depends only on these abstractions, so delivery of transfer
//! notifications can be swapped without touching the locking protocol.

use crate::types::AccountSnapshot;
use std::fmt::Debug;

/// Receiver of post-transfer notifications
///
/// Called once for the debited and once for the credited account after a
/// transfer has been applied and both account locks have been released.
/// Delivery is fire-and-forget: there is no return value, and nothing a
/// notifier does can roll back the transfer.
pub trait Notifier: Debug + Send + Sync {
    /// Deliver `message` to the owner of `account`
    fn notify(&self, account: &AccountSnapshot, message: &str);
}
