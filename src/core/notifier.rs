//! Notifier implementations
//!
//! - [`LoggingNotifier`] emits each notification as a `tracing` event
//! - [`RecordingNotifier`] keeps notifications in memory for later inspection

use super::traits::Notifier;
use crate::types::{AccountId, AccountSnapshot};
use std::sync::Mutex;

/// Delivers notifications through `tracing` at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

impl Notifier for LoggingNotifier {
    fn notify(&self, account: &AccountSnapshot, message: &str) {
        tracing::info!(
            account_id = %account.account_id,
            balance = %account.balance,
            "{}",
            message
        );
    }
}

/// A notification captured by [`RecordingNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Recipient account
    pub account_id: AccountId,

    /// Message text
    pub message: String,
}

/// Collects notifications in arrival order
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn notifications(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(notifications) => notifications.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Notifications addressed to one account
    pub fn for_account(&self, account_id: &str) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|notification| notification.account_id == account_id)
            .collect()
    }

    /// Number of notifications recorded
    pub fn len(&self) -> usize {
        self.notifications().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, account: &AccountSnapshot, message: &str) {
        let notification = Notification {
            account_id: account.account_id.clone(),
            message: message.to_string(),
        };
        match self.notifications.lock() {
            Ok(mut notifications) => notifications.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn snapshot(id: &str) -> AccountSnapshot {
        AccountSnapshot {
            account_id: id.to_string(),
            balance: Decimal::ONE,
        }
    }

    #[test]
    fn test_recording_notifier_starts_empty() {
        let notifier = RecordingNotifier::new();
        assert!(notifier.is_empty());
        assert!(notifier.notifications().is_empty());
    }

    #[test]
    fn test_recording_notifier_keeps_order() {
        let notifier = RecordingNotifier::new();

        notifier.notify(&snapshot("A"), "first");
        notifier.notify(&snapshot("B"), "second");
        notifier.notify(&snapshot("A"), "third");

        assert_eq!(notifier.len(), 3);
        let messages: Vec<String> = notifier
            .notifications()
            .into_iter()
            .map(|n| n.message)
            .collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_recording_notifier_filters_by_account() {
        let notifier = RecordingNotifier::new();

        notifier.notify(&snapshot("A"), "first");
        notifier.notify(&snapshot("B"), "second");

        let for_b = notifier.for_account("B");
        assert_eq!(
            for_b,
            vec![Notification {
                account_id: "B".to_string(),
                message: "second".to_string(),
            }]
        );
    }

    #[test]
    fn test_recording_notifier_concurrent_notify() {
        use std::sync::Arc;
        use std::thread;

        let notifier = Arc::new(RecordingNotifier::new());
        let mut handles = vec![];

        for i in 0..10 {
            let notifier_clone = Arc::clone(&notifier);
            handles.push(thread::spawn(move || {
                notifier_clone.notify(&snapshot(&format!("Id-{}", i)), "hello");
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(notifier.len(), 10);
    }

    #[test]
    fn test_logging_notifier_does_not_panic_without_subscriber() {
        LoggingNotifier.notify(&snapshot("A"), "message");
    }
}
