//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - Collaborator abstractions (the `Notifier`)
//! - `account_store` - Concurrent id-to-account map
//! - `validator` - Pure transfer rule checks
//! - `engine` - The lock-ordered transfer engine
//! - `notifier` - Notifier implementations
//! - `ledger` - Store + engine facade applying commands
//! - `batch_processor` - Parallel batch execution on tokio tasks

pub mod account_store;
pub mod batch_processor;
pub mod engine;
pub mod ledger;
pub mod notifier;
pub mod traits;
pub mod validator;

pub use account_store::AccountStore;
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use engine::TransferEngine;
pub use ledger::Ledger;
pub use notifier::{LoggingNotifier, Notification, RecordingNotifier};
pub use traits::Notifier;
