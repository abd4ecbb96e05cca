//! Transfer-related types for the ledger
//!
//! This module defines the ephemeral transfer request, the receipt returned by
//! a successful transfer, and the commands accepted by the batch driver.

use super::account::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request to move `amount` from one account to another
///
/// Constructed by the caller and consumed synchronously by the
/// [`TransferEngine`](crate::core::TransferEngine). Nothing about it is
/// retained once the call returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Account to debit
    #[serde(rename = "from")]
    pub from_account_id: AccountId,

    /// Account to credit
    #[serde(rename = "to")]
    pub to_account_id: AccountId,

    /// Value to move; zero is allowed and moves nothing
    pub amount: Decimal,
}

impl TransferRequest {
    /// Create a new transfer request
    pub fn new(
        from_account_id: impl Into<AccountId>,
        to_account_id: impl Into<AccountId>,
        amount: Decimal,
    ) -> Self {
        TransferRequest {
            from_account_id: from_account_id.into(),
            to_account_id: to_account_id.into(),
            amount,
        }
    }
}

/// Outcome of a successful transfer
///
/// Balances are the values written while both account locks were held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferReceipt {
    /// Debited account
    pub from_account_id: AccountId,

    /// Credited account
    pub to_account_id: AccountId,

    /// Amount moved
    pub amount: Decimal,

    /// Source balance after the transfer
    pub from_balance: Decimal,

    /// Destination balance after the transfer
    pub to_balance: Decimal,
}

impl TransferReceipt {
    /// Message delivered to the owner of the debited account
    pub fn source_message(&self) -> String {
        format!(
            "{} was transferred from your account to account {}. Your new balance is {}",
            self.amount, self.to_account_id, self.from_balance
        )
    }

    /// Message delivered to the owner of the credited account
    pub fn destination_message(&self) -> String {
        format!(
            "{} was transferred to your account from account {}. Your new balance is {}",
            self.amount, self.from_account_id, self.to_balance
        )
    }
}

/// Command types accepted by the batch driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandType {
    /// Create an account with an opening balance
    Open,

    /// Move funds between two existing accounts
    Transfer,
}

/// A single ledger operation, as read from batch input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    /// Create `account_id` holding `balance`
    Open {
        /// Id of the new account
        account_id: AccountId,
        /// Opening balance
        balance: Decimal,
    },

    /// Run a transfer through the engine
    Transfer(TransferRequest),
}

impl LedgerCommand {
    /// The type tag of this command
    pub fn command_type(&self) -> CommandType {
        match self {
            LedgerCommand::Open { .. } => CommandType::Open,
            LedgerCommand::Transfer(_) => CommandType::Transfer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_request_uses_short_wire_names() {
        let request: TransferRequest =
            serde_json::from_str(r#"{"from":"Id-1","to":"Id-2","amount":"200.00"}"#).unwrap();

        assert_eq!(
            request,
            TransferRequest::new("Id-1", "Id-2", Decimal::new(20000, 2))
        );
    }

    #[test]
    fn test_receipt_messages_name_counterparty_and_new_balance() {
        let receipt = TransferReceipt {
            from_account_id: "A".to_string(),
            to_account_id: "B".to_string(),
            amount: Decimal::new(200, 0),
            from_balance: Decimal::new(800, 0),
            to_balance: Decimal::new(200, 0),
        };

        assert_eq!(
            receipt.source_message(),
            "200 was transferred from your account to account B. Your new balance is 800"
        );
        assert_eq!(
            receipt.destination_message(),
            "200 was transferred to your account from account A. Your new balance is 200"
        );
    }

    #[test]
    fn test_command_type() {
        let open = LedgerCommand::Open {
            account_id: "A".to_string(),
            balance: Decimal::ZERO,
        };
        let transfer = LedgerCommand::Transfer(TransferRequest::new("A", "B", Decimal::ONE));

        assert_eq!(open.command_type(), CommandType::Open);
        assert_eq!(transfer.command_type(), CommandType::Transfer);
    }
}
