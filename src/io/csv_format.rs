//! CSV format handling for ledger commands and balance output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvRecord structure for deserialization
//! - Conversion from CSV records to [`LedgerCommand`]s
//! - Balance output serialization
//!
//! Input columns are `type,account,counterparty,amount`:
//!
//! ```text
//! type,account,counterparty,amount
//! open,Id-1,,1000.00
//! open,Id-2,,0
//! transfer,Id-1,Id-2,200.00
//! ```
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{AccountSnapshot, CommandType, LedgerCommand, LedgerError, TransferRequest};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV record structure for deserialization
///
/// `counterparty` is only meaningful for transfers and may be left empty
/// for `open` rows.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    #[serde(rename = "type")]
    pub command_type: String,
    pub account: String,
    pub counterparty: Option<String>,
    pub amount: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Convert a CsvRecord to a LedgerCommand
///
/// # Errors
///
/// - `InvalidCommandType` for anything other than `open` / `transfer`
///   (case-insensitive)
/// - `MissingField` when the account, the amount, or a transfer's
///   counterparty is empty
/// - `InvalidAmount` when the amount is not a decimal number
pub fn convert_csv_record(csv_record: CsvRecord) -> Result<LedgerCommand, LedgerError> {
    let type_name = csv_record.command_type.trim().to_lowercase();
    let command_type = match type_name.as_str() {
        "open" => CommandType::Open,
        "transfer" => CommandType::Transfer,
        _ => return Err(LedgerError::invalid_command_type(&csv_record.command_type)),
    };

    let account = non_empty(Some(csv_record.account))
        .ok_or_else(|| LedgerError::missing_field(&type_name, "account"))?;

    let amount_str = non_empty(csv_record.amount)
        .ok_or_else(|| LedgerError::missing_field(&type_name, "amount"))?;
    let amount =
        Decimal::from_str(&amount_str).map_err(|_| LedgerError::invalid_amount(&amount_str))?;

    match command_type {
        CommandType::Open => Ok(LedgerCommand::Open {
            account_id: account,
            balance: amount,
        }),
        CommandType::Transfer => {
            let counterparty = non_empty(csv_record.counterparty)
                .ok_or_else(|| LedgerError::missing_field(&type_name, "counterparty"))?;
            Ok(LedgerCommand::Transfer(TransferRequest::new(
                account,
                counterparty,
                amount,
            )))
        }
    }
}

/// Write account balances in CSV format
///
/// Columns: `account,balance`. Rows are sorted by account id; balances are
/// printed exactly, without rounding.
pub fn write_balances_csv(
    accounts: &[AccountSnapshot],
    output: &mut dyn Write,
) -> Result<(), LedgerError> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer.write_record(["account", "balance"])?;

    let mut sorted_accounts = accounts.to_vec();
    sorted_accounts.sort_by(|a, b| a.account_id.cmp(&b.account_id));

    for account in sorted_accounts {
        writer.write_record(&[account.account_id, account.balance.to_string()])?;
    }

    writer.flush()?;

    Ok(())
}
