//! Transactions as reported by `/transaction/getUserTransactions`

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Money;

/// A single transaction. Read-only on our side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Posting date (YYYY-MM-DD)
    pub transaction_date: NaiveDate,

    pub amount: Money,

    #[serde(default)]
    pub description: String,

    /// Cleaned-up merchant name, when the service could work one out
    #[serde(default)]
    pub merchant: Option<String>,

    #[serde(default)]
    pub account_name: String,

    /// True for outgoing expenses, false for transfers and credits
    #[serde(default)]
    pub is_spending: bool,
}

impl Transaction {
    /// The merchant if known, otherwise the raw description
    pub fn payee(&self) -> &str {
        self.merchant.as_deref().unwrap_or(&self.description)
    }
}

/// The `spData` block of the transactions response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsPage {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    #[serde(default)]
    pub transactions: Vec<Transaction>,
}
