//! Account summary as reported by `/newaccount/getAccounts`
//!
//! Only the pieces the report uses are modeled. Everything else in the
//! payload is ignored.

use serde::{Deserialize, Serialize};

use super::money::Money;

/// The `spData` block of the accounts response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountsSummary {
    /// Net worth across every linked account
    #[serde(default)]
    pub networth: Money,

    #[serde(default)]
    pub accounts: Vec<Account>,
}

/// A single linked account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub firm_name: String,

    #[serde(default)]
    pub balance: Option<Money>,
}
