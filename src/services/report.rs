//! Spending report
//!
//! Splits the month's spending into the configured account buckets. Each
//! bucket is filtered independently, so a transaction whose account name
//! satisfies two buckets shows up in both.

use crate::models::{AccountBucket, AccountsSummary, Money, Transaction, TransactionsPage};

/// The spending that landed in one bucket
#[derive(Debug, Clone)]
pub struct BucketReport<'a> {
    pub bucket: &'a AccountBucket,
    pub transactions: Vec<&'a Transaction>,
}

impl BucketReport<'_> {
    pub fn total(&self) -> Money {
        self.transactions.iter().map(|t| t.amount).sum()
    }
}

/// Everything printed by the `report` command
#[derive(Debug, Clone)]
pub struct SpendingReport<'a> {
    pub networth: Money,
    pub page: &'a TransactionsPage,
    pub buckets: Vec<BucketReport<'a>>,
}

impl<'a> SpendingReport<'a> {
    pub fn build(
        accounts: &AccountsSummary,
        page: &'a TransactionsPage,
        buckets: &'a [AccountBucket],
    ) -> Self {
        Self {
            networth: accounts.networth,
            page,
            buckets: categorize(&page.transactions, buckets),
        }
    }
}

/// Collect the spending-flagged transactions of each bucket
///
/// Bucket order follows `buckets`; transaction order is preserved.
pub fn categorize<'a>(
    transactions: &'a [Transaction],
    buckets: &'a [AccountBucket],
) -> Vec<BucketReport<'a>> {
    buckets
        .iter()
        .map(|bucket| BucketReport {
            bucket,
            transactions: transactions
                .iter()
                .filter(|t| t.is_spending && bucket.matches(&t.account_name))
                .collect(),
        })
        .collect()
}
