//! Report buckets
//!
//! A bucket groups transactions by the name of the account they were posted
//! to. Some issuers expose several accounts under one product name (two Blue
//! Cash Preferred cards, for instance), so a bucket can match on a substring.

use serde::{Deserialize, Serialize};

/// How a bucket's pattern is compared against an account name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// The account name must equal the pattern
    #[default]
    Exact,
    /// The account name must contain the pattern
    Contains,
}

/// A named group of accounts in the spending report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBucket {
    /// Header printed above the bucket
    pub title: String,

    /// Account name, or part of one, to match
    pub pattern: String,

    #[serde(default, rename = "match")]
    pub match_kind: MatchKind,
}

impl AccountBucket {
    pub fn exact(title: impl Into<String>, account_name: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pattern: account_name.into(),
            match_kind: MatchKind::Exact,
        }
    }

    pub fn contains(title: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            pattern: fragment.into(),
            match_kind: MatchKind::Contains,
        }
    }

    /// Check whether an account name belongs in this bucket
    pub fn matches(&self, account_name: &str) -> bool {
        match self.match_kind {
            MatchKind::Exact => account_name == self.pattern,
            MatchKind::Contains => account_name.contains(&self.pattern),
        }
    }
}

/// The card accounts reported out of the box
pub fn default_buckets() -> Vec<AccountBucket> {
    vec![
        AccountBucket::exact("Chase Freedom", "Chase Freedom"),
        AccountBucket::exact("Chase Sapphire Preferred", "Chase Sapphire Preferred"),
        AccountBucket::exact("Chase Marriott", "Chase Marriott"),
        AccountBucket::contains("American Express Blue Cash Preferred", "Blue Cash Preferred"),
        AccountBucket::exact("Discover Card", "Discover Card"),
        AccountBucket::contains("Amazon Store Card", "Amazon Prime Store Card"),
    ]
}
