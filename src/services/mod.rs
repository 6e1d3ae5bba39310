//! Business logic layer
//!
//! Credentials, the login flow, the two data calls, and the bucketing of
//! transactions into the spending report.

pub mod auth;
pub mod credentials;
pub mod fetch;
pub mod report;

pub use auth::{authenticate, AuthOutcome};
pub use credentials::Credentials;
pub use fetch::{fetch_accounts, fetch_transactions, DateRange, TransactionQuery};
pub use report::{categorize, BucketReport, SpendingReport};
