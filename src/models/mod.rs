//! Core data models for pew
//!
//! Mostly read-only views of what the aggregation API returns, plus the
//! session cookies and report buckets that are ours.

pub mod account;
pub mod bucket;
pub mod money;
pub mod session;
pub mod transaction;

pub use account::{Account, AccountsSummary};
pub use bucket::{default_buckets, AccountBucket, MatchKind};
pub use money::Money;
pub use session::Session;
pub use transaction::{Transaction, TransactionsPage};
