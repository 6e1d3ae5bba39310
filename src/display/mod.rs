//! Display formatting for terminal output

pub mod report;

pub use report::{format_spending_report, format_summary_table};
